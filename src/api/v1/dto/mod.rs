pub mod access;
pub mod release;
