pub mod access;
pub mod claims;
pub mod decision;
pub mod policy;
pub mod registry;

pub use decision::{DecisionError, DecisionService};
