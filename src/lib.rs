//! Access and claim-release decisions for registered services.
//!
//! Two independent entry points are exposed through [`services::DecisionService`]:
//! a remote-endpoint access check and scope-based claim release.
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
