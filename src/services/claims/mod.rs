pub mod attributes;
pub mod mapper;
pub mod release;
pub mod scope;
pub mod supported;

pub use attributes::ResolvedAttributes;
pub use mapper::{ClaimMapper, DefaultClaimMapper};
pub use release::{ReleaseEngine, ReleasedClaims};
pub use scope::ScopePolicy;
pub use supported::{
    ConfigurationUnavailable, StaticSupportedClaims, SupportedClaims, SupportedClaimsSource,
};
