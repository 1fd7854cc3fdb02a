use serde::{Deserialize, Serialize};

use crate::services::claims::{ReleasedClaims, ResolvedAttributes};

#[derive(Debug, Deserialize)]
pub struct ReleaseRequest {
    #[serde(default)]
    pub attributes: ResolvedAttributes,
}

#[derive(Debug, Serialize)]
pub struct ReleaseResponse {
    // serialized in release order
    pub claims: ReleasedClaims,
}

#[derive(Debug, Serialize)]
pub struct RequestedClaimsResponse {
    pub claims: Vec<String>,
}
