//! Claim release for scope-based policies.
//!
//! Responsibility:
//! - Intersect a scope's allowed claims with the provider's supported claims.
//! - Resolve each surviving claim against the principal's attributes, honoring
//!   claim mappings with a fallback to the claim's own name.
//!
//! Release is fail-soft: when a collaborator is unavailable the result is an
//! empty set, never an error.
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::services::claims::{
    attributes::ResolvedAttributes,
    mapper::ClaimMapper,
    scope::ScopePolicy,
    supported::{SupportedClaims, SupportedClaimsSource},
};

/// Claims to release, in the order the scope allows them.
pub type ReleasedClaims = IndexMap<String, Vec<Value>>;

#[derive(Clone)]
pub struct ReleaseEngine {
    mapper: Arc<dyn ClaimMapper>,
    supported: Arc<dyn SupportedClaimsSource>,
}

impl ReleaseEngine {
    pub fn new(mapper: Arc<dyn ClaimMapper>, supported: Arc<dyn SupportedClaimsSource>) -> Self {
        Self { mapper, supported }
    }

    pub fn resolve(&self, policy: &ScopePolicy, attributes: &ResolvedAttributes) -> ReleasedClaims {
        let supported = match self.supported.supported_claims() {
            Ok(claims) => claims,
            Err(err) => {
                warn!(
                    scope = %policy.scope_type,
                    error = %err,
                    "unable to load supported claims; releasing no claims"
                );
                return ReleasedClaims::new();
            }
        };

        resolve_claims(self.mapper.as_ref(), policy, &supported, attributes)
    }

    pub fn determine_requested_attribute_definitions(&self, policy: &ScopePolicy) -> Vec<String> {
        policy.determine_requested_attribute_definitions()
    }
}

/// Computes the release set for one scope against an explicit supported set.
pub fn resolve_claims(
    mapper: &dyn ClaimMapper,
    policy: &ScopePolicy,
    supported: &SupportedClaims,
    attributes: &ResolvedAttributes,
) -> ReleasedClaims {
    let allowed: Vec<&str> = policy
        .allowed_claims()
        .into_iter()
        .filter(|claim| supported.contains(claim))
        .collect();

    debug!(
        scope = %policy.scope_type,
        requested = ?policy.allowed_attributes,
        allowed = ?allowed,
        "allowed claims after cross-checking supported claims"
    );

    allowed
        .into_iter()
        .filter_map(|claim| {
            map_claim_to_attribute(mapper, claim, policy, attributes)
                .map(|values| (claim.to_string(), values.to_vec()))
        })
        .collect()
}

fn map_claim_to_attribute<'a>(
    mapper: &dyn ClaimMapper,
    claim: &str,
    policy: &ScopePolicy,
    attributes: &'a ResolvedAttributes,
) -> Option<&'a [Value]> {
    let Some(mapped) = mapper.mapped_attribute(claim, policy) else {
        let values = attributes.get(claim);
        debug!(claim, found = values.is_some(), "no mapped attribute defined for claim");
        return values;
    };
    trace!(claim, attribute = %mapped, "claim is mapped to attribute");

    if let Some(values) = attributes.get(&mapped) {
        debug!(claim, attribute = %mapped, "found mapped attribute for claim");
        return Some(values);
    }

    if let Some(values) = attributes.get(claim) {
        debug!(
            claim,
            attribute = %mapped,
            "mapped attribute is missing; attributes already contain the claim itself"
        );
        return Some(values);
    }

    warn!(
        claim,
        attribute = %mapped,
        "mapping not found: resolved attributes contain neither the mapped attribute nor the claim"
    );
    None
}
