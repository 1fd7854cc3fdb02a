//! Closed set of per-service policy variants.
//!
//! Each policy is plain configuration tagged by `@type`; behavior comes from the
//! two capabilities below, dispatched by `match` rather than by inheritance.
use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::services::{
    access::{AccessError, AccessRequest, RemoteAccessEvaluator, RemoteAccessPolicy},
    claims::{ReleaseEngine, ReleasedClaims, ResolvedAttributes, ScopePolicy},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum AccessStrategy {
    RemoteEndpoint(RemoteAccessPolicy),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum ReleasePolicy {
    OidcScope(ScopePolicy),
    /// One scope policy per requested scope, resolved in order.
    Chain { policies: Vec<ScopePolicy> },
}

#[async_trait]
pub trait EvaluateAccess: Send + Sync {
    async fn evaluate_access(
        &self,
        evaluator: &RemoteAccessEvaluator,
        request: &AccessRequest,
    ) -> Result<bool, AccessError>;
}

pub trait ResolveAttributes {
    fn resolve_attributes(
        &self,
        engine: &ReleaseEngine,
        attributes: &ResolvedAttributes,
    ) -> ReleasedClaims;

    fn requested_attribute_definitions(&self) -> Vec<String>;
}

#[async_trait]
impl EvaluateAccess for AccessStrategy {
    async fn evaluate_access(
        &self,
        evaluator: &RemoteAccessEvaluator,
        request: &AccessRequest,
    ) -> Result<bool, AccessError> {
        match self {
            AccessStrategy::RemoteEndpoint(policy) => evaluator.evaluate(policy, request).await,
        }
    }
}

impl ResolveAttributes for ReleasePolicy {
    fn resolve_attributes(
        &self,
        engine: &ReleaseEngine,
        attributes: &ResolvedAttributes,
    ) -> ReleasedClaims {
        match self {
            ReleasePolicy::OidcScope(policy) => engine.resolve(policy, attributes),
            ReleasePolicy::Chain { policies } => {
                let mut released = ReleasedClaims::new();
                for policy in policies {
                    for (claim, values) in engine.resolve(policy, attributes) {
                        // earlier scopes keep their value
                        released.entry(claim).or_insert(values);
                    }
                }
                released
            }
        }
    }

    fn requested_attribute_definitions(&self) -> Vec<String> {
        match self {
            ReleasePolicy::OidcScope(policy) => policy.determine_requested_attribute_definitions(),
            ReleasePolicy::Chain { policies } => {
                let mut seen = HashSet::new();
                policies
                    .iter()
                    .flat_map(ScopePolicy::determine_requested_attribute_definitions)
                    .filter(|claim| seen.insert(claim.clone()))
                    .collect()
            }
        }
    }
}
