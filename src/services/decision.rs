//! Entry points called by the authentication pipeline.
//!
//! Responsibility:
//! - Look the service up in the registry.
//! - Dispatch its access strategy / release policy to the matching engine.
//! - Apply the configured `FailureMode` to access evaluation faults.
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::services::{
    access::{AccessError, AccessRequest, FailureMode, RemoteAccessEvaluator},
    claims::{ReleaseEngine, ReleasedClaims, ResolvedAttributes},
    policy::{EvaluateAccess, ResolveAttributes},
    registry::{RegisteredService, RegistryError, ServiceRegistry},
};

#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("service not found: {0}")]
    ServiceNotFound(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Access(#[from] AccessError),
}

#[derive(Clone)]
pub struct DecisionService {
    registry: Arc<dyn ServiceRegistry>,
    release: ReleaseEngine,
    access: RemoteAccessEvaluator,
    failure_mode: FailureMode,
}

impl DecisionService {
    pub fn new(
        registry: Arc<dyn ServiceRegistry>,
        release: ReleaseEngine,
        access: RemoteAccessEvaluator,
        failure_mode: FailureMode,
    ) -> Self {
        Self {
            registry,
            release,
            access,
            failure_mode,
        }
    }

    fn lookup(&self, service_id: &str) -> Result<Arc<RegisteredService>, DecisionError> {
        self.registry
            .find(service_id)?
            .ok_or_else(|| DecisionError::ServiceNotFound(service_id.to_string()))
    }

    /// Services without an access strategy are open to every principal.
    pub async fn evaluate_access(
        &self,
        service_id: &str,
        mut request: AccessRequest,
    ) -> Result<bool, DecisionError> {
        let service = self.lookup(service_id)?;
        if request.service_id.is_empty() {
            request.service_id = service.service_id.clone();
        }

        let Some(strategy) = &service.access_strategy else {
            debug!(service_id, "no access strategy configured; allowing access");
            return Ok(true);
        };

        let outcome = strategy.evaluate_access(&self.access, &request).await;
        Ok(self.failure_mode.apply(outcome)?)
    }

    /// Claims to release for `service_id`. An unreachable registry yields an
    /// empty set; an unknown service is an error.
    pub fn release_claims(
        &self,
        service_id: &str,
        attributes: &ResolvedAttributes,
    ) -> Result<ReleasedClaims, DecisionError> {
        let service = match self.lookup(service_id) {
            Ok(service) => service,
            Err(DecisionError::Registry(err)) => {
                warn!(service_id, error = %err, "service registry unavailable; releasing no claims");
                return Ok(ReleasedClaims::new());
            }
            Err(err) => return Err(err),
        };

        Ok(service
            .attribute_release_policy
            .as_ref()
            .map(|policy| policy.resolve_attributes(&self.release, attributes))
            .unwrap_or_default())
    }

    pub fn requested_claims(&self, service_id: &str) -> Result<Vec<String>, DecisionError> {
        let service = self.lookup(service_id)?;

        Ok(service
            .attribute_release_policy
            .as_ref()
            .map(|policy| policy.requested_attribute_definitions())
            .unwrap_or_default())
    }
}
