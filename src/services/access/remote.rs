//! Access decisions delegated to a remote HTTP endpoint.
//!
//! The endpoint is probed with the principal id; its response status decides
//! the outcome. A missing response is a deny. Transport and serialization
//! faults are returned as `AccessError` so callers can choose between
//! fail-open and fail-closed (see `FailureMode`).
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::services::access::{
    request::AccessRequest,
    transport::{HttpTransport, ProbeRequest, TransportError},
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAccessPolicy {
    pub endpoint_url: String,
    /// Comma-delimited status codes, e.g. `"200,202"`.
    #[serde(default)]
    pub acceptable_response_codes: String,
}

impl RemoteAccessPolicy {
    pub fn new(endpoint_url: impl Into<String>, acceptable_response_codes: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            acceptable_response_codes: acceptable_response_codes.into(),
        }
    }

    pub fn acceptable_codes(&self) -> BTreeSet<&str> {
        self.acceptable_response_codes
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .collect()
    }

    pub fn accepts(&self, status: u16) -> bool {
        self.acceptable_codes().contains(status.to_string().as_str())
    }
}

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("invalid endpoint url {url}: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to serialize access request: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// How a caller treats an evaluation fault.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Hand the fault to the caller.
    #[default]
    Propagate,
    /// Fail closed.
    Deny,
    /// Fail open.
    Allow,
}

impl FailureMode {
    pub fn apply(self, outcome: Result<bool, AccessError>) -> Result<bool, AccessError> {
        match (self, outcome) {
            (_, Ok(allowed)) => Ok(allowed),
            (Self::Propagate, Err(err)) => Err(err),
            (Self::Deny, Err(err)) => {
                warn!(error = %err, "remote access evaluation failed; denying access");
                Ok(false)
            }
            (Self::Allow, Err(err)) => {
                warn!(error = %err, "remote access evaluation failed; allowing access");
                Ok(true)
            }
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown failure mode: {0}")]
pub struct UnknownFailureMode(pub String);

impl FromStr for FailureMode {
    type Err = UnknownFailureMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "propagate" => Ok(Self::Propagate),
            "deny" | "closed" => Ok(Self::Deny),
            "allow" | "open" => Ok(Self::Allow),
            _ => Err(UnknownFailureMode(s.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct RemoteAccessEvaluator {
    transport: Arc<dyn HttpTransport>,
}

impl RemoteAccessEvaluator {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    pub async fn evaluate(
        &self,
        policy: &RemoteAccessPolicy,
        request: &AccessRequest,
    ) -> Result<bool, AccessError> {
        let body = serde_json::to_string(request)?;
        let url = Url::parse(&policy.endpoint_url).map_err(|source| AccessError::InvalidEndpoint {
            url: policy.endpoint_url.clone(),
            source,
        })?;

        let probe = ProbeRequest {
            url,
            username: request.principal_id.clone(),
            body,
        };

        let Some(status) = self.transport.execute(probe).await? else {
            info!(
                principal = %request.principal_id,
                endpoint = %policy.endpoint_url,
                "no response from remote endpoint; denying access"
            );
            return Ok(false);
        };

        let allowed = policy.accepts(status);
        debug!(
            principal = %request.principal_id,
            endpoint = %policy.endpoint_url,
            status,
            allowed,
            "remote endpoint answered"
        );
        Ok(allowed)
    }
}
