//! Read-only lookup of registered services and their policies.
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::policy::{AccessStrategy, ReleasePolicy};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredService {
    pub service_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_strategy: Option<AccessStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_release_policy: Option<ReleasePolicy>,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read service registry {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid service registry document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate service id: {0}")]
    Duplicate(String),
    #[error("service registry unavailable: {0}")]
    Unavailable(String),
}

pub trait ServiceRegistry: Send + Sync {
    fn find(&self, service_id: &str) -> Result<Option<Arc<RegisteredService>>, RegistryError>;
}

#[derive(Debug, Deserialize)]
struct RegistryDocument {
    #[serde(default)]
    services: Vec<RegisteredService>,
}

/// Registry held entirely in memory, immutable once built.
#[derive(Clone, Debug, Default)]
pub struct InMemoryServiceRegistry {
    services: HashMap<String, Arc<RegisteredService>>,
}

impl InMemoryServiceRegistry {
    pub fn from_services(
        services: impl IntoIterator<Item = RegisteredService>,
    ) -> Result<Self, RegistryError> {
        let mut by_id = HashMap::new();
        for service in services {
            let id = service.service_id.clone();
            if by_id.insert(id.clone(), Arc::new(service)).is_some() {
                return Err(RegistryError::Duplicate(id));
            }
        }
        Ok(Self { services: by_id })
    }

    /// Parses a `{"services": [...]}` document.
    pub fn from_json(document: &str) -> Result<Self, RegistryError> {
        let doc: RegistryDocument = serde_json::from_str(document)?;
        Self::from_services(doc.services)
    }

    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let document = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&document)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl ServiceRegistry for InMemoryServiceRegistry {
    fn find(&self, service_id: &str) -> Result<Option<Arc<RegisteredService>>, RegistryError> {
        Ok(self.services.get(service_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "services": [
            {
                "serviceId": "portal",
                "name": "Staff portal",
                "accessStrategy": {
                    "@type": "RemoteEndpoint",
                    "endpointUrl": "https://authz.example.org/check",
                    "acceptableResponseCodes": "200"
                },
                "attributeReleasePolicy": {
                    "@type": "OidcScope",
                    "scopeType": "email",
                    "allowedAttributes": ["email"],
                    "claimMappings": {"email": "mail"}
                }
            },
            {"serviceId": "wiki"}
        ]
    }"#;

    #[test]
    fn parses_registry_document() {
        let registry = InMemoryServiceRegistry::from_json(DOCUMENT).unwrap();

        assert_eq!(registry.len(), 2);
        let portal = registry.find("portal").unwrap().unwrap();
        assert!(portal.access_strategy.is_some());
        assert!(matches!(
            portal.attribute_release_policy,
            Some(ReleasePolicy::OidcScope(_))
        ));

        let wiki = registry.find("wiki").unwrap().unwrap();
        assert!(wiki.access_strategy.is_none());
        assert!(registry.find("unknown").unwrap().is_none());
    }

    #[test]
    fn rejects_duplicate_service_ids() {
        let err = InMemoryServiceRegistry::from_json(
            r#"{"services": [{"serviceId": "a"}, {"serviceId": "a"}]}"#,
        )
        .unwrap_err();

        assert!(matches!(err, RegistryError::Duplicate(id) if id == "a"));
    }

    #[test]
    fn rejects_unknown_policy_type() {
        let err = InMemoryServiceRegistry::from_json(
            r#"{"services": [{"serviceId": "a", "accessStrategy": {"@type": "TimeBased"}}]}"#,
        )
        .unwrap_err();

        assert!(matches!(err, RegistryError::Parse(_)));
    }
}
