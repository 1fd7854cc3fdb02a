use std::collections::BTreeMap;

use crate::services::claims::scope::ScopePolicy;

/// Claim -> attribute name lookup for a registered service.
///
/// Lookups are pure table reads; "no mapping" is a normal answer, not an error.
pub trait ClaimMapper: Send + Sync {
    fn contains_mapped_attribute(&self, claim: &str, service: &ScopePolicy) -> bool {
        self.mapped_attribute(claim, service).is_some()
    }

    fn mapped_attribute(&self, claim: &str, service: &ScopePolicy) -> Option<String>;
}

/// Default mapper: the service's own `claimMappings` first, then the
/// provider-wide table.
#[derive(Clone, Debug, Default)]
pub struct DefaultClaimMapper {
    global: BTreeMap<String, String>,
}

impl DefaultClaimMapper {
    pub fn new(global: BTreeMap<String, String>) -> Self {
        Self { global }
    }
}

impl ClaimMapper for DefaultClaimMapper {
    fn mapped_attribute(&self, claim: &str, service: &ScopePolicy) -> Option<String> {
        service
            .claim_mappings
            .get(claim)
            .or_else(|| self.global.get(claim))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("email".to_string(), "mail".to_string()),
            ("name".to_string(), "displayName".to_string()),
        ])
    }

    #[test]
    fn service_mapping_wins_over_global() {
        let mapper = DefaultClaimMapper::new(global());
        let policy = ScopePolicy::email().with_mapping("email", "primaryMail");

        assert_eq!(
            mapper.mapped_attribute("email", &policy).as_deref(),
            Some("primaryMail")
        );
        assert_eq!(
            mapper.mapped_attribute("name", &policy).as_deref(),
            Some("displayName")
        );
    }

    #[test]
    fn absent_entry_is_not_an_error() {
        let mapper = DefaultClaimMapper::default();
        let policy = ScopePolicy::email();

        assert!(!mapper.contains_mapped_attribute("email", &policy));
        assert!(mapper.mapped_attribute("email", &policy).is_none());
    }

    #[test]
    fn claim_names_are_case_sensitive() {
        let mapper = DefaultClaimMapper::default();
        let policy = ScopePolicy::email().with_mapping("email", "mail");

        assert!(mapper.contains_mapped_attribute("email", &policy));
        assert!(!mapper.contains_mapped_attribute("Email", &policy));
    }
}
