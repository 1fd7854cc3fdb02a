//! Provider-wide universe of claims advertised in discovery metadata.
use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;

/// Claims advertised by default when nothing is configured.
pub const DEFAULT_SUPPORTED_CLAIMS: &[&str] = &[
    "sub",
    "name",
    "preferred_username",
    "family_name",
    "given_name",
    "middle_name",
    "nickname",
    "profile",
    "picture",
    "website",
    "gender",
    "birthdate",
    "zoneinfo",
    "locale",
    "updated_at",
    "email",
    "email_verified",
    "address",
    "phone_number",
    "phone_number_verified",
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SupportedClaims(BTreeSet<String>);

impl SupportedClaims {
    pub fn contains(&self, claim: &str) -> bool {
        self.0.contains(claim)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SupportedClaims {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// The supported-claims collaborator could not be reached.
#[derive(Debug, Error)]
#[error("configuration unavailable: {0}")]
pub struct ConfigurationUnavailable(pub String);

pub trait SupportedClaimsSource: Send + Sync {
    fn supported_claims(&self) -> Result<Arc<SupportedClaims>, ConfigurationUnavailable>;
}

/// Fixed set taken from configuration at startup.
#[derive(Clone, Debug)]
pub struct StaticSupportedClaims {
    claims: Arc<SupportedClaims>,
}

impl StaticSupportedClaims {
    pub fn new(claims: SupportedClaims) -> Self {
        Self {
            claims: Arc::new(claims),
        }
    }
}

impl Default for StaticSupportedClaims {
    fn default() -> Self {
        Self::new(DEFAULT_SUPPORTED_CLAIMS.iter().copied().collect())
    }
}

impl SupportedClaimsSource for StaticSupportedClaims {
    fn supported_claims(&self) -> Result<Arc<SupportedClaims>, ConfigurationUnavailable> {
        Ok(Arc::clone(&self.claims))
    }
}
