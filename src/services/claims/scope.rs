//! Scope-based release configuration for a registered service.
use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

pub const SCOPE_OPENID: &str = "openid";
pub const SCOPE_PROFILE: &str = "profile";
pub const SCOPE_EMAIL: &str = "email";
pub const SCOPE_ADDRESS: &str = "address";
pub const SCOPE_PHONE: &str = "phone";

const OPENID_CLAIMS: &[&str] = &["sub"];
const PROFILE_CLAIMS: &[&str] = &[
    "name",
    "family_name",
    "given_name",
    "middle_name",
    "nickname",
    "preferred_username",
    "profile",
    "picture",
    "website",
    "gender",
    "birthdate",
    "zoneinfo",
    "locale",
    "updated_at",
];
const EMAIL_CLAIMS: &[&str] = &["email", "email_verified"];
const ADDRESS_CLAIMS: &[&str] = &["address"];
const PHONE_CLAIMS: &[&str] = &["phone_number", "phone_number_verified"];

/// Claims a service may receive for one scope, plus its claim -> attribute
/// renames.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopePolicy {
    pub scope_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_attributes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub claim_mappings: BTreeMap<String, String>,
}

impl ScopePolicy {
    pub fn custom<I, S>(scope_type: impl Into<String>, claims: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scope_type: scope_type.into(),
            allowed_attributes: Some(claims.into_iter().map(Into::into).collect()),
            claim_mappings: BTreeMap::new(),
        }
    }

    pub fn openid() -> Self {
        Self::custom(SCOPE_OPENID, OPENID_CLAIMS.iter().copied())
    }

    pub fn profile() -> Self {
        Self::custom(SCOPE_PROFILE, PROFILE_CLAIMS.iter().copied())
    }

    pub fn email() -> Self {
        Self::custom(SCOPE_EMAIL, EMAIL_CLAIMS.iter().copied())
    }

    pub fn address() -> Self {
        Self::custom(SCOPE_ADDRESS, ADDRESS_CLAIMS.iter().copied())
    }

    pub fn phone() -> Self {
        Self::custom(SCOPE_PHONE, PHONE_CLAIMS.iter().copied())
    }

    /// Preset for a standard OpenID Connect scope name.
    pub fn standard(scope: &str) -> Option<Self> {
        match scope {
            SCOPE_OPENID => Some(Self::openid()),
            SCOPE_PROFILE => Some(Self::profile()),
            SCOPE_EMAIL => Some(Self::email()),
            SCOPE_ADDRESS => Some(Self::address()),
            SCOPE_PHONE => Some(Self::phone()),
            _ => None,
        }
    }

    pub fn with_mapping(mut self, claim: impl Into<String>, attribute: impl Into<String>) -> Self {
        self.claim_mappings.insert(claim.into(), attribute.into());
        self
    }

    /// Allowed claims with duplicates collapsed to their first occurrence.
    pub fn allowed_claims(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.allowed_attributes
            .iter()
            .flatten()
            .map(String::as_str)
            .filter(|claim| seen.insert(*claim))
            .collect()
    }

    /// The claim names this scope asks for, verbatim. Never absent: an unset
    /// list comes back empty.
    pub fn determine_requested_attribute_definitions(&self) -> Vec<String> {
        self.allowed_attributes.clone().unwrap_or_default()
    }
}
