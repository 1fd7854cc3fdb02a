/*
 * Responsibility
 * - Access decision request/response DTO
 * - validate() for shape checks
 */
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::services::access::AccessRequest;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecisionRequest {
    pub principal_id: String,
    #[serde(default)]
    pub context: Value,
    #[serde(default)]
    pub principal_attributes: BTreeMap<String, Vec<Value>>,
}

impl AccessDecisionRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.principal_id.trim().is_empty() {
            return Err("principalId is required");
        }
        Ok(())
    }

    pub fn into_access_request(self, service_id: &str) -> AccessRequest {
        AccessRequest {
            principal_id: self.principal_id,
            service_id: service_id.to_string(),
            principal_attributes: self.principal_attributes,
            context: self.context,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccessDecisionResponse {
    pub allowed: bool,
}
