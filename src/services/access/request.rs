use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the remote endpoint is told about the principal asking for access.
///
/// Fields left at their default are omitted from the wire form so unset data
/// never leaks to the endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub principal_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub principal_attributes: BTreeMap<String, Vec<Value>>,
    #[serde(default, skip_serializing_if = "is_empty_value")]
    pub context: Value,
}

impl AccessRequest {
    pub fn new(principal_id: impl Into<String>, service_id: impl Into<String>) -> Self {
        Self {
            principal_id: principal_id.into(),
            service_id: service_id.into(),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
