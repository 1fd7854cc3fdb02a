//! Case-insensitive view over a principal's resolved attributes.
//!
//! Responsibility:
//! - Hold attribute values gathered upstream for a single request.
//! - Answer lookups regardless of the case the caller uses for the name.
//!
//! The first spelling of a name is kept for display; a later insertion whose
//! name differs only by case replaces the values.
use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedAttributes {
    // folded name -> (original name, values)
    entries: BTreeMap<String, (String, Vec<Value>)>,
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}

impl ResolvedAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<Value>) {
        let name = name.into();
        match self.entries.get_mut(&fold(&name)) {
            Some(entry) => entry.1 = values,
            None => {
                self.entries.insert(fold(&name), (name, values));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&[Value]> {
        self.entries
            .get(&fold(name))
            .map(|(_, values)| values.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&fold(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attribute names in their original spelling.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|(name, _)| name.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<Value>)> for ResolvedAttributes {
    fn from_iter<I: IntoIterator<Item = (K, Vec<Value>)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (name, values) in iter {
            attributes.insert(name, values);
        }
        attributes
    }
}

impl Serialize for ResolvedAttributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.values().map(|(k, v)| (k, v)))
    }
}

impl<'de> Deserialize<'de> for ResolvedAttributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Document order decides which case variant wins.
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(name, value)| present_values(value).map(|values| (name, values)))
            .collect())
    }
}

/// Single values are wrapped, lists are taken as-is. `null` is an absent
/// value: a null scalar or a list holding only nulls yields `None`.
fn present_values(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Null => None,
        Value::Array(values) if values.is_empty() => Some(values),
        Value::Array(values) => {
            let values: Vec<Value> = values.into_iter().filter(|v| !v.is_null()).collect();
            (!values.is_empty()).then_some(values)
        }
        other => Some(vec![other]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_ignores_case() {
        let attrs: ResolvedAttributes = [("Email", vec![json!("a@b.com")])].into_iter().collect();

        assert!(attrs.contains("email"));
        assert!(attrs.contains("EMAIL"));
        assert_eq!(attrs.get("email"), Some(&[json!("a@b.com")][..]));
    }

    #[test]
    fn later_insert_replaces_values_but_keeps_first_spelling() {
        let mut attrs = ResolvedAttributes::new();
        attrs.insert("Mail", vec![json!("old@b.com")]);
        attrs.insert("MAIL", vec![json!("new@b.com")]);

        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.names().collect::<Vec<_>>(), vec!["Mail"]);
        assert_eq!(attrs.get("mail"), Some(&[json!("new@b.com")][..]));
    }

    #[test]
    fn deserialize_wraps_scalar_values() {
        let attrs: ResolvedAttributes =
            serde_json::from_value(json!({"groups": ["a", "b"], "uid": "casuser"})).unwrap();

        assert_eq!(attrs.get("groups").unwrap().len(), 2);
        assert_eq!(attrs.get("UID"), Some(&[json!("casuser")][..]));
    }

    #[test]
    fn deserialize_follows_document_order_for_case_variants() {
        let attrs: ResolvedAttributes =
            serde_json::from_str(r#"{"mail": ["first"], "MAIL": ["later"]}"#).unwrap();

        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.names().collect::<Vec<_>>(), vec!["mail"]);
        assert_eq!(attrs.get("Mail"), Some(&[json!("later")][..]));
    }

    #[test]
    fn deserialize_treats_null_as_absent() {
        let attrs: ResolvedAttributes = serde_json::from_value(json!({
            "email": null,
            "phone": [null],
            "groups": ["a", null],
            "roles": []
        }))
        .unwrap();

        assert!(!attrs.contains("email"));
        assert!(!attrs.contains("phone"));
        assert_eq!(attrs.get("groups"), Some(&[json!("a")][..]));
        assert_eq!(attrs.get("roles"), Some(&[] as &[Value]));
    }
}
