use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Opaque extension data carried on events for downstream consumers.
///
/// The platform core never reads these properties; every field the core
/// depends on is a typed field on the event itself. This bag exists only so
/// plugins can attach data to an attempt and receive it back on the follow-up
/// order-creation event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtraProperties(BTreeMap<String, serde_json::Value>);

impl ExtraProperties {
    /// Creates an empty property bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, replacing any previous value under the same key.
    pub fn set(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.0.insert(key.into(), value);
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Returns true when no properties are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over all properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut props = ExtraProperties::new();
        props.set("coupon", serde_json::json!("WELCOME10"));

        assert_eq!(props.len(), 1);
        assert_eq!(props.get("coupon"), Some(&serde_json::json!("WELCOME10")));
        assert_eq!(props.get("missing"), None);
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut props = ExtraProperties::new();
        props.set("a", serde_json::json!(1));
        props.set("b", serde_json::json!("two"));

        let json = serde_json::to_string(&props).unwrap();
        assert_eq!(json, r#"{"a":1,"b":"two"}"#);

        let back: ExtraProperties = serde_json::from_str(&json).unwrap();
        assert_eq!(back, props);
    }
}
