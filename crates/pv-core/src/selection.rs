//! Mark selection state

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attributes of the most recently picked mark (e.g. `year`, `group`,
/// `field`).
///
/// A selection only exists while the chart that produced it is live; the
/// session clears it when a turn completes, the user clears it, or the live
/// instance is replaced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(pub IndexMap<String, Value>);

impl Selection {
    /// Normalize a raw signal payload into a selection.
    ///
    /// Absent, null, empty or non-object payloads mean "nothing selected".
    pub fn from_payload(payload: Option<Value>) -> Option<Self> {
        match payload {
            Some(Value::Object(map)) if !map.is_empty() => {
                Some(Self(map.into_iter().collect()))
            }
            _ => None,
        }
    }

    pub fn get(&self, attr: &str) -> Option<&Value> {
        self.0.get(attr)
    }

    pub fn contains(&self, attr: &str) -> bool {
        self.0.contains_key(attr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_payload_becomes_selection() {
        let sel = Selection::from_payload(Some(json!({"year": 2021, "group": "A"}))).unwrap();
        assert_eq!(sel.get("year"), Some(&json!(2021)));
        assert!(sel.contains("group"));
    }

    #[test]
    fn empty_or_missing_payload_is_none() {
        assert_eq!(Selection::from_payload(None), None);
        assert_eq!(Selection::from_payload(Some(json!(null))), None);
        assert_eq!(Selection::from_payload(Some(json!({}))), None);
        assert_eq!(Selection::from_payload(Some(json!([1, 2]))), None);
    }
}
