//! Dataset backing the current rendering specification

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One homogeneous record: field name to scalar value, in insertion order.
///
/// Key order matters: tabular export takes the first record's key order as
/// the authoritative column layout.
pub type Record = IndexMap<String, Value>;

/// Ordered sequence of records backing the current chart.
///
/// Replaced wholesale whenever a turn delivers new data; may be absent when
/// the rendering specification embeds its own values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset(pub Vec<Record>);

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self(records)
    }

    pub fn records(&self) -> &[Record] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_order_survives_round_trip() {
        let parsed: Dataset =
            serde_json::from_value(json!([{"year": 2020, "count": 5}, {"year": 2021, "count": 9}]))
                .unwrap();
        let keys: Vec<&str> = parsed.records()[0].keys().map(String::as_str).collect();
        assert_eq!(keys, ["year", "count"]);
        assert_eq!(parsed.len(), 2);
    }
}
