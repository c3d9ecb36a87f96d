//! Pure export transforms

use pv_core::{Dataset, Plan, RenderSpec};
use pv_render::RenderInstance;
use serde::Serialize;
use serde_json::Value;

use crate::ExportError;

#[derive(Serialize)]
struct DataExport<'a> {
    plan: &'a Plan,
    data: &'a Dataset,
}

#[derive(Serialize)]
struct SpecExport<'a> {
    plan: &'a Plan,
    #[serde(rename = "renderingSpec")]
    rendering_spec: &'a RenderSpec,
}

/// Serialize `{plan, data}` as pretty JSON with stable key order.
pub fn data_json(plan: &Plan, data: &Dataset) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec_pretty(&DataExport { plan, data })?)
}

/// Serialize `{plan, renderingSpec}` as pretty JSON.
pub fn spec_json(plan: &Plan, spec: &RenderSpec) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec_pretty(&SpecExport {
        plan,
        rendering_spec: spec,
    })?)
}

/// Encode the dataset as delimited text.
///
/// The first record's keys, in that record's order, form the header and the
/// authoritative column layout: later records render missing keys as empty
/// cells and keys beyond the header are dropped. Quoting follows the usual
/// rule (quote on comma, quote or line break; embedded quotes doubled),
/// which is what the csv writer does by default.
pub fn data_csv(data: &Dataset) -> Result<Vec<u8>, ExportError> {
    let records = data.records();
    let first = records.first().ok_or(ExportError::EmptyDataset)?;
    let header: Vec<&String> = first.keys().collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header.iter().map(|key| key.as_str()))?;
    for record in records {
        writer.write_record(header.iter().map(|key| cell_text(record.get(key.as_str()))))?;
    }
    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}

/// Rasterize the live instance as PNG bytes.
///
/// An instance finalized mid-export fails the whole export; no partial file
/// is ever delivered.
pub async fn image_png(instance: &dyn RenderInstance) -> Result<Vec<u8>, ExportError> {
    Ok(instance.to_png().await?)
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset(value: Value) -> Dataset {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn csv_header_follows_first_record_key_order() {
        let data = dataset(json!([
            {"year": 2020, "count": 5},
            {"year": 2021, "count": 9}
        ]));
        let bytes = data_csv(&data).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "year,count\n2020,5\n2021,9\n"
        );
    }

    #[test]
    fn csv_quotes_and_doubles_embedded_quotes() {
        let data = dataset(json!([{"name": "a,\"b\"\nc"}]));
        let bytes = data_csv(&data).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "name\n\"a,\"\"b\"\"\nc\"\n"
        );
    }

    #[test]
    fn csv_missing_keys_render_empty_and_extra_keys_drop() {
        let data = dataset(json!([
            {"year": 2020, "count": 5},
            {"year": 2021, "doctype": "book"},
            {"count": null, "year": 2022}
        ]));
        let bytes = data_csv(&data).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "year,count\n2020,5\n2021,\n2022,\n"
        );
    }

    #[test]
    fn csv_rejects_empty_dataset() {
        let err = data_csv(&Dataset::default()).unwrap_err();
        assert!(matches!(err, ExportError::EmptyDataset));
    }

    #[test]
    fn data_json_keeps_plan_before_data() {
        let plan = Plan::quick_year();
        let data = dataset(json!([{"year": 2020, "count": 5}]));
        let text = String::from_utf8(data_json(&plan, &data).unwrap()).unwrap();
        let plan_at = text.find("\"plan\"").unwrap();
        let data_at = text.find("\"data\"").unwrap();
        assert!(plan_at < data_at, "stable top-level key order");
        assert!(text.contains("\"papers_by_year\""));
    }

    #[test]
    fn spec_json_carries_rendering_spec_verbatim() {
        let plan = Plan::quick_field();
        let spec = RenderSpec::new(json!({"mark": "bar", "encoding": {"x": {"field": "field"}}}));
        let value: Value =
            serde_json::from_slice(&spec_json(&plan, &spec).unwrap()).unwrap();
        assert_eq!(value["renderingSpec"]["mark"], "bar");
        assert_eq!(value["plan"]["chart_type"], "papers_by_field");
    }
}
