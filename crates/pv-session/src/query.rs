//! Selection-to-query translation
//!
//! Maps the current mark selection plus the current plan into a follow-up
//! request string, per chart type. The result only populates the input
//! channel; it is never submitted automatically, so the user can edit it
//! before sending.

use pv_core::{ChartType, Plan, Selection};
use serde_json::Value;

/// Translate a selection into a natural-language follow-up.
///
/// Returns `None` when the chart type has no defined translation for the
/// selection's shape (e.g. a field chart selection without a `field`
/// attribute).
pub fn selection_to_query(selection: &Selection, plan: &Plan) -> Option<String> {
    match plan.chart_type {
        ChartType::PapersByYear => {
            let year = scalar_text(selection.get("year")?);
            // A `group` attribute marks a compare-mode pick: re-scope to the
            // selected year but keep the comparison window from the plan.
            if selection.contains("group") {
                if let (true, Some(from), Some(to)) =
                    (plan.compare, plan.compare_year_from, plan.compare_year_to)
                {
                    return Some(format!(
                        "Show papers from {year} to {year} and compare with {from} to {to}."
                    ));
                }
            }
            Some(format!("Show papers from {year} to {year}."))
        }
        ChartType::PapersByField => {
            let field = scalar_text(selection.get("field")?);
            let mut request = format!(
                "Show papers about \"{field}\" from {} to {}",
                plan.year_from, plan.year_to
            );
            if plan.compare {
                if let (Some(from), Some(to)) = (plan.compare_year_from, plan.compare_year_to) {
                    request.push_str(&format!(" compared with {from} to {to}"));
                }
            }
            request.push_str(&format!(
                ", keeping top_k {}, field_score_min {} and field_level {}.",
                plan.top_k, plan.field_score_min, plan.field_level
            ));
            Some(request)
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn selection(value: serde_json::Value) -> Selection {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn year_chart_rescopes_to_selected_year() {
        let plan = Plan::quick_year();
        let query = selection_to_query(&selection(json!({"year": 2021})), &plan).unwrap();
        assert_eq!(query, "Show papers from 2021 to 2021.");
    }

    #[test]
    fn compare_selection_restates_compare_bounds() {
        let mut plan = Plan::quick_year();
        plan.compare = true;
        plan.compare_year_from = Some(2010);
        plan.compare_year_to = Some(2014);

        let query =
            selection_to_query(&selection(json!({"year": 2022, "group": "2020-2024"})), &plan)
                .unwrap();
        assert_eq!(
            query,
            "Show papers from 2022 to 2022 and compare with 2010 to 2014."
        );
    }

    #[test]
    fn group_without_compare_bounds_falls_back_to_single_year() {
        let plan = Plan::quick_year();
        let query =
            selection_to_query(&selection(json!({"year": 2023, "group": "A"})), &plan).unwrap();
        assert_eq!(query, "Show papers from 2023 to 2023.");
    }

    #[test]
    fn year_chart_without_year_attribute_has_no_translation() {
        let plan = Plan::quick_year();
        assert_eq!(selection_to_query(&selection(json!({"count": 12})), &plan), None);
    }

    #[test]
    fn field_chart_requires_field_attribute() {
        let plan = Plan::quick_field();
        assert_eq!(selection_to_query(&selection(json!({"group": "A"})), &plan), None);
    }

    #[test]
    fn field_chart_restates_numeric_context() {
        let plan = Plan::quick_field();
        let query =
            selection_to_query(&selection(json!({"field": "Biology"})), &plan).unwrap();
        assert_eq!(
            query,
            "Show papers about \"Biology\" from 2020 to 2024, \
             keeping top_k 25, field_score_min 0.3 and field_level 1."
        );
    }

    #[test]
    fn field_chart_in_compare_mode_restates_both_windows() {
        let mut plan = Plan::quick_field();
        plan.compare = true;
        plan.compare_year_from = Some(2015);
        plan.compare_year_to = Some(2019);

        let query =
            selection_to_query(&selection(json!({"field": "History"})), &plan).unwrap();
        assert_eq!(
            query,
            "Show papers about \"History\" from 2020 to 2024 compared with 2015 to 2019, \
             keeping top_k 25, field_score_min 0.3 and field_level 1."
        );
    }
}
