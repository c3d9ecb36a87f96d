//! Chart plan: the structured description of the currently displayed chart
//!
//! The plan is the only conversational memory sent back to the remote agent.
//! Every path that accepts a plan (server response or local construction)
//! goes through [`Plan::validate`] so an inconsistent plan can never become
//! session state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default year window used by the quick-load entry points.
pub const QUICK_YEAR_FROM: i32 = 2020;
pub const QUICK_YEAR_TO: i32 = 2024;
/// Default field-chart parameters used by the quick-load entry points.
pub const QUICK_FIELD_LEVEL: u32 = 1;
pub const QUICK_FIELD_SCORE_MIN: f64 = 0.3;
pub const QUICK_TOP_K: u32 = 25;

/// Errors raised when a plan violates its invariants
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("year_from {0} is after year_to {1}")]
    YearOrder(i32, i32),

    #[error("compare is enabled but compare bounds are missing")]
    CompareBoundsMissing,

    #[error("compare is disabled but compare bounds are set")]
    CompareBoundsUnexpected,

    #[error("compare_year_from {0} is after compare_year_to {1}")]
    CompareYearOrder(i32, i32),

    #[error("field_score_min {0} is outside [0, 1]")]
    FieldScoreRange(f64),

    #[error("field_level must be positive")]
    FieldLevelZero,

    #[error("top_k must be positive")]
    TopKZero,
}

/// Kind of chart the plan describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    PapersByYear,
    PapersByField,
}

impl ChartType {
    /// Stable token used in export filenames and wire payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::PapersByYear => "papers_by_year",
            ChartType::PapersByField => "papers_by_field",
        }
    }
}

/// Mark type used to draw the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    Bar,
    Line,
    Area,
}

impl Default for Mark {
    fn default() -> Self {
        Mark::Bar
    }
}

/// Structured, serializable description of the current chart
///
/// Field-chart parameters (`field_level`, `field_score_min`, `top_k`) are
/// carried for both chart types so a returned plan can switch type without
/// losing numeric context; they are only interpreted for field charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub chart_type: ChartType,
    pub year_from: i32,
    pub year_to: i32,
    /// Optional document-type filter (e.g. "journal-article")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctype: Option<String>,
    pub field_level: u32,
    pub field_score_min: f64,
    pub top_k: u32,
    /// Optional style token understood by the agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub mark: Mark,
    #[serde(default)]
    pub compare: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_year_from: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_year_to: Option<i32>,
}

impl Plan {
    /// Check every plan invariant.
    ///
    /// Invariants: `year_from <= year_to`; compare bounds are present and
    /// ordered exactly when `compare` is true; `field_score_min` lies in
    /// [0, 1]; `field_level` and `top_k` are positive.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.year_from > self.year_to {
            return Err(PlanError::YearOrder(self.year_from, self.year_to));
        }
        match (self.compare, self.compare_year_from, self.compare_year_to) {
            (true, Some(from), Some(to)) => {
                if from > to {
                    return Err(PlanError::CompareYearOrder(from, to));
                }
            }
            (true, _, _) => return Err(PlanError::CompareBoundsMissing),
            (false, None, None) => {}
            (false, _, _) => return Err(PlanError::CompareBoundsUnexpected),
        }
        if !(0.0..=1.0).contains(&self.field_score_min) {
            return Err(PlanError::FieldScoreRange(self.field_score_min));
        }
        if self.field_level == 0 {
            return Err(PlanError::FieldLevelZero);
        }
        if self.top_k == 0 {
            return Err(PlanError::TopKZero);
        }
        Ok(())
    }

    /// Validate and return the plan, for acceptance paths that consume it.
    pub fn validated(self) -> Result<Self, PlanError> {
        self.validate()?;
        Ok(self)
    }

    /// Canonical plan installed by the year-series quick load.
    pub fn quick_year() -> Self {
        Self {
            chart_type: ChartType::PapersByYear,
            ..Self::quick_defaults()
        }
    }

    /// Canonical plan installed by the field-distribution quick load.
    pub fn quick_field() -> Self {
        Self {
            chart_type: ChartType::PapersByField,
            ..Self::quick_defaults()
        }
    }

    fn quick_defaults() -> Self {
        Self {
            chart_type: ChartType::PapersByYear,
            year_from: QUICK_YEAR_FROM,
            year_to: QUICK_YEAR_TO,
            doctype: None,
            field_level: QUICK_FIELD_LEVEL,
            field_score_min: QUICK_FIELD_SCORE_MIN,
            top_k: QUICK_TOP_K,
            color: None,
            mark: Mark::Bar,
            compare: false,
            compare_year_from: None,
            compare_year_to: None,
        }
    }
}
