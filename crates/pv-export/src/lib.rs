//! Export codecs for the current chart snapshot
//!
//! Pure transforms from the session's `{plan, spec, dataset, instance}`
//! snapshot to downloadable byte payloads, plus the client-local delivery
//! primitive. Filenames derive deterministically from the plan so the same
//! chart always exports under the same name.

pub mod codec;
pub mod delivery;

pub use codec::{data_csv, data_json, image_png, spec_json};
pub use delivery::{Delivery, DirectoryDelivery};

use pv_core::Plan;
use thiserror::Error;

/// Errors from export codecs and delivery
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("dataset is empty")]
    EmptyDataset,

    #[error("CSV encoding error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image export failed: {0}")]
    Image(#[from] pv_render::RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    DataJson,
    Csv,
    SpecJson,
    Png,
}

impl ExportFormat {
    /// Fixed filename suffix per format.
    pub fn suffix(&self) -> &'static str {
        match self {
            ExportFormat::DataJson => ".data.json",
            ExportFormat::Csv => ".csv",
            ExportFormat::SpecJson => ".spec.json",
            ExportFormat::Png => ".png",
        }
    }

    /// Content type handed to the delivery primitive.
    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::DataJson | ExportFormat::SpecJson => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Png => "image/png",
        }
    }
}

/// Derive the export filename from the plan.
///
/// Reproducible: the same plan always yields the same name.
pub fn filename(plan: &Plan, format: ExportFormat) -> String {
    format!(
        "{}_{}-{}{}",
        plan.chart_type.as_str(),
        plan.year_from,
        plan.year_to,
        format.suffix()
    )
}
