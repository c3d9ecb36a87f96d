//! Remote agent transport
//!
//! The natural-language-to-plan agent is a remote service; this crate owns
//! the request/response contract and an HTTP implementation. Everything else
//! in the workspace talks to the [`AgentClient`] trait so sessions can be
//! exercised against scripted agents in tests.

pub mod http;

pub use http::HttpAgentClient;

use async_trait::async_trait;
use pv_core::{Dataset, Plan, RenderSpec};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from talking to the remote agent
#[derive(Error, Debug)]
pub enum AgentError {
    /// Non-2xx response; the status code is the whole user-visible message.
    #[error("{0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Response to a chat turn.
///
/// Every optional field means "unchanged" when absent: the client keeps its
/// current plan, specification or dataset rather than clearing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurnResponse {
    pub answer: String,
    #[serde(rename = "vegaLiteSpec", default, skip_serializing_if = "Option::is_none")]
    pub vega_lite_spec: Option<RenderSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Dataset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
}

/// Response to a deterministic chart request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResponse {
    #[serde(rename = "vegaLiteSpec")]
    pub vega_lite_spec: RenderSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Dataset>,
}

/// Parameters for the field-distribution chart request.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldChartParams {
    pub year_from: i32,
    pub year_to: i32,
    pub field_level: u32,
    pub field_score_min: f64,
    pub top_k: u32,
}

/// Client for the remote conversational agent
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Submit one chat turn; `prev_plan` is the conversational memory.
    async fn chat(
        &self,
        message: &str,
        prev_plan: Option<&Plan>,
    ) -> Result<ChatTurnResponse, AgentError>;

    /// Request a publications-per-year chart for a fixed year window.
    async fn year_series(&self, year_from: i32, year_to: i32)
        -> Result<ChartResponse, AgentError>;

    /// Request a field-distribution chart.
    async fn field_distribution(
        &self,
        params: FieldChartParams,
    ) -> Result<ChartResponse, AgentError>;
}
