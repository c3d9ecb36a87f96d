//! HTTP implementation of the agent client

use async_trait::async_trait;
use pv_core::Plan;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::{AgentClient, AgentError, ChartResponse, ChatTurnResponse, FieldChartParams};

/// Agent client over request/response JSON HTTP.
///
/// Non-2xx responses are treated uniformly as failures carrying only the
/// status code. No retries and no request cancellation: a superseded call is
/// allowed to complete and its result is discarded by the caller.
#[derive(Clone)]
pub struct HttpAgentClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct ChatTurnRequest<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<&'a Plan>,
}

#[derive(Serialize)]
struct YearChartRequest {
    year_from: i32,
    year_to: i32,
}

impl HttpAgentClient {
    /// Create a client for an agent served under `base_url`
    /// (e.g. `http://localhost:8000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post_json(&self, path: &str, body: &impl Serialize) -> Result<Value, AgentError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "agent request");
        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::Status(status.as_u16()));
        }
        let value = response.json::<Value>().await?;
        Ok(value)
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    async fn chat(
        &self,
        message: &str,
        prev_plan: Option<&Plan>,
    ) -> Result<ChatTurnResponse, AgentError> {
        let body = ChatTurnRequest {
            message,
            plan: prev_plan,
        };
        let value = self.post_json("/api/chat", &body).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn year_series(
        &self,
        year_from: i32,
        year_to: i32,
    ) -> Result<ChartResponse, AgentError> {
        let body = YearChartRequest { year_from, year_to };
        let value = self.post_json("/api/chart/years", &body).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn field_distribution(
        &self,
        params: FieldChartParams,
    ) -> Result<ChartResponse, AgentError> {
        let value = self.post_json("/api/chart/fields", &params).await?;
        Ok(serde_json::from_value(value)?)
    }
}
