//! The chat session: ordered turns, current chart state, single-flight I/O

use parking_lot::RwLock;
use pv_agent::{AgentClient, ChartResponse, FieldChartParams};
use pv_core::plan::{
    QUICK_FIELD_LEVEL, QUICK_FIELD_SCORE_MIN, QUICK_TOP_K, QUICK_YEAR_FROM, QUICK_YEAR_TO,
};
use pv_core::{Dataset, Plan, RenderSpec, Selection, Turn};
use pv_export::{Delivery, ExportFormat};
use pv_render::{ChartRenderer, InstanceSubscriber, RenderSession, SelectionChannel};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::query::selection_to_query;
use crate::SessionError;

#[derive(Default)]
struct SessionState {
    plan: Option<Plan>,
    spec: Option<RenderSpec>,
    dataset: Option<Dataset>,
    history: Vec<Turn>,
}

/// One user's conversational charting session.
///
/// Owns every piece of mutable session state: plan, rendering specification,
/// dataset, turn history, the live instance (through the render session) and
/// the current selection (through the selection channel). Submissions are
/// single-flight: a call arriving while another is outstanding is rejected
/// with [`SessionError::Busy`] and has no observable effect.
pub struct ChatSession {
    agent: Arc<dyn AgentClient>,
    render: Arc<RenderSession>,
    selection: Arc<SelectionChannel>,
    state: RwLock<SessionState>,
    in_flight: AtomicBool,
}

/// Releases the single-flight flag when the submission settles, success or
/// failure.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ChatSession {
    pub fn new(agent: Arc<dyn AgentClient>, renderer: Arc<dyn ChartRenderer>) -> Self {
        let render = Arc::new(RenderSession::new(renderer));
        let selection = SelectionChannel::new();
        let subscriber: Arc<dyn InstanceSubscriber> = selection.clone();
        render.subscribe(subscriber);
        Self {
            agent,
            render,
            selection,
            state: RwLock::new(SessionState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Submit one chat turn and apply its effects.
    ///
    /// On success: both turns are appended, any returned plan (validated),
    /// specification and dataset replace the current ones, the selection is
    /// cleared and a returned specification is mounted. On agent or plan
    /// failure nothing is mutated. A mount failure is surfaced after the
    /// conversational state has been committed: it costs the chart, not the
    /// turn.
    ///
    /// The returned plan is taken as authoritative even if the specification
    /// implies a different chart type; reconciling the two is the backend
    /// contract's open question and the client does not guess.
    pub async fn submit(&self, text: &str) -> Result<String, SessionError> {
        let message = text.trim();
        if message.is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        let _flight = self.begin_flight()?;

        let prev_plan = self.state.read().plan.clone();
        let response = self.agent.chat(message, prev_plan.as_ref()).await?;
        let plan = match response.plan {
            Some(plan) => Some(plan.validated()?),
            None => None,
        };

        {
            let mut state = self.state.write();
            state.history.push(Turn::user(message));
            state.history.push(Turn::assistant(response.answer.clone()));
            if let Some(plan) = plan {
                state.plan = Some(plan);
            }
            if let Some(data) = response.data {
                state.dataset = Some(data);
            }
            if let Some(spec) = &response.vega_lite_spec {
                state.spec = Some(spec.clone());
            }
        }
        self.selection.clear();
        info!(chars = response.answer.len(), "chat turn applied");

        if let Some(spec) = &response.vega_lite_spec {
            self.render.mount(spec).await?;
        }
        Ok(response.answer)
    }

    /// Load the publications-per-year chart with canonical defaults.
    ///
    /// Deterministic shortcut: the installed plan is always
    /// [`Plan::quick_year`], never one inferred server-side.
    pub async fn load_by_year(&self) -> Result<(), SessionError> {
        let _flight = self.begin_flight()?;
        let response = self.agent.year_series(QUICK_YEAR_FROM, QUICK_YEAR_TO).await?;
        self.install_chart(Plan::quick_year(), response).await
    }

    /// Load the field-distribution chart with canonical defaults.
    pub async fn load_by_field(&self) -> Result<(), SessionError> {
        let _flight = self.begin_flight()?;
        let params = FieldChartParams {
            year_from: QUICK_YEAR_FROM,
            year_to: QUICK_YEAR_TO,
            field_level: QUICK_FIELD_LEVEL,
            field_score_min: QUICK_FIELD_SCORE_MIN,
            top_k: QUICK_TOP_K,
        };
        let response = self.agent.field_distribution(params).await?;
        self.install_chart(Plan::quick_field(), response).await
    }

    async fn install_chart(
        &self,
        plan: Plan,
        response: ChartResponse,
    ) -> Result<(), SessionError> {
        {
            let mut state = self.state.write();
            state.plan = Some(plan);
            state.spec = Some(response.vega_lite_spec.clone());
            if let Some(data) = response.data {
                state.dataset = Some(data);
            }
        }
        self.selection.clear();
        self.render.mount(&response.vega_lite_spec).await?;
        Ok(())
    }

    fn begin_flight(&self) -> Result<FlightGuard<'_>, SessionError> {
        match self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        {
            Ok(_) => Ok(FlightGuard(&self.in_flight)),
            Err(_) => {
                debug!("submission rejected, one already in flight");
                Err(SessionError::Busy)
            }
        }
    }

    /// Turn the current selection and plan into a follow-up request string.
    ///
    /// Populates the input channel only; never auto-submits.
    pub fn use_selection_as_input(&self) -> Option<String> {
        let selection = self.selection.current()?;
        let state = self.state.read();
        selection_to_query(&selection, state.plan.as_ref()?)
    }

    /// The most recently picked mark's attributes, if any.
    pub fn selection(&self) -> Option<Selection> {
        self.selection.current()
    }

    /// Explicitly drop the current selection.
    pub fn clear_selection(&self) {
        self.selection.clear();
    }

    pub fn plan(&self) -> Option<Plan> {
        self.state.read().plan.clone()
    }

    pub fn spec(&self) -> Option<RenderSpec> {
        self.state.read().spec.clone()
    }

    pub fn dataset(&self) -> Option<Dataset> {
        self.state.read().dataset.clone()
    }

    pub fn history(&self) -> Vec<Turn> {
        self.state.read().history.clone()
    }

    /// Whether a submission is currently outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Tear down the live chart (owning view going away).
    pub fn close(&self) {
        self.render.unmount();
    }

    /// Export `{plan, data}` as JSON. Silently a no-op when plan or dataset
    /// is missing; the action is only offered when both exist.
    pub fn export_data_json(&self, delivery: &dyn Delivery) -> Result<(), SessionError> {
        let state = self.state.read();
        let (Some(plan), Some(data)) = (state.plan.as_ref(), state.dataset.as_ref()) else {
            return Ok(());
        };
        let bytes = pv_export::data_json(plan, data)?;
        self.deliver(delivery, plan, ExportFormat::DataJson, &bytes)
    }

    /// Export the dataset as delimited text. No-op when plan or a non-empty
    /// dataset is missing.
    pub fn export_data_csv(&self, delivery: &dyn Delivery) -> Result<(), SessionError> {
        let state = self.state.read();
        let (Some(plan), Some(data)) = (state.plan.as_ref(), state.dataset.as_ref()) else {
            return Ok(());
        };
        if data.is_empty() {
            return Ok(());
        }
        let bytes = pv_export::data_csv(data)?;
        self.deliver(delivery, plan, ExportFormat::Csv, &bytes)
    }

    /// Export `{plan, renderingSpec}` as JSON. No-op when either is missing.
    pub fn export_spec_json(&self, delivery: &dyn Delivery) -> Result<(), SessionError> {
        let state = self.state.read();
        let (Some(plan), Some(spec)) = (state.plan.as_ref(), state.spec.as_ref()) else {
            return Ok(());
        };
        let bytes = pv_export::spec_json(plan, spec)?;
        self.deliver(delivery, plan, ExportFormat::SpecJson, &bytes)
    }

    /// Rasterize the live chart as PNG and deliver it. No-op without a live
    /// instance; a failed rasterization surfaces as an error, never a
    /// partial file.
    pub async fn export_image_png(&self, delivery: &dyn Delivery) -> Result<(), SessionError> {
        let Some(instance) = self.render.current() else {
            return Ok(());
        };
        let Some(plan) = self.plan() else {
            return Ok(());
        };
        let bytes = pv_export::image_png(instance.as_ref()).await?;
        self.deliver(delivery, &plan, ExportFormat::Png, &bytes)
    }

    fn deliver(
        &self,
        delivery: &dyn Delivery,
        plan: &Plan,
        format: ExportFormat,
        bytes: &[u8],
    ) -> Result<(), SessionError> {
        let name = pv_export::filename(plan, format);
        if let Err(err) = delivery.deliver(&name, format.mime(), bytes) {
            warn!(%err, name, "export delivery failed");
            return Err(err.into());
        }
        Ok(())
    }
}
