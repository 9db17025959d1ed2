//! Request assembly and dispatch
//!
//! The assembler runs the preparation chain per attendee population and
//! produces one deduplicated solver plan; the dispatcher persists it and
//! submits the solve request. `PreparationPipeline` composes the two with
//! category defaulting into the single entry point callers use.

pub mod dispatch;
pub mod ports;
pub mod service;

use std::sync::Arc;

use tessera_domain::{DispatchReceipt, Granularity, Result, TesseraError};
use tracing::warn;

use crate::category::service::CategoryService;
use dispatch::SolverDispatcher;
use service::{AssemblyRequest, RequestAssembler};

/// Top-level orchestration: category defaulting, assembly, persist+dispatch.
pub struct PreparationPipeline {
    assembler: RequestAssembler,
    dispatcher: SolverDispatcher,
    categories: CategoryService,
    store: Arc<dyn ports::SchedulingStore>,
}

impl PreparationPipeline {
    pub fn new(
        assembler: RequestAssembler,
        dispatcher: SolverDispatcher,
        categories: CategoryService,
        store: Arc<dyn ports::SchedulingStore>,
    ) -> Self {
        Self { assembler, dispatcher, categories, store }
    }

    /// Run preparation for a stored meeting negotiation: loads the window
    /// and attendee list, splits attendees into internal and external, and
    /// runs the full pipeline.
    pub async fn run_for_meeting(
        &self,
        meeting_id: &str,
        granularity: Granularity,
    ) -> Result<DispatchReceipt> {
        let Some(meeting) = self.store.get_meeting_assist(meeting_id).await? else {
            return Err(TesseraError::NotFound(format!("meeting assist {meeting_id}")));
        };
        let attendees = self.store.list_attendees(meeting_id).await?;
        let (external, internal): (Vec<_>, Vec<_>) =
            attendees.into_iter().partition(|a| a.external_attendee);

        self.run(AssemblyRequest {
            host_id: meeting.user_id.clone(),
            window_start: meeting.window_start_date,
            window_end: meeting.window_end_date,
            host_timezone: meeting.timezone,
            internal_attendees: internal,
            external_attendees: external,
            new_host_events: Vec::new(),
            old_events: Vec::new(),
            host_buffer_times: Vec::new(),
            host_reminders: Vec::new(),
            granularity,
        })
        .await
    }

    /// Run one complete scheduling-preparation invocation.
    ///
    /// New host meeting events pass through category defaulting first (which
    /// may weave buffer events); the assembled plan is then persisted and
    /// dispatched. Usage accounting is fire-and-forget.
    pub async fn run(&self, mut request: AssemblyRequest) -> Result<DispatchReceipt> {
        let mut categorized = Vec::with_capacity(request.new_host_events.len());
        for event in std::mem::take(&mut request.new_host_events) {
            let outcome = self.categories.apply_defaults_for_event(event).await?;
            if let Some(buffer) = outcome.buffer {
                request.host_buffer_times.push(buffer);
            }
            request.host_reminders.extend(outcome.reminders);
            categorized.push(outcome.event);
        }
        request.new_host_events = categorized;

        let plan = self.assembler.assemble(&request).await?;
        let receipt = self.dispatcher.dispatch(&plan).await?;

        // Freemium accounting is fire-and-forget relative to the run
        if let Err(err) = self.store.decrement_usage(&request.host_id).await {
            warn!(host_id = %request.host_id, error = %err, "failed to decrement usage counter");
        }

        Ok(receipt)
    }
}
