//! Solver dispatch
//!
//! Persists the assembled payload to blob storage, then submits the solve
//! request. The persisted superset is the source of truth: once the blob
//! write succeeds, a failed solver POST is surfaced (never swallowed) so an
//! external reconciler can retry dispatch from the stored key.

use std::sync::Arc;

use tessera_domain::constants::SHORT_WINDOW_DAYS;
use tessera_domain::{
    AssembledPlan, DispatchReceipt, PlannerPayload, PlannerRequestBody, Result, SolverConfig,
};
use tracing::{error, info};
use uuid::Uuid;

use super::ports::{PayloadStore, SolverClient};

/// Persists assembled plans and submits solve requests.
pub struct SolverDispatcher {
    payloads: Arc<dyn PayloadStore>,
    solver: Arc<dyn SolverClient>,
    config: SolverConfig,
}

impl SolverDispatcher {
    pub fn new(
        payloads: Arc<dyn PayloadStore>,
        solver: Arc<dyn SolverClient>,
        config: SolverConfig,
    ) -> Self {
        Self { payloads, solver, config }
    }

    /// Persist the plan under `{host_id}/{singleton_id}.json` and POST the
    /// solve request with a window-size-dependent duration budget.
    pub async fn dispatch(&self, plan: &AssembledPlan) -> Result<DispatchReceipt> {
        let singleton_id = Uuid::new_v4().to_string();
        let file_key = format!("{}/{}.json", plan.host_id, singleton_id);

        let payload = PlannerPayload {
            singleton_id: singleton_id.clone(),
            host_id: plan.host_id.clone(),
            event_parts: plan.event_parts.clone(),
            all_events: plan.all_events.clone(),
            breaks: plan.breaks.clone(),
            old_events: plan.old_events.clone(),
            old_attendee_events: plan.old_attendee_events.clone(),
            new_host_buffer_times: plan.new_host_buffer_times.clone(),
            new_host_reminders: plan.new_host_reminders.clone(),
            host_timezone: plan.host_timezone,
        };

        // Dispatch depends on the persisted key; a failed write aborts the run
        self.payloads.put_payload(&file_key, &payload).await?;

        let window_days = (plan.window_end_date - plan.window_start_date).num_days();
        let delay = if window_days < SHORT_WINDOW_DAYS {
            self.config.short_duration_secs
        } else {
            self.config.duration_secs
        };

        let request = PlannerRequestBody {
            singleton_id: singleton_id.clone(),
            host_id: plan.host_id.clone(),
            timeslots: plan.timeslots.clone(),
            user_list: plan.user_list.clone(),
            event_parts: plan.event_parts.clone(),
            file_key: file_key.clone(),
            delay,
            call_back_url: self.config.callback_url.clone(),
        };

        if let Err(err) = self.solver.solve_day(&request).await {
            // The payload is persisted; surface the failure so an external
            // reconciler can retry dispatch from the blob
            error!(%singleton_id, %file_key, error = %err, "solver dispatch failed after persist");
            return Err(err);
        }

        info!(%singleton_id, %file_key, delay, "solver request submitted");
        Ok(DispatchReceipt { singleton_id, file_key })
    }
}
