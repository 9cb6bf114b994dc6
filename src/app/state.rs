use crate::analysis::SessionDetail;
use crate::app::fetch::{FetchResult, RequestTracker};
use crate::app::ui_state::{Banner, LegendState, UiState};
use crate::error::DashboardError;
use crate::model::Dataset;

/// What the controller should do after applying a fetch result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FollowUp {
    Refresh,
}

/// Everything the dashboard renders, owned in one place and passed to the
/// render functions.
#[derive(Default)]
pub struct DashboardState {
    pub dataset: Dataset,
    pub users: Vec<String>,
    pub legend: LegendState,
    pub ui: UiState,
    pub detail: Option<SessionDetail>,
    pub banner: Option<Banner>,
    users_req: RequestTracker,
    dashboard_req: RequestTracker,
    detail_req: RequestTracker,
}

impl DashboardState {
    pub fn begin_users(&mut self) -> u64 {
        self.banner = None;
        self.users_req.begin()
    }

    /// Starts a sessions + timeline refresh. Clears any banner on screen.
    pub fn begin_refresh(&mut self) -> u64 {
        self.banner = None;
        self.dashboard_req.begin()
    }

    pub fn begin_session_detail(&mut self) -> u64 {
        self.detail_req.begin()
    }

    /// Loading indicator text while the latest request of some kind is pending.
    pub fn loading_message(&self) -> Option<&'static str> {
        if self.users_req.is_pending() {
            Some("Loading users...")
        } else if self.dashboard_req.is_pending() {
            Some("Loading data...")
        } else if self.detail_req.is_pending() {
            Some("Loading session details...")
        } else {
            None
        }
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    pub fn apply(&mut self, result: FetchResult) -> Option<FollowUp> {
        match result {
            FetchResult::Users { generation, result } => {
                if !self.users_req.complete(generation) {
                    tracing::debug!(generation, "discarding stale users response");
                    return None;
                }
                match result {
                    Ok(users) => {
                        tracing::info!(count = users.len(), "loaded users");
                        self.users = users;
                        Some(FollowUp::Refresh)
                    }
                    Err(err) => {
                        let message = format!("Error loading users: {err}. Please try again later.");
                        self.fail(message, &err);
                        None
                    }
                }
            }
            FetchResult::Dashboard { generation, result } => {
                if !self.dashboard_req.complete(generation) {
                    tracing::debug!(
                        generation,
                        latest = self.dashboard_req.latest(),
                        "discarding stale dashboard response"
                    );
                    return None;
                }
                match result {
                    Ok(payload) => {
                        self.dataset = Dataset::new(payload.sessions, payload.timeline, generation);
                        tracing::info!(
                            generation,
                            sessions = self.dataset.sessions.len(),
                            events = self.dataset.timeline.len(),
                            charted = self.dataset.standard.len(),
                            "dashboard refreshed"
                        );
                        if let Some(id) = &self.ui.selected_session
                            && self.dataset.pairs.get(id).is_none()
                        {
                            self.ui.selected_session = None;
                        }
                    }
                    Err(err) => {
                        let message = format!("Error loading data: {err}. Please try again later.");
                        self.fail(message, &err);
                    }
                }
                None
            }
            FetchResult::SessionEvents {
                generation,
                logon_id,
                result,
            } => {
                if !self.detail_req.complete(generation) {
                    tracing::debug!(generation, %logon_id, "discarding stale session detail");
                    return None;
                }
                let result = result.and_then(|events| {
                    if events.is_empty() {
                        Err(DashboardError::EmptyDataset {
                            what: format!("events for session {logon_id}"),
                        })
                    } else {
                        Ok(events)
                    }
                });
                match result {
                    Ok(events) => {
                        self.detail = Some(SessionDetail::assemble(events));
                        self.ui.show_detail = true;
                    }
                    Err(err) => {
                        let message =
                            format!("Error loading session details: {err}. Please try again.");
                        self.fail(message, &err);
                    }
                }
                None
            }
        }
    }

    fn fail(&mut self, message: String, err: &DashboardError) {
        tracing::error!(
            error = %err,
            network = err.is_network(),
            status = ?err.status(),
            "{message}"
        );
        self.banner = Some(Banner { message });
    }
}
