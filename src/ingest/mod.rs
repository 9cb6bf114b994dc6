pub mod api;
pub mod snapshot;
pub mod stories;

use crate::error::DashboardResult;
use crate::model::{Session, SessionEvent};

/// Where dashboard data comes from: the live backend or an events export.
///
/// Implementations are called from fetch worker threads.
pub trait SessionSource: Send + Sync {
    fn users(&self) -> DashboardResult<Vec<String>>;

    fn sessions(&self, user: Option<&str>) -> DashboardResult<Vec<Session>>;

    fn timeline(&self, user: Option<&str>) -> DashboardResult<Vec<SessionEvent>>;

    /// Events of one logon id, optionally narrowed to a user.
    fn session_events(
        &self,
        logon_id: &str,
        user: Option<&str>,
    ) -> DashboardResult<Vec<SessionEvent>>;

    /// Short description for logs and the status bar.
    fn describe(&self) -> String;
}
