use crate::model::{EventKind, SessionEvent};
use crate::util::format::{ACTIVE, NOT_AVAILABLE, UNKNOWN, format_duration, or_placeholder};

/// All events of one logon id (and its linked token), in time order.
#[derive(Clone, Debug)]
pub struct SessionDetail {
    pub events: Vec<SessionEvent>,
    login: Option<usize>,
    logout: Option<usize>,
}

impl SessionDetail {
    pub fn assemble(mut events: Vec<SessionEvent>) -> Self {
        events.sort_by_key(|ev| ev.timestamp);
        let login = events.iter().position(|ev| ev.kind == EventKind::Login);
        let logout = events.iter().position(|ev| ev.kind == EventKind::Logoff);
        Self {
            events,
            login,
            logout,
        }
    }

    pub fn login(&self) -> Option<&SessionEvent> {
        self.login.map(|i| &self.events[i])
    }

    pub fn logout(&self) -> Option<&SessionEvent> {
        self.logout.map(|i| &self.events[i])
    }

    /// Minutes between the first login and the first logoff.
    pub fn duration_minutes(&self) -> Option<f64> {
        let login = self.login()?;
        let logout = self.logout()?;
        Some(login.timestamp.minutes_until(logout.timestamp))
    }

    /// Formatted duration. `Active` until both a login and a logoff are seen,
    /// `N/A` when the logoff precedes the login.
    pub fn duration_label(&self) -> String {
        match self.duration_minutes() {
            Some(minutes) => format_duration(Some(minutes), NOT_AVAILABLE),
            None => ACTIVE.to_string(),
        }
    }

    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let login = self.login();
        vec![
            (
                "User",
                or_placeholder(login.and_then(|l| l.username.as_deref()), UNKNOWN).to_string(),
            ),
            (
                "Session ID",
                or_placeholder(login.map(|l| l.logon_id.as_str()), UNKNOWN).to_string(),
            ),
            (
                "Linked ID",
                or_placeholder(login.and_then(|l| l.linked_logon_id.as_deref()), "None")
                    .to_string(),
            ),
            (
                "Workstation",
                or_placeholder(login.and_then(|l| l.workstation.as_deref()), NOT_AVAILABLE)
                    .to_string(),
            ),
            ("Duration", self.duration_label()),
            (
                "Logon Type",
                login
                    .and_then(|l| l.logon_type.as_ref())
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            ),
        ]
    }

    /// Logon id shown in the window title.
    pub fn title_id(&self) -> &str {
        self.login()
            .or(self.events.first())
            .map(|ev| ev.logon_id.as_str())
            .unwrap_or(UNKNOWN)
    }
}
