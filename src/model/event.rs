use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::de;
use crate::util::time::Timestamp;

/// Fallback color for event kinds the dashboard does not know about.
pub const UNKNOWN_KIND_COLOR: &str = "#757575";

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    Login,
    Logoff,
    LoginFailed,
    WorkstationLocked,
    WorkstationUnlocked,
    SessionReconnected,
    SessionDisconnected,
    ScreensaverOn,
    ScreensaverOff,
    TokenElevated,
    ExplicitLogin,
    UserInitiatedLogoff,
    Other(String),
}

impl EventKind {
    /// Every kind with a dedicated color, in legend order.
    pub const KNOWN: [EventKind; 12] = [
        EventKind::Login,
        EventKind::Logoff,
        EventKind::LoginFailed,
        EventKind::WorkstationLocked,
        EventKind::WorkstationUnlocked,
        EventKind::SessionReconnected,
        EventKind::SessionDisconnected,
        EventKind::ScreensaverOn,
        EventKind::ScreensaverOff,
        EventKind::TokenElevated,
        EventKind::ExplicitLogin,
        EventKind::UserInitiatedLogoff,
    ];

    pub fn label(&self) -> &str {
        match self {
            EventKind::Login => "Login",
            EventKind::Logoff => "Logoff",
            EventKind::LoginFailed => "LoginFailed",
            EventKind::WorkstationLocked => "WorkstationLocked",
            EventKind::WorkstationUnlocked => "WorkstationUnlocked",
            EventKind::SessionReconnected => "SessionReconnected",
            EventKind::SessionDisconnected => "SessionDisconnected",
            EventKind::ScreensaverOn => "ScreensaverOn",
            EventKind::ScreensaverOff => "ScreensaverOff",
            EventKind::TokenElevated => "TokenElevated",
            EventKind::ExplicitLogin => "ExplicitLogin",
            EventKind::UserInitiatedLogoff => "UserInitiatedLogoff",
            EventKind::Other(name) => name,
        }
    }

    pub fn color_hex(&self) -> &'static str {
        match self {
            EventKind::Login => "#4CAF50",
            EventKind::Logoff => "#F44336",
            EventKind::LoginFailed => "#FF9800",
            EventKind::WorkstationLocked => "#2196F3",
            EventKind::WorkstationUnlocked => "#8BC34A",
            EventKind::SessionReconnected => "#00BCD4",
            EventKind::SessionDisconnected => "#FF5722",
            EventKind::ScreensaverOn => "#9E9E9E",
            EventKind::ScreensaverOff => "#607D8B",
            EventKind::TokenElevated => "#9C27B0",
            EventKind::ExplicitLogin => "#673AB7",
            EventKind::UserInitiatedLogoff => "#E91E63",
            EventKind::Other(_) => UNKNOWN_KIND_COLOR,
        }
    }
}

impl From<String> for EventKind {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "Login" => EventKind::Login,
            // Both spellings show up depending on which exporter wrote the log.
            "Logoff" | "Logout" => EventKind::Logoff,
            "LoginFailed" => EventKind::LoginFailed,
            "WorkstationLocked" => EventKind::WorkstationLocked,
            "WorkstationUnlocked" => EventKind::WorkstationUnlocked,
            "SessionReconnected" => EventKind::SessionReconnected,
            "SessionDisconnected" => EventKind::SessionDisconnected,
            "ScreensaverOn" => EventKind::ScreensaverOn,
            "ScreensaverOff" => EventKind::ScreensaverOff,
            "TokenElevated" => EventKind::TokenElevated,
            "ExplicitLogin" => EventKind::ExplicitLogin,
            "UserInitiatedLogoff" => EventKind::UserInitiatedLogoff,
            _ => EventKind::Other(raw),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Other(name) => name,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Windows logon type, kept as the raw backend value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct LogonType(String);

impl LogonType {
    /// `None` for blank and `N/A` values. Float renderings such as `"2.0"` are
    /// reduced to their integer code.
    pub fn from_raw(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("n/a") {
            return None;
        }
        let raw = raw.strip_suffix(".0").unwrap_or(raw);
        Some(Self(raw.to_string()))
    }

    pub fn code(&self) -> Option<u32> {
        self.0.parse().ok()
    }

    /// Descriptive name for known codes; otherwise the raw value.
    pub fn name(&self) -> &str {
        match self.code() {
            Some(2) => "Interactive",
            Some(3) => "Network",
            Some(4) => "Batch",
            Some(5) => "Service",
            Some(7) => "Unlock",
            Some(8) => "NetworkCleartext",
            Some(9) => "NewCredentials",
            Some(10) => "RemoteInteractive",
            Some(11) => "CachedInteractive",
            _ => &self.0,
        }
    }
}

impl fmt::Display for LogonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the backend's logon event log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(deserialize_with = "de::id")]
    pub logon_id: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub linked_logon_id: Option<String>,
    pub timestamp: Timestamp,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub workstation: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub ip_address: Option<String>,
    #[serde(default, deserialize_with = "de::opt_logon_type")]
    pub logon_type: Option<LogonType>,
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub is_elevated: bool,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub privileges: Option<String>,
    #[serde(default, deserialize_with = "de::opt_u32")]
    pub event_id: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl SessionEvent {
    pub fn has_privileges(&self) -> bool {
        self.privileges.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn elevation_label(&self) -> &'static str {
        if self.is_elevated { "Elevated" } else { "Standard" }
    }

    pub fn event_id_label(&self) -> String {
        self.event_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| crate::util::format::NOT_AVAILABLE.to_string())
    }
}

/// Non-blank lines of a newline-delimited privilege list.
pub fn privilege_lines(privileges: Option<&str>) -> impl Iterator<Item = &str> {
    privileges
        .unwrap_or_default()
        .lines()
        .map(str::trim)
        .filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_timeline_row() {
        let json = r#"{
            "timestamp": "2024-03-01T08:15:30",
            "type": "Login",
            "username": "alice",
            "workstation": "WS-01",
            "ip_address": "N/A",
            "logon_id": "0x3e7",
            "linked_logon_id": "",
            "event_id": "4624",
            "session_id": "0x3e7",
            "details": "Event 4624 (Login), Type 2",
            "is_elevated": false,
            "elevated_time": null,
            "logon_type": "2"
        }"#;
        let ev: SessionEvent = serde_json::from_str(json).unwrap();
        assert_eq!(ev.kind, EventKind::Login);
        assert_eq!(ev.linked_logon_id, None);
        assert_eq!(ev.event_id, Some(4624));
        assert_eq!(ev.logon_type.as_ref().map(LogonType::name), Some("Interactive"));
        assert_eq!(ev.ip_address.as_deref(), Some("N/A"));
        assert!(!ev.has_privileges());
    }

    #[test]
    fn decodes_sparse_row() {
        let json = r#"{"type": "Logout", "logon_id": 42, "timestamp": "2024-03-01 09:00:00",
                       "is_elevated": "True", "logon_type": "N/A", "privileges": null}"#;
        let ev: SessionEvent = serde_json::from_str(json).unwrap();
        assert_eq!(ev.kind, EventKind::Logoff);
        assert_eq!(ev.logon_id, "42");
        assert!(ev.is_elevated);
        assert_eq!(ev.logon_type, None);
        assert_eq!(ev.username, None);
        assert_eq!(ev.event_id_label(), "N/A");
    }

    #[test]
    fn unknown_kinds_survive_round_trip() {
        let kind = EventKind::from("SpecialPrivilegesAssigned".to_string());
        assert_eq!(kind.color_hex(), UNKNOWN_KIND_COLOR);
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, "\"SpecialPrivilegesAssigned\"");
    }

    #[test]
    fn logon_type_lookup() {
        assert_eq!(LogonType::from_raw("10").unwrap().name(), "RemoteInteractive");
        assert_eq!(LogonType::from_raw("3.0").unwrap().name(), "Network");
        assert_eq!(LogonType::from_raw("Interactive").unwrap().name(), "Interactive");
        assert_eq!(LogonType::from_raw("6").unwrap().name(), "6");
        assert!(LogonType::from_raw("N/A").is_none());
        assert!(LogonType::from_raw(" ").is_none());
    }

    #[test]
    fn privilege_lines_skip_blanks() {
        let lines: Vec<_> =
            privilege_lines(Some("SeDebugPrivilege\n\n  SeBackupPrivilege \n")).collect();
        assert_eq!(lines, ["SeDebugPrivilege", "SeBackupPrivilege"]);
        assert_eq!(privilege_lines(None).count(), 0);
    }
}
