use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{LogonType, de};
use crate::util::time::Timestamp;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SessionStatus {
    #[default]
    Active,
    Completed,
    Other(String),
}

impl SessionStatus {
    pub fn label(&self) -> &str {
        match self {
            SessionStatus::Active => "Active",
            SessionStatus::Completed => "Completed",
            SessionStatus::Other(s) => s,
        }
    }
}

impl From<String> for SessionStatus {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "Active" => SessionStatus::Active,
            "Completed" => SessionStatus::Completed,
            _ => SessionStatus::Other(raw),
        }
    }
}

impl From<SessionStatus> for String {
    fn from(status: SessionStatus) -> Self {
        status.label().to_string()
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A logon session from login to logoff, as shown in the session table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(deserialize_with = "de::id")]
    pub session_id: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub start_time: Option<Timestamp>,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub end_time: Option<Timestamp>,
    /// Minutes; measured up to "now" for sessions that are still active.
    #[serde(default, deserialize_with = "de::opt_minutes")]
    pub duration: Option<f64>,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub privileges: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub linked_logon_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub workstation: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub ip_address: Option<String>,
    #[serde(default, deserialize_with = "de::opt_logon_type")]
    pub logon_type: Option<LogonType>,
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub is_elevated: bool,
}

impl Session {
    pub fn has_privileges(&self) -> bool {
        self.privileges.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Label used by the session picker: `user - id`.
    pub fn picker_label(&self) -> String {
        format!(
            "{} - {}",
            crate::util::format::or_placeholder(
                self.username.as_deref(),
                crate::util::format::UNKNOWN
            ),
            self.session_id
        )
    }
}
