//! Error types surfaced at the dashboard controller boundary.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// The backend answered with a non-2xx status.
    #[error("HTTP error! status: {status}{}", detail_suffix(.message))]
    Http { status: u16, message: String },

    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("network error: {0}")]
    Transport(String),

    #[error("unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("no {what} returned")]
    EmptyDataset { what: String },

    #[error("events export {}: {message}", .path.display())]
    Snapshot { path: PathBuf, message: String },

    #[error("fetch worker failed: {0}")]
    Worker(String),
}

impl DashboardError {
    /// HTTP status carried by the error, if the backend produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Transport(_))
    }
}

fn detail_suffix(message: &str) -> String {
    if message.trim().is_empty() {
        String::new()
    } else {
        format!(" ({message})")
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;
