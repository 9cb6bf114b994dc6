use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{DashboardError, DashboardResult};
use crate::ingest::SessionSource;
use crate::model::{Session, SessionEvent, de};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking client for the dashboard backend's JSON endpoints.
pub struct ApiClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

/// Error body the backend sends with 4xx/5xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error when the base URL is empty or the HTTP client cannot
    /// be initialized.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> DashboardResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(DashboardError::Transport("API base URL is empty".into()));
        }

        let http = reqwest::blocking::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Transport(e.to_string()))?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> DashboardResult<T> {
        let url = self.url(path);
        tracing::debug!(%url, ?query, "GET");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| DashboardError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .map(|b| b.error)
                .unwrap_or_default();
            tracing::warn!(%url, status = status.as_u16(), %message, "backend returned an error");
            return Err(DashboardError::Http {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<T>().map_err(|e| DashboardError::Decode {
            endpoint: path.to_string(),
            message: e.to_string(),
        })
    }

    /// A JSON array endpoint. Malformed rows are dropped, not fatal.
    fn get_rows<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> DashboardResult<Vec<T>> {
        let values: Vec<serde_json::Value> = self.get_json(path, query)?;
        Ok(de::rows(values, path))
    }
}

/// `user=<name>` when a user is selected, nothing otherwise.
fn user_query(user: Option<&str>) -> Vec<(&str, &str)> {
    user.filter(|u| !u.is_empty())
        .map(|u| vec![("user", u)])
        .unwrap_or_default()
}

impl SessionSource for ApiClient {
    fn users(&self) -> DashboardResult<Vec<String>> {
        self.get_rows("/api/users", &[])
    }

    fn sessions(&self, user: Option<&str>) -> DashboardResult<Vec<Session>> {
        self.get_rows("/api/sessions", &user_query(user))
    }

    fn timeline(&self, user: Option<&str>) -> DashboardResult<Vec<SessionEvent>> {
        self.get_rows("/api/timeline", &user_query(user))
    }

    fn session_events(
        &self,
        logon_id: &str,
        user: Option<&str>,
    ) -> DashboardResult<Vec<SessionEvent>> {
        let mut query = vec![("logon_id", logon_id)];
        query.extend(user_query(user));
        self.get_rows("/api/session-events", &query)
    }

    fn describe(&self) -> String {
        format!("API {}", self.base_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_base_url() {
        let client = ApiClient::new(" http://127.0.0.1:5000/ ", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:5000");
        assert_eq!(client.url("/api/users"), "http://127.0.0.1:5000/api/users");
        assert_eq!(client.describe(), "API http://127.0.0.1:5000");
    }

    #[test]
    fn rejects_empty_base_url() {
        assert!(ApiClient::new("  ", Duration::from_secs(5)).is_err());
    }

    #[test]
    fn user_query_is_omitted_when_unset() {
        assert!(user_query(None).is_empty());
        assert!(user_query(Some("")).is_empty());
        assert_eq!(user_query(Some("alice")), [("user", "alice")]);
    }

    #[test]
    fn unreachable_backend_is_a_network_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = client.users().unwrap_err();
        assert!(err.is_network(), "unexpected error: {err}");
    }
}
