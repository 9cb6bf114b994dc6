use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{DashboardError, DashboardResult};
use crate::ingest::{SessionSource, stories};
use crate::model::{Session, SessionEvent, de};
use crate::util::time::Timestamp;

/// An events export (the JSON array `/api/timeline` returns) opened from disk.
pub struct SnapshotSource {
    path: PathBuf,
    events: Vec<SessionEvent>,
}

impl SnapshotSource {
    pub fn load(path: &Path) -> DashboardResult<Self> {
        let data = std::fs::read(path).map_err(|e| snapshot_error(path, e))?;
        let values: Vec<serde_json::Value> =
            serde_json::from_slice(&data).map_err(|e| snapshot_error(path, e))?;
        let events: Vec<SessionEvent> = de::rows(values, &path.display().to_string());
        tracing::info!(path = %path.display(), events = events.len(), "loaded events export");
        Ok(Self::from_events(path.to_path_buf(), events))
    }

    pub fn from_events(path: PathBuf, events: Vec<SessionEvent>) -> Self {
        Self { path, events }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn for_user<'a>(&'a self, user: Option<&'a str>) -> impl Iterator<Item = &'a SessionEvent> {
        self.events.iter().filter(move |ev| match user {
            Some(user) if !user.is_empty() => ev
                .username
                .as_deref()
                .is_some_and(|u| u.eq_ignore_ascii_case(user)),
            _ => true,
        })
    }
}

/// Write `events` as a pretty-printed export that [`SnapshotSource::load`] reads back.
pub fn save(path: &Path, events: &[SessionEvent]) -> DashboardResult<()> {
    let json = serde_json::to_vec_pretty(events).map_err(|e| snapshot_error(path, e))?;
    std::fs::write(path, json).map_err(|e| snapshot_error(path, e))?;
    tracing::info!(path = %path.display(), events = events.len(), "wrote events export");
    Ok(())
}

fn snapshot_error(path: &Path, err: impl std::fmt::Display) -> DashboardError {
    DashboardError::Snapshot {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

impl SessionSource for SnapshotSource {
    fn users(&self) -> DashboardResult<Vec<String>> {
        let users: BTreeSet<&str> = self
            .events
            .iter()
            .filter_map(|ev| ev.username.as_deref())
            .collect();
        Ok(users.into_iter().map(str::to_string).collect())
    }

    fn sessions(&self, user: Option<&str>) -> DashboardResult<Vec<Session>> {
        let events: Vec<SessionEvent> = self.for_user(user).cloned().collect();
        Ok(stories::build_sessions(&events, Timestamp::now()))
    }

    fn timeline(&self, user: Option<&str>) -> DashboardResult<Vec<SessionEvent>> {
        Ok(self.for_user(user).cloned().collect())
    }

    fn session_events(
        &self,
        logon_id: &str,
        user: Option<&str>,
    ) -> DashboardResult<Vec<SessionEvent>> {
        let mut events: Vec<SessionEvent> = self
            .for_user(user)
            .filter(|ev| ev.logon_id == logon_id)
            .cloned()
            .collect();
        if events.is_empty() {
            return Err(DashboardError::EmptyDataset {
                what: format!("events for session {logon_id}"),
            });
        }
        events.sort_by_key(|ev| ev.timestamp);
        Ok(events)
    }

    fn describe(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|s| s.to_string_lossy())
            .unwrap_or_else(|| self.path.to_string_lossy());
        format!("Export {name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::timeline_filter::tests::event;
    use crate::model::EventKind;

    fn sample() -> Vec<SessionEvent> {
        let mut bob = event(EventKind::Login, "B1", "2024-03-01T07:00:00");
        bob.username = Some("Bob".into());
        vec![
            event(EventKind::Logoff, "A1", "2024-03-01T09:00:00"),
            event(EventKind::Login, "A1", "2024-03-01T08:00:00"),
            bob,
        ]
    }

    #[test]
    fn save_then_load_preserves_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        save(&path, &sample()).unwrap();

        let source = SnapshotSource::load(&path).unwrap();
        assert_eq!(source.timeline(None).unwrap(), sample());
        assert_eq!(source.describe(), "Export events.json");
    }

    #[test]
    fn load_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, b"{not json").unwrap();
        let err = SnapshotSource::load(&path).err().unwrap();
        assert!(matches!(err, DashboardError::Snapshot { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn load_keeps_good_rows_around_a_bad_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(
            &path,
            br#"[
                {"type": "Login", "logon_id": "A", "timestamp": "2024-03-01T08:00:00"},
                {"type": "Logoff", "logon_id": "A", "timestamp": null},
                {"type": "Logoff", "logon_id": "A", "timestamp": "2024-03-01T08:30:00"}
            ]"#,
        )
        .unwrap();

        let source = SnapshotSource::load(&path).unwrap();
        let events = source.timeline(None).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].kind, EventKind::Logoff);
        assert_eq!(source.sessions(None).unwrap()[0].duration, Some(30.0));
    }

    #[test]
    fn missing_file_is_a_snapshot_error() {
        let err = SnapshotSource::load(Path::new("/definitely/not/here.json"))
            .err()
            .unwrap();
        assert!(matches!(err, DashboardError::Snapshot { .. }));
    }

    #[test]
    fn serves_the_dashboard_queries() {
        let source = SnapshotSource::from_events("mem.json".into(), sample());
        assert_eq!(source.users().unwrap(), ["Bob", "alice"]);
        assert_eq!(source.timeline(Some("bob")).unwrap().len(), 1);

        let sessions = source.sessions(Some("alice")).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].duration, Some(60.0));

        let events = source.session_events("A1", None).unwrap();
        assert_eq!(events[0].kind, EventKind::Login);
        assert!(matches!(
            source.session_events("nope", None),
            Err(DashboardError::EmptyDataset { .. })
        ));
    }
}
