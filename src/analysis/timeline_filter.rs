//! Standard-user event set for the timeline chart.
//!
//! Elevated tokens and the standard tokens linked to them describe the same
//! interactive logon twice, so both are dropped from the chart. They remain in
//! the session table.

use std::collections::HashSet;

use crate::model::{EventKind, SessionEvent};

#[derive(Debug, Default, PartialEq, Eq)]
struct ElevatedIds {
    elevated: HashSet<String>,
    linked_to_elevated: HashSet<String>,
}

impl ElevatedIds {
    /// Logon ids of privileged Login events and the ids they link to.
    fn collect(events: &[SessionEvent]) -> Self {
        let mut ids = Self::default();
        for ev in events {
            if ev.kind == EventKind::Login && ev.is_elevated && ev.has_privileges() {
                ids.elevated.insert(ev.logon_id.clone());
                if let Some(linked) = &ev.linked_logon_id {
                    ids.linked_to_elevated.insert(linked.clone());
                }
            }
        }
        ids
    }

    fn excludes(&self, logon_id: &str) -> bool {
        self.elevated.contains(logon_id) || self.linked_to_elevated.contains(logon_id)
    }
}

/// Events of non-elevated sessions, sorted by timestamp (ties keep input order).
pub fn standard_timeline(events: &[SessionEvent]) -> Vec<SessionEvent> {
    let ids = ElevatedIds::collect(events);
    let mut kept: Vec<SessionEvent> = events
        .iter()
        .filter(|ev| !ids.excludes(&ev.logon_id))
        .cloned()
        .collect();
    kept.sort_by_key(|ev| ev.timestamp);

    tracing::debug!(
        total = events.len(),
        kept = kept.len(),
        elevated = ids.elevated.len(),
        linked = ids.linked_to_elevated.len(),
        "filtered timeline to standard sessions"
    );
    kept
}
