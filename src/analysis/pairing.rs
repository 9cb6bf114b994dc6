//! Linked-session pairing for the session table.
//!
//! Windows issues two logon ids for an administrator who passes UAC: a
//! filtered standard token and an elevated one, each pointing at the other
//! through `linked_logon_id`. The table shows them as one row.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::model::{Session, privilege_lines};

#[derive(Clone, Debug, PartialEq)]
pub struct SessionPair {
    pub main: Session,
    pub linked: Option<Session>,
    /// Either token carries a non-empty privilege list.
    pub is_elevated: bool,
}

impl SessionPair {
    pub fn session_id(&self) -> &str {
        &self.main.session_id
    }

    /// Privileges of both tokens, main first, blank lines dropped.
    pub fn privileges(&self) -> Vec<&str> {
        let mut out: Vec<&str> = privilege_lines(self.main.privileges.as_deref()).collect();
        if let Some(linked) = &self.linked {
            out.extend(privilege_lines(linked.privileges.as_deref()));
        }
        out
    }

    pub fn elevation_label(&self) -> &'static str {
        if self.is_elevated {
            "UAC Elevated"
        } else {
            "Standard User"
        }
    }
}

/// A `linked_logon_id` that does not resolve inside the batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingLinkedSession {
    pub session_id: String,
    pub linked_logon_id: String,
}

/// Pairs keyed by `session_id`, in first-seen input order.
#[derive(Clone, Debug, Default)]
pub struct SessionPairs {
    entries: Vec<SessionPair>,
    unresolved: Vec<MissingLinkedSession>,
}

impl SessionPairs {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    fn iter(&self) -> impl Iterator<Item = &SessionPair> {
        self.entries.iter()
    }

    pub fn get(&self, session_id: &str) -> Option<&SessionPair> {
        self.entries.iter().find(|p| p.session_id() == session_id)
    }

    pub fn unresolved(&self) -> &[MissingLinkedSession] {
        &self.unresolved
    }

    /// Pairs in display order for the given sort, or input order when `None`.
    pub fn sorted(&self, sort: Option<SessionSort>) -> Vec<&SessionPair> {
        let mut rows: Vec<&SessionPair> = self.entries.iter().collect();
        if let Some(sort) = sort {
            rows.sort_by(|a, b| sort.compare(&a.main, &b.main));
        }
        rows
    }
}

pub fn pair_sessions(sessions: &[Session]) -> SessionPairs {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut pairs = SessionPairs::default();

    for session in sessions {
        if !seen.insert(session.session_id.as_str()) {
            continue;
        }

        let linked = session.linked_logon_id.as_deref().and_then(|linked_id| {
            let found = sessions.iter().find(|s| s.session_id == linked_id);
            if found.is_none() {
                tracing::debug!(
                    session_id = %session.session_id,
                    linked_logon_id = linked_id,
                    "linked session not in batch; showing as unlinked"
                );
                pairs.unresolved.push(MissingLinkedSession {
                    session_id: session.session_id.clone(),
                    linked_logon_id: linked_id.to_string(),
                });
            }
            found
        });

        let is_elevated =
            session.has_privileges() || linked.is_some_and(Session::has_privileges);

        pairs.entries.push(SessionPair {
            main: session.clone(),
            linked: linked.cloned(),
            is_elevated,
        });
    }

    pairs
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    User,
    Start,
    End,
    Duration,
    Status,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::User,
        SortKey::Start,
        SortKey::End,
        SortKey::Duration,
        SortKey::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::User => "User / Session",
            SortKey::Start => "Start Time",
            SortKey::End => "End Time",
            SortKey::Duration => "Duration",
            SortKey::Status => "Status",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSort {
    pub key: SortKey,
    pub descending: bool,
}

impl SessionSort {
    /// Stable comparison; rows missing the sort value go last either way.
    pub fn compare(&self, a: &Session, b: &Session) -> Ordering {
        match self.key {
            SortKey::User => self.present(
                a.username.as_deref().map(str::to_ascii_lowercase),
                b.username.as_deref().map(str::to_ascii_lowercase),
                |x, y| x.cmp(y),
            ),
            SortKey::Start => self.present(a.start_time, b.start_time, |x, y| x.cmp(y)),
            SortKey::End => self.present(a.end_time, b.end_time, |x, y| x.cmp(y)),
            SortKey::Duration => self.present(a.duration, b.duration, |x, y| x.total_cmp(y)),
            SortKey::Status => {
                self.directed(a.status.label().cmp(b.status.label()))
            }
        }
    }

    fn present<T>(&self, a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => self.directed(cmp(&a, &b)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    fn directed(&self, ord: Ordering) -> Ordering {
        if self.descending { ord.reverse() } else { ord }
    }
}
