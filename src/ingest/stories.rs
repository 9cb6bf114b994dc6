//! Rebuild login-to-logoff sessions from raw events.
//!
//! The live backend does this server side; an events export only carries the
//! raw rows, so the session table is reconstructed here.

use crate::model::{EventKind, Session, SessionEvent, SessionStatus};
use crate::util::time::Timestamp;

/// Sessions built from `events`, newest start first.
///
/// A Login opens a session for its logon id; a second Login for the same id
/// closes the previous one at that instant. A Logoff closes the open session.
/// Sessions still open at the end are `Active`, measured up to `now`.
pub fn build_sessions(events: &[SessionEvent], now: Timestamp) -> Vec<Session> {
    let mut ordered: Vec<&SessionEvent> = events.iter().collect();
    ordered.sort_by_key(|ev| ev.timestamp);

    let mut finished: Vec<Session> = Vec::new();
    let mut open: Vec<Session> = Vec::new();

    for ev in ordered {
        match ev.kind {
            EventKind::Login => {
                if let Some(pos) = open.iter().position(|s| s.session_id == ev.logon_id) {
                    let mut prev = open.remove(pos);
                    close(&mut prev, ev.timestamp);
                    finished.push(prev);
                }
                open.push(open_session(ev));
            }
            EventKind::Logoff => {
                if let Some(pos) = open.iter().position(|s| s.session_id == ev.logon_id) {
                    let mut session = open.remove(pos);
                    close(&mut session, ev.timestamp);
                    finished.push(session);
                }
            }
            _ => {}
        }
    }

    for mut session in open {
        session.duration = session.start_time.map(|start| start.minutes_until(now));
        session.end_time = None;
        finished.push(session);
    }

    finished.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    finished
}

fn open_session(login: &SessionEvent) -> Session {
    Session {
        session_id: login.logon_id.clone(),
        username: login.username.clone(),
        start_time: Some(login.timestamp),
        end_time: None,
        duration: None,
        status: SessionStatus::Active,
        privileges: login.privileges.clone(),
        linked_logon_id: login.linked_logon_id.clone(),
        workstation: login.workstation.clone(),
        ip_address: login.ip_address.clone(),
        logon_type: login.logon_type.clone(),
        is_elevated: login.is_elevated,
    }
}

fn close(session: &mut Session, at: Timestamp) {
    session.end_time = Some(at);
    session.status = SessionStatus::Completed;
    session.duration = session.start_time.map(|start| start.minutes_until(at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::timeline_filter::tests::event;

    fn now() -> Timestamp {
        Timestamp::parse("2024-03-02T08:00:00").unwrap()
    }

    #[test]
    fn login_logoff_pair_completes() {
        let events = vec![
            event(EventKind::Logoff, "A", "2024-03-01T09:30:00"),
            event(EventKind::Login, "A", "2024-03-01T08:00:00"),
        ];
        let sessions = build_sessions(&events, now());
        assert_eq!(sessions.len(), 1);
        let s = &sessions[0];
        assert_eq!(s.status, SessionStatus::Completed);
        assert_eq!(s.duration, Some(90.0));
        assert_eq!(s.end_time, Timestamp::parse("2024-03-01T09:30:00"));
    }

    #[test]
    fn open_session_is_active_until_now() {
        let events = vec![event(EventKind::Login, "A", "2024-03-02T07:00:00")];
        let sessions = build_sessions(&events, now());
        assert_eq!(sessions[0].status, SessionStatus::Active);
        assert_eq!(sessions[0].end_time, None);
        assert_eq!(sessions[0].duration, Some(60.0));
    }

    #[test]
    fn repeated_login_closes_previous() {
        let events = vec![
            event(EventKind::Login, "A", "2024-03-01T08:00:00"),
            event(EventKind::Login, "A", "2024-03-01T08:45:00"),
            event(EventKind::Logoff, "A", "2024-03-01T09:00:00"),
        ];
        let sessions = build_sessions(&events, now());
        assert_eq!(sessions.len(), 2);
        // Newest first.
        assert_eq!(sessions[0].duration, Some(15.0));
        assert_eq!(sessions[1].duration, Some(45.0));
        assert!(sessions.iter().all(|s| s.status == SessionStatus::Completed));
    }

    #[test]
    fn orphan_logoff_and_other_kinds_are_ignored() {
        let events = vec![
            event(EventKind::Logoff, "B", "2024-03-01T08:00:00"),
            event(EventKind::WorkstationLocked, "B", "2024-03-01T08:10:00"),
        ];
        assert!(build_sessions(&events, now()).is_empty());
    }

    #[test]
    fn carries_login_metadata() {
        let mut login = event(EventKind::Login, "A", "2024-03-01T08:00:00");
        login.linked_logon_id = Some("B".into());
        login.privileges = Some("SeDebugPrivilege".into());
        let sessions = build_sessions(&[login], now());
        assert_eq!(sessions[0].linked_logon_id.as_deref(), Some("B"));
        assert!(sessions[0].has_privileges());
        assert_eq!(sessions[0].username.as_deref(), Some("alice"));
    }
}
