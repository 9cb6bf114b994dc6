//! Background fetches and the request generation counter.
//!
//! Requests run on short-lived worker threads and report back over a channel.
//! Every request carries the generation it was issued under; the app drops
//! responses that a newer request has superseded.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

use crate::error::{DashboardError, DashboardResult};
use crate::ingest::SessionSource;
use crate::model::{Session, SessionEvent};

/// Monotonic generation counter for one kind of request.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
    pending: bool,
}

impl RequestTracker {
    /// Start a new request, superseding any in flight.
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.pending = true;
        self.latest
    }

    /// Accept a response. `false` means it is stale and must be discarded.
    pub fn complete(&mut self, generation: u64) -> bool {
        if generation != self.latest {
            return false;
        }
        self.pending = false;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}

#[derive(Debug)]
pub struct DashboardPayload {
    pub sessions: Vec<Session>,
    pub timeline: Vec<SessionEvent>,
}

#[derive(Debug)]
pub enum FetchResult {
    Users {
        generation: u64,
        result: DashboardResult<Vec<String>>,
    },
    Dashboard {
        generation: u64,
        result: DashboardResult<DashboardPayload>,
    },
    SessionEvents {
        generation: u64,
        logon_id: String,
        result: DashboardResult<Vec<SessionEvent>>,
    },
}

/// Fetch sessions and timeline concurrently; fails if either half fails.
pub fn load_dashboard(
    source: &dyn SessionSource,
    user: Option<&str>,
) -> DashboardResult<DashboardPayload> {
    let (sessions, timeline) = std::thread::scope(|s| {
        let sessions = s.spawn(|| source.sessions(user));
        let timeline = s.spawn(|| source.timeline(user));
        (join(sessions.join()), join(timeline.join()))
    });

    Ok(DashboardPayload {
        sessions: sessions?,
        timeline: timeline?,
    })
}

fn join<T>(joined: std::thread::Result<DashboardResult<T>>) -> DashboardResult<T> {
    joined.unwrap_or_else(|_| Err(DashboardError::Worker("fetch thread panicked".into())))
}

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Spawns fetches against the current source and collects their results.
pub struct Fetcher {
    source: Arc<dyn SessionSource>,
    tx: Sender<FetchResult>,
    rx: Receiver<FetchResult>,
    waker: Waker,
}

impl Fetcher {
    /// `waker` runs after each result is queued (the GUI uses it to repaint).
    pub fn new(source: Arc<dyn SessionSource>, waker: impl Fn() + Send + Sync + 'static) -> Self {
        let (tx, rx) = channel();
        Self {
            source,
            tx,
            rx,
            waker: Arc::new(waker),
        }
    }

    pub fn source(&self) -> &dyn SessionSource {
        self.source.as_ref()
    }

    /// Switch sources. Requests already in flight still report, and are
    /// discarded by generation once newer requests are issued.
    pub fn set_source(&mut self, source: Arc<dyn SessionSource>) {
        tracing::info!(source = %source.describe(), "switching data source");
        self.source = source;
    }

    pub fn fetch_users(&self, generation: u64) {
        self.spawn(move |source| FetchResult::Users {
            generation,
            result: source.users(),
        });
    }

    pub fn fetch_dashboard(&self, generation: u64, user: Option<String>) {
        self.spawn(move |source| FetchResult::Dashboard {
            generation,
            result: load_dashboard(source, user.as_deref()),
        });
    }

    pub fn fetch_session_events(&self, generation: u64, logon_id: String, user: Option<String>) {
        self.spawn(move |source| {
            let result = source.session_events(&logon_id, user.as_deref());
            FetchResult::SessionEvents {
                generation,
                logon_id,
                result,
            }
        });
    }

    /// Results that arrived since the last call.
    pub fn drain(&self) -> Vec<FetchResult> {
        self.rx.try_iter().collect()
    }

    fn spawn(&self, work: impl FnOnce(&dyn SessionSource) -> FetchResult + Send + 'static) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let waker = Arc::clone(&self.waker);
        std::thread::spawn(move || {
            let result = work(source.as_ref());
            if tx.send(result).is_ok() {
                waker();
            }
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    /// In-memory source with switchable failures.
    #[derive(Default)]
    pub(crate) struct FakeSource {
        pub users: Vec<String>,
        pub sessions: Vec<Session>,
        pub timeline: Vec<SessionEvent>,
        pub fail_sessions: Option<u16>,
        pub fail_timeline: Option<u16>,
        pub calls: Mutex<Vec<String>>,
    }

    fn http(status: u16) -> DashboardError {
        DashboardError::Http {
            status,
            message: String::new(),
        }
    }

    impl SessionSource for FakeSource {
        fn users(&self) -> DashboardResult<Vec<String>> {
            self.calls.lock().unwrap().push("users".into());
            Ok(self.users.clone())
        }

        fn sessions(&self, user: Option<&str>) -> DashboardResult<Vec<Session>> {
            self.calls.lock().unwrap().push(format!("sessions:{user:?}"));
            match self.fail_sessions {
                Some(status) => Err(http(status)),
                None => Ok(self.sessions.clone()),
            }
        }

        fn timeline(&self, user: Option<&str>) -> DashboardResult<Vec<SessionEvent>> {
            self.calls.lock().unwrap().push(format!("timeline:{user:?}"));
            match self.fail_timeline {
                Some(status) => Err(http(status)),
                None => Ok(self.timeline.clone()),
            }
        }

        fn session_events(
            &self,
            logon_id: &str,
            _user: Option<&str>,
        ) -> DashboardResult<Vec<SessionEvent>> {
            Ok(self
                .timeline
                .iter()
                .filter(|e| e.logon_id == logon_id)
                .cloned()
                .collect())
        }

        fn describe(&self) -> String {
            "fake".into()
        }
    }

    #[test]
    fn tracker_discards_superseded_generations() {
        let mut tracker = RequestTracker::default();
        let first = tracker.begin();
        let second = tracker.begin();
        assert!(tracker.is_pending());
        assert!(!tracker.complete(first));
        assert!(tracker.is_pending());
        assert!(tracker.complete(second));
        assert!(!tracker.is_pending());
        assert_eq!(tracker.latest(), second);
    }

    #[test]
    fn dashboard_joins_both_halves() {
        let source = FakeSource::default();
        let payload = load_dashboard(&source, Some("alice")).unwrap();
        assert!(payload.sessions.is_empty());
        let mut calls = source.calls.lock().unwrap().clone();
        calls.sort();
        assert_eq!(calls, ["sessions:Some(\"alice\")", "timeline:Some(\"alice\")"]);
    }

    #[test]
    fn dashboard_fails_when_either_half_fails() {
        let source = FakeSource {
            fail_sessions: Some(500),
            ..Default::default()
        };
        let err = load_dashboard(&source, None).unwrap_err();
        assert_eq!(err.status(), Some(500));

        let source = FakeSource {
            fail_timeline: Some(502),
            ..Default::default()
        };
        assert_eq!(load_dashboard(&source, None).unwrap_err().status(), Some(502));
    }

    #[test]
    fn fetcher_delivers_results_and_wakes() {
        let woken = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&woken);
        let source = FakeSource {
            users: vec!["alice".into()],
            ..Default::default()
        };
        let fetcher = Fetcher::new(Arc::new(source), move || {
            *counter.lock().unwrap() += 1;
        });

        fetcher.fetch_users(7);

        let mut results = Vec::new();
        for _ in 0..200 {
            results.extend(fetcher.drain());
            if !results.is_empty() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }

        match results.as_slice() {
            [FetchResult::Users { generation, result }] => {
                assert_eq!(*generation, 7);
                assert_eq!(result.as_ref().unwrap(), &["alice".to_string()]);
            }
            other => panic!("unexpected results: {other:?}"),
        }
        assert_eq!(fetcher.source().describe(), "fake");
        // The waker runs after the send, so give it a moment.
        for _ in 0..200 {
            if *woken.lock().unwrap() == 1 {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(*woken.lock().unwrap(), 1);
    }
}
