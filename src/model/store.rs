use crate::analysis::{SessionPairs, pair_sessions, standard_timeline};
use crate::model::{Session, SessionEvent};

/// The data currently on screen. Replaced wholesale by every accepted refresh.
#[derive(Debug, Default)]
pub struct Dataset {
    pub sessions: Vec<Session>,
    pub pairs: SessionPairs,
    /// Raw timeline as returned by the source, elevated sessions included.
    pub timeline: Vec<SessionEvent>,
    /// Standard-user events in time order; what the chart draws.
    pub standard: Vec<SessionEvent>,
    /// Request generation that produced this data; 0 before the first load.
    pub generation: u64,
}

impl Dataset {
    pub fn new(sessions: Vec<Session>, timeline: Vec<SessionEvent>, generation: u64) -> Self {
        let pairs = pair_sessions(&sessions);
        let standard = standard_timeline(&timeline);
        Self {
            sessions,
            pairs,
            timeline,
            standard,
            generation,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.generation != 0
    }

    pub fn standard_event(&self, index: usize) -> Option<&SessionEvent> {
        self.standard.get(index)
    }
}
