//! Chart placement: hour of day across, calendar time down.

use crate::model::{EventKind, SessionEvent};
use crate::util::time::Timestamp;

pub const HOURS_PER_DAY: f32 = 24.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeExtent {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeExtent {
    pub fn of(events: &[SessionEvent]) -> Option<Self> {
        let start = events.iter().map(|e| e.timestamp).min()?;
        let end = events.iter().map(|e| e.timestamp).max()?;
        Some(Self { start, end })
    }

    /// Position of `t` within the extent in `[0, 1]`; a zero-width extent maps
    /// everything to the middle.
    pub fn fraction(&self, t: Timestamp) -> f32 {
        let span = (self.end.unix_seconds() - self.start.unix_seconds()) as f64;
        if span <= 0.0 {
            return 0.5;
        }
        let offset = (t.unix_seconds() - self.start.unix_seconds()) as f64;
        (offset / span).clamp(0.0, 1.0) as f32
    }

    /// Midnights that fall inside the extent.
    pub fn day_ticks(&self) -> Vec<Timestamp> {
        let mut ticks = Vec::new();
        let mut day = self.start.start_of_day();
        if day < self.start {
            match day.next_day() {
                Some(next) => day = next,
                None => return ticks,
            }
        }
        while day <= self.end {
            ticks.push(day);
            match day.next_day() {
                Some(next) => day = next,
                None => break,
            }
        }
        ticks
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartPoint {
    /// Index into the event slice the point was built from.
    pub index: usize,
    pub hour: f32,
    pub timestamp: Timestamp,
}

pub fn chart_points(events: &[SessionEvent]) -> Vec<ChartPoint> {
    events
        .iter()
        .enumerate()
        .map(|(index, ev)| ChartPoint {
            index,
            hour: ev.timestamp.hour_of_day(),
            timestamp: ev.timestamp,
        })
        .collect()
}

/// Event counts per kind: known kinds in legend order (zero counts included),
/// then unknown kinds in first-seen order.
pub fn kind_counts(events: &[SessionEvent]) -> Vec<(EventKind, usize)> {
    let mut counts: Vec<(EventKind, usize)> =
        EventKind::KNOWN.into_iter().map(|k| (k, 0)).collect();
    for ev in events {
        match counts.iter_mut().find(|(k, _)| *k == ev.kind) {
            Some((_, n)) => *n += 1,
            None => counts.push((ev.kind.clone(), 1)),
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::timeline_filter::tests::event;

    #[test]
    fn extent_and_fraction() {
        let events = vec![
            event(EventKind::Login, "A", "2024-03-01T08:00:00"),
            event(EventKind::Logoff, "A", "2024-03-03T08:00:00"),
            event(EventKind::WorkstationLocked, "A", "2024-03-02T08:00:00"),
        ];
        let extent = TimeExtent::of(&events).unwrap();
        assert_eq!(extent.start, events[0].timestamp);
        assert_eq!(extent.end, events[1].timestamp);
        assert_eq!(extent.fraction(events[2].timestamp), 0.5);
        assert_eq!(extent.fraction(extent.start), 0.0);
        assert_eq!(extent.fraction(extent.end), 1.0);
    }

    #[test]
    fn single_instant_extent_centers() {
        let events = vec![event(EventKind::Login, "A", "2024-03-01T08:00:00")];
        let extent = TimeExtent::of(&events).unwrap();
        assert_eq!(extent.fraction(events[0].timestamp), 0.5);
        assert!(TimeExtent::of(&[]).is_none());
    }

    #[test]
    fn day_ticks_inside_extent() {
        let events = vec![
            event(EventKind::Login, "A", "2024-02-28T08:00:00"),
            event(EventKind::Logoff, "A", "2024-03-01T00:00:00"),
        ];
        let ticks: Vec<_> = TimeExtent::of(&events)
            .unwrap()
            .day_ticks()
            .into_iter()
            .map(Timestamp::date_label)
            .collect();
        assert_eq!(ticks, ["2024-02-29", "2024-03-01"]);
    }

    #[test]
    fn points_use_hour_of_day() {
        let events = vec![event(EventKind::Login, "A", "2024-03-01T13:45:00")];
        let points = chart_points(&events);
        assert_eq!(points[0].hour, 13.75);
        assert_eq!(points[0].index, 0);
    }

    #[test]
    fn counts_cover_known_and_unknown_kinds() {
        let events = vec![
            event(EventKind::Login, "A", "2024-03-01T08:00:00"),
            event(EventKind::Login, "B", "2024-03-01T09:00:00"),
            event(EventKind::Other("Custom".into()), "B", "2024-03-01T09:00:00"),
        ];
        let counts = kind_counts(&events);
        assert_eq!(counts.len(), EventKind::KNOWN.len() + 1);
        assert_eq!(counts[0], (EventKind::Login, 2));
        assert_eq!(counts[1], (EventKind::Logoff, 0));
        assert_eq!(counts.last().unwrap(), &(EventKind::Other("Custom".into()), 1));
    }
}
