use std::collections::HashMap;

use crate::analysis::{SessionSort, SortKey};
use crate::model::EventKind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Sessions,
    Timeline,
}

/// Which event kinds the chart and events table show. Kinds never toggled are
/// visible.
#[derive(Clone, Debug, Default)]
pub struct LegendState {
    visible: HashMap<EventKind, bool>,
}

impl LegendState {
    pub fn is_visible(&self, kind: &EventKind) -> bool {
        self.visible.get(kind).copied().unwrap_or(true)
    }

    pub fn toggle(&mut self, kind: &EventKind) {
        let next = !self.is_visible(kind);
        self.visible.insert(kind.clone(), next);
    }

    pub fn select_all(&mut self) {
        self.visible.clear();
    }

    /// Hide every known kind plus any extra kinds on screen.
    pub fn deselect_all<'a>(&mut self, extra: impl IntoIterator<Item = &'a EventKind>) {
        for kind in EventKind::KNOWN.into_iter() {
            self.visible.insert(kind, false);
        }
        for kind in extra {
            self.visible.insert(kind.clone(), false);
        }
    }
}

/// A dismissable error message. The dashboard shows at most one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
}

#[derive(Default)]
pub struct UiState {
    pub tab: Tab,
    pub selected_user: Option<String>,
    /// Session picked in the session filter dropdown.
    pub selected_session: Option<String>,
    pub session_sort: Option<SessionSort>,
    /// Free-text filter for the timeline events table.
    pub filter: String,
    pub show_about: bool,
    pub show_detail: bool,
}

impl UiState {
    /// Clicking a header sorts by it; clicking again flips the direction, and
    /// a third click returns to backend order.
    pub fn cycle_sort(&mut self, key: SortKey) {
        self.session_sort = match self.session_sort {
            Some(SessionSort {
                key: current,
                descending: false,
            }) if current == key => Some(SessionSort {
                key,
                descending: true,
            }),
            Some(SessionSort {
                key: current,
                descending: true,
            }) if current == key => None,
            _ => Some(SessionSort {
                key,
                descending: false,
            }),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legend_defaults_to_visible() {
        let legend = LegendState::default();
        assert!(legend.is_visible(&EventKind::Login));
        assert!(legend.is_visible(&EventKind::Other("Custom".into())));
    }

    #[test]
    fn legend_toggle_and_bulk_controls() {
        let mut legend = LegendState::default();
        legend.toggle(&EventKind::Logoff);
        assert!(!legend.is_visible(&EventKind::Logoff));
        legend.toggle(&EventKind::Logoff);
        assert!(legend.is_visible(&EventKind::Logoff));

        let custom = EventKind::Other("Custom".into());
        legend.deselect_all([&custom]);
        assert!(EventKind::KNOWN.iter().all(|k| !legend.is_visible(k)));
        assert!(!legend.is_visible(&custom));

        legend.select_all();
        assert!(legend.is_visible(&EventKind::Login));
        assert!(legend.is_visible(&custom));
    }

    #[test]
    fn sort_cycles_through_directions() {
        let mut ui = UiState::default();
        ui.cycle_sort(SortKey::Start);
        assert_eq!(
            ui.session_sort,
            Some(SessionSort { key: SortKey::Start, descending: false })
        );
        ui.cycle_sort(SortKey::Start);
        assert_eq!(
            ui.session_sort,
            Some(SessionSort { key: SortKey::Start, descending: true })
        );
        ui.cycle_sort(SortKey::Start);
        assert_eq!(ui.session_sort, None);

        ui.cycle_sort(SortKey::Start);
        ui.cycle_sort(SortKey::Duration);
        assert_eq!(
            ui.session_sort,
            Some(SessionSort { key: SortKey::Duration, descending: false })
        );
    }
}
