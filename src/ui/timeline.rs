use crate::analysis::layout::kind_counts;
use crate::app::SessionAtlasApp;
use crate::model::{EventKind, SessionEvent};
use crate::util::format::{NOT_AVAILABLE, format_date_time, or_placeholder};
use eframe::egui;

pub fn timeline_panel(ui: &mut egui::Ui, app: &mut SessionAtlasApp) {
    ui.heading("Standard User Timeline");
    ui.add_space(6.0);

    if !app.state.dataset.is_loaded() {
        ui.label("No data loaded yet.");
        return;
    }
    if app.state.dataset.standard.is_empty() {
        ui.label("No standard user sessions found in the selected data.");
        return;
    }

    legend(ui, app);
    ui.add_space(6.0);

    let mut open: Option<String> = None;
    let state = &app.state;
    let events = &state.dataset.standard;
    let visible: Vec<usize> = (0..events.len())
        .filter(|&i| state.legend.is_visible(&events[i].kind))
        .collect();

    if let Some(id) = crate::ui::timeline_chart::timeline_chart(ui, events, &visible) {
        open = Some(id);
    }
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label("Filter:");
        ui.text_edit_singleline(&mut app.state.ui.filter);
        if ui.button("Clear").clicked() {
            app.state.ui.filter.clear();
        }
    });
    ui.add_space(6.0);

    let state = &app.state;
    egui::ScrollArea::vertical()
        .id_source("timeline_events_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            // Newest first, like the session list.
            for &i in visible.iter().rev() {
                let Some(ev) = state.dataset.standard_event(i) else {
                    continue;
                };
                if !passes_filter(ev, &state.ui.filter) {
                    continue;
                }

                let label = egui::RichText::new(row_label(ev))
                    .monospace()
                    .color(crate::ui::kind_color(&ev.kind));

                let response = ui
                    .push_id(i, |ui| {
                        ui.add_sized(
                            [ui.available_width(), 0.0],
                            egui::SelectableLabel::new(false, label),
                        )
                    })
                    .inner
                    .on_hover_text(format!(
                        "Event {}\nworkstation={}\nip={}",
                        ev.event_id_label(),
                        or_placeholder(ev.workstation.as_deref(), NOT_AVAILABLE),
                        or_placeholder(ev.ip_address.as_deref(), NOT_AVAILABLE),
                    ));

                if response.clicked() {
                    open = Some(ev.logon_id.clone());
                }

                ui.add_space(2.0);
            }
        });

    if let Some(id) = open {
        app.open_session(&id);
    }
}

fn legend(ui: &mut egui::Ui, app: &mut SessionAtlasApp) {
    let counts = kind_counts(&app.state.dataset.standard);

    ui.horizontal(|ui| {
        if ui.button("Select All").clicked() {
            app.state.legend.select_all();
        }
        if ui.button("Deselect All").clicked() {
            let extra: Vec<&EventKind> = counts.iter().map(|(k, _)| k).collect();
            app.state.legend.deselect_all(extra);
        }
        let total: usize = counts.iter().map(|(_, n)| n).sum();
        ui.separator();
        ui.label(format!("Total {total}"));
    });

    ui.horizontal_wrapped(|ui| {
        for (kind, count) in &counts {
            let mut shown = app.state.legend.is_visible(kind);
            let text = egui::RichText::new(format!("{} ({count})", kind.label()))
                .color(crate::ui::kind_color(kind));
            if ui.checkbox(&mut shown, text).changed() {
                app.state.legend.toggle(kind);
            }
            ui.add_space(6.0);
        }
    });
}

/// One line of the events list: time, kind, user, logon id, linked id,
/// logon type and elevation.
fn row_label(ev: &SessionEvent) -> String {
    let logon_type = ev
        .logon_type
        .as_ref()
        .map(|t| t.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    format!(
        "{}  {:<26}  {:<16}  {:<12}  {:<12}  {:<18}  {}",
        format_date_time(Some(ev.timestamp), NOT_AVAILABLE),
        ev.kind.label(),
        or_placeholder(ev.username.as_deref(), NOT_AVAILABLE),
        ev.logon_id,
        or_placeholder(ev.linked_logon_id.as_deref(), NOT_AVAILABLE),
        logon_type,
        ev.elevation_label()
    )
}

fn passes_filter(ev: &SessionEvent, filter: &str) -> bool {
    let f = filter.trim();
    if f.is_empty() {
        return true;
    }

    let f = f.to_ascii_lowercase();
    let fields = [
        Some(ev.kind.label()),
        Some(ev.logon_id.as_str()),
        ev.linked_logon_id.as_deref(),
        ev.username.as_deref(),
        ev.workstation.as_deref(),
        ev.ip_address.as_deref(),
        ev.details.as_deref(),
    ];
    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_ascii_lowercase().contains(&f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::timeline_filter::tests::event;
    use crate::model::LogonType;

    #[test]
    fn filter_matches_any_text_field() {
        let mut ev = event(EventKind::Login, "0x3E7", "2024-03-01T08:00:00");
        ev.ip_address = Some("10.0.0.5".into());
        assert!(passes_filter(&ev, ""));
        assert!(passes_filter(&ev, "  "));
        assert!(passes_filter(&ev, "ALICE"));
        assert!(passes_filter(&ev, "0x3e7"));
        assert!(passes_filter(&ev, "10.0.0"));
        assert!(passes_filter(&ev, "login"));
        assert!(!passes_filter(&ev, "bob"));
    }

    #[test]
    fn row_shows_link_logon_type_and_elevation() {
        let mut ev = event(EventKind::Login, "0x1", "2024-03-01T08:00:00");
        ev.linked_logon_id = Some("0x2".into());
        ev.logon_type = LogonType::from_raw("10");
        let row = row_label(&ev);
        assert!(row.starts_with("2024-03-01 08:00:00  Login"));
        assert!(row.contains("0x2"));
        assert!(row.contains("RemoteInteractive"));
        assert!(row.ends_with("Standard"));
        assert!(passes_filter(&ev, "0x2"));

        let bare = row_label(&event(EventKind::Logoff, "0x3", "2024-03-01T09:00:00"));
        assert_eq!(bare.matches("N/A").count(), 2);
    }
}
