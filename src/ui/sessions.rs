use crate::analysis::{SessionPair, SortKey};
use crate::app::SessionAtlasApp;
use crate::model::SessionStatus;
use crate::util::format::{
    ACTIVE, NOT_AVAILABLE, format_date_time, format_duration, or_placeholder,
};
use eframe::egui;

const ELEVATED: egui::Color32 = egui::Color32::from_rgb(211, 47, 47);
const STANDARD: egui::Color32 = egui::Color32::from_rgb(56, 142, 60);

pub fn sessions_panel(ui: &mut egui::Ui, app: &mut SessionAtlasApp) {
    ui.heading("Sessions");
    ui.add_space(6.0);

    if !app.state.dataset.is_loaded() {
        ui.label("No data loaded yet.");
        return;
    }
    if app.state.dataset.pairs.is_empty() {
        ui.label("No sessions found for the selected user.");
        return;
    }

    let mut open: Option<String> = None;
    let mut sort_by: Option<SortKey> = None;
    let sort = app.state.ui.session_sort;

    egui::ScrollArea::both()
        .id_source("sessions_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::Grid::new("sessions_grid")
                .striped(true)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    for key in SortKey::ALL {
                        let arrow = match sort {
                            Some(s) if s.key == key && s.descending => " ⏷",
                            Some(s) if s.key == key => " ⏶",
                            _ => "",
                        };
                        let text = egui::RichText::new(format!("{}{arrow}", key.label())).strong();
                        if ui.add(egui::Button::new(text).frame(false)).clicked() {
                            sort_by = Some(key);
                        }
                        if key == SortKey::Status {
                            ui.label(egui::RichText::new("UAC").strong());
                        }
                    }
                    ui.label(egui::RichText::new("Workstation").strong());
                    ui.label(egui::RichText::new("IP Address").strong());
                    ui.end_row();

                    for pair in app.state.dataset.pairs.sorted(sort) {
                        if session_row(ui, pair) {
                            open = Some(pair.session_id().to_string());
                        }
                        ui.end_row();
                    }
                });
        });

    if let Some(key) = sort_by {
        app.state.ui.cycle_sort(key);
    }
    if let Some(id) = open {
        app.open_session(&id);
    }
}

/// Draws one row; `true` when the user clicked it.
fn session_row(ui: &mut egui::Ui, pair: &SessionPair) -> bool {
    let main = &pair.main;
    let mut clicked = false;

    ui.vertical(|ui| {
        let user = or_placeholder(main.username.as_deref(), NOT_AVAILABLE);
        clicked |= ui
            .selectable_label(false, egui::RichText::new(user).strong())
            .on_hover_text("Show session details")
            .clicked();
        ui.monospace(egui::RichText::new(&main.session_id).small());
        if let Some(linked) = &pair.linked {
            ui.label(egui::RichText::new(format!("Linked: {}", linked.session_id)).small());
        }
    });

    ui.monospace(format_date_time(main.start_time, NOT_AVAILABLE));
    ui.monospace(format_date_time(main.end_time, ACTIVE));
    ui.monospace(format_duration(main.duration, NOT_AVAILABLE));

    let status_color = match main.status {
        SessionStatus::Active => STANDARD,
        SessionStatus::Completed => ui.visuals().weak_text_color(),
        SessionStatus::Other(_) => egui::Color32::from_rgb(255, 170, 0),
    };
    ui.colored_label(status_color, main.status.label());

    let privileges = pair.privileges();
    let fill = if pair.is_elevated { ELEVATED } else { STANDARD };
    let badge = super::badge(ui, pair.elevation_label(), fill, egui::Color32::WHITE);
    if !privileges.is_empty() {
        badge.on_hover_text(privileges.join("\n"));
    }

    ui.label(or_placeholder(main.workstation.as_deref(), NOT_AVAILABLE));
    ui.label(or_placeholder(main.ip_address.as_deref(), NOT_AVAILABLE));

    clicked
}
