use crate::app::SessionAtlasApp;
use crate::model::{SessionEvent, privilege_lines};
use crate::util::format::{NOT_AVAILABLE, format_date_time};
use eframe::egui;

pub fn detail_window(ctx: &egui::Context, app: &mut SessionAtlasApp) {
    if !app.state.ui.show_detail {
        return;
    }
    let Some(detail) = &app.state.detail else {
        app.state.ui.show_detail = false;
        return;
    };

    let mut open = true;
    egui::Window::new(format!("Session {}", detail.title_id()))
        .id(egui::Id::new("session_detail_window"))
        .open(&mut open)
        .default_width(520.0)
        .default_height(560.0)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new("Summary").strong());
            egui::Grid::new("session_summary_grid")
                .num_columns(2)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    for (name, value) in detail.summary() {
                        ui.label(egui::RichText::new(name).strong());
                        ui.monospace(value);
                        ui.end_row();
                    }
                });

            ui.add_space(10.0);
            ui.separator();
            ui.label(egui::RichText::new(format!("Events ({})", detail.events.len())).strong());
            ui.add_space(6.0);

            egui::ScrollArea::vertical()
                .id_source("session_detail_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for (idx, ev) in detail.events.iter().enumerate() {
                        ui.push_id(idx, |ui| event_entry(ui, ev));
                    }
                });
        });

    if !open || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.state.ui.show_detail = false;
    }
}

fn event_entry(ui: &mut egui::Ui, ev: &SessionEvent) {
    ui.horizontal(|ui| {
        ui.monospace(format_date_time(Some(ev.timestamp), NOT_AVAILABLE));
        crate::ui::kind_badge(ui, &ev.kind);
        ui.label(format!("Event {}", ev.event_id_label()));
        if ev.is_elevated {
            crate::ui::badge(
                ui,
                "Elevated",
                egui::Color32::from_rgb(211, 47, 47),
                egui::Color32::WHITE,
            );
        }
    });

    ui.indent("event_fields", |ui| {
        ui.monospace(format!("LogonId: {}", ev.logon_id));
        if let Some(logon_type) = &ev.logon_type {
            ui.monospace(format!("Logon Type: {logon_type}"));
        }
        if let Some(linked) = &ev.linked_logon_id {
            ui.monospace(format!("Linked to: {linked}"));
        }
        if let Some(details) = &ev.details {
            ui.add(egui::Label::new(details).wrap(true));
        }
        if ev.has_privileges() {
            ui.label(egui::RichText::new("Privileges").strong());
            for privilege in privilege_lines(ev.privileges.as_deref()) {
                ui.monospace(privilege);
            }
        }
    });

    ui.add_space(6.0);
    ui.separator();
    ui.add_space(6.0);
}
