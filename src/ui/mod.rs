mod details;
mod sessions;
mod timeline;
mod timeline_chart;

use crate::app::{SessionAtlasApp, Tab};
use crate::model::EventKind;
use crate::util::color::{self, Rgb};
use eframe::egui;

pub fn render_app(ctx: &egui::Context, frame: &mut eframe::Frame, app: &mut SessionAtlasApp) {
    top_bar(ctx, frame, app);
    toolbar(ctx, app);
    status_bar(ctx, app);

    egui::CentralPanel::default().show(ctx, |ui| match app.state.ui.tab {
        Tab::Sessions => sessions::sessions_panel(ui, app),
        Tab::Timeline => timeline::timeline_panel(ui, app),
    });

    details::detail_window(ctx, app);
    about_window(ctx, app);
}

fn top_bar(ctx: &egui::Context, frame: &mut eframe::Frame, app: &mut SessionAtlasApp) {
    egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open events export...").clicked() {
                    ui.close_menu();
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Events export", &["json"])
                        .pick_file()
                        && let Err(e) = app.open_export(path)
                    {
                        show_error(app, &e);
                    }
                }
                let loaded = app.state.dataset.is_loaded();
                if ui
                    .add_enabled(loaded, egui::Button::new("Save events export..."))
                    .clicked()
                {
                    ui.close_menu();
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Events export", &["json"])
                        .set_file_name("events.json")
                        .save_file()
                        && let Err(e) = app.save_export(&path)
                    {
                        show_error(app, &e);
                    }
                }
                if ui
                    .add_enabled(app.export_path.is_some(), egui::Button::new("Back to live API"))
                    .clicked()
                {
                    ui.close_menu();
                    app.use_api();
                }
                ui.separator();
                if ui.button("Quit").clicked() {
                    let _ = frame;
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Reload users").clicked() {
                    app.reload_users();
                    ui.close_menu();
                }
                if ui.button("Reset zoom").clicked() {
                    ctx.set_zoom_factor(1.0);
                    ui.close_menu();
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    app.state.ui.show_about = true;
                    ui.close_menu();
                }
            });
        });
    });
}

fn show_error(app: &mut SessionAtlasApp, err: &anyhow::Error) {
    tracing::error!(error = %format!("{err:#}"), "file operation failed");
    app.state.banner = Some(crate::app::Banner {
        message: format!("{err:#}"),
    });
}

fn toolbar(ctx: &egui::Context, app: &mut SessionAtlasApp) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            user_filter(ui, app);
            ui.add_space(8.0);
            session_filter(ui, app);
            ui.add_space(8.0);
            if ui.button("Refresh").clicked() {
                app.refresh();
            }

            ui.separator();
            let mut tab = app.state.ui.tab;
            ui.selectable_value(&mut tab, Tab::Sessions, "Sessions");
            ui.selectable_value(&mut tab, Tab::Timeline, "Timeline");
            app.switch_tab(tab);

            if let Some(message) = app.state.loading_message() {
                ui.separator();
                ui.spinner();
                ui.label(message);
            }
        });
        banner(ui, app);
        ui.add_space(4.0);
    });
}

fn user_filter(ui: &mut egui::Ui, app: &mut SessionAtlasApp) {
    ui.label("User:");
    let mut user = app.state.ui.selected_user.clone();
    egui::ComboBox::from_id_source("user_filter")
        .width(180.0)
        .selected_text(user.as_deref().unwrap_or("All Users"))
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut user, None, "All Users");
            for name in &app.state.users {
                ui.selectable_value(&mut user, Some(name.clone()), name);
            }
        });
    app.select_user(user);
}

fn session_filter(ui: &mut egui::Ui, app: &mut SessionAtlasApp) {
    ui.label("Session:");
    let before = app.state.ui.selected_session.clone();
    let mut picked = before.clone();
    egui::ComboBox::from_id_source("session_filter")
        .width(260.0)
        .selected_text(picked.as_deref().unwrap_or("All Sessions"))
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut picked, None, "All Sessions");
            for session in &app.state.dataset.sessions {
                ui.selectable_value(
                    &mut picked,
                    Some(session.session_id.clone()),
                    session.picker_label(),
                );
            }
        });
    if picked != before {
        app.state.ui.selected_session = picked.clone();
        if let Some(id) = picked {
            app.open_session(&id);
        }
    }
}

fn banner(ui: &mut egui::Ui, app: &mut SessionAtlasApp) {
    let Some(banner) = &app.state.banner else {
        return;
    };

    let mut dismiss = false;
    ui.add_space(4.0);
    egui::Frame::none()
        .fill(egui::Color32::from_rgb(90, 20, 20))
        .rounding(4.0)
        .inner_margin(egui::Margin::symmetric(8.0, 6.0))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(egui::Color32::from_rgb(255, 200, 200), &banner.message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("✕").on_hover_text("Dismiss").clicked() {
                        dismiss = true;
                    }
                });
            });
        });
    if dismiss {
        app.state.dismiss_banner();
    }
}

fn about_window(ctx: &egui::Context, app: &mut SessionAtlasApp) {
    if !app.state.ui.show_about {
        return;
    }

    egui::Window::new("About Session Atlas")
        .open(&mut app.state.ui.show_about)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label("Logon sessions and UAC elevation from Windows security events.");
            ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
        });
}

fn status_bar(ctx: &egui::Context, app: &mut SessionAtlasApp) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!("Source: {}", app.source_label()));
            ui.separator();
            let dataset = &app.state.dataset;
            ui.label(format!("Sessions: {}", dataset.pairs.len()));
            ui.separator();
            ui.label(format!(
                "Events: {} ({} standard)",
                dataset.timeline.len(),
                dataset.standard.len()
            ));
            let unresolved = dataset.pairs.unresolved().len();
            if unresolved > 0 {
                ui.separator();
                ui.colored_label(
                    egui::Color32::from_rgb(255, 170, 0),
                    format!("Unresolved links: {unresolved}"),
                )
                .on_hover_text("Linked logon ids that are not part of the loaded sessions.");
            }
        });
    });
}

fn to_color32(rgb: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

pub fn kind_color(kind: &EventKind) -> egui::Color32 {
    let rgb = color::parse_hex(kind.color_hex()).unwrap_or(Rgb(0x75, 0x75, 0x75));
    to_color32(rgb)
}

/// A filled label in the kind's color with readable text on top.
pub fn kind_badge(ui: &mut egui::Ui, kind: &EventKind) -> egui::Response {
    let fill = kind_color(kind);
    let text = to_color32(color::contrast_text(Rgb(fill.r(), fill.g(), fill.b())));
    badge(ui, kind.label(), fill, text)
}

pub fn badge(
    ui: &mut egui::Ui,
    label: &str,
    fill: egui::Color32,
    text: egui::Color32,
) -> egui::Response {
    egui::Frame::none()
        .fill(fill)
        .rounding(3.0)
        .inner_margin(egui::Margin::symmetric(6.0, 1.0))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(label).color(text).small().strong())
        })
        .response
}
