use crate::analysis::layout::{HOURS_PER_DAY, TimeExtent, chart_points};
use crate::model::SessionEvent;
use crate::util::format::{NOT_AVAILABLE, format_date_time, or_placeholder};
use eframe::egui;

const LEFT_GUTTER: f32 = 84.0;
const BOTTOM_GUTTER: f32 = 18.0;
const PAD: f32 = 8.0;
const HOVER_RADIUS: f32 = 10.0;

/// Hour-of-day scatter of `events`, drawing only the indices in `visible`.
/// Returns the logon id of a clicked point.
pub fn timeline_chart(
    ui: &mut egui::Ui,
    events: &[SessionEvent],
    visible: &[usize],
) -> Option<String> {
    let extent = TimeExtent::of(events)?;

    let w = ui.available_width().max(240.0);
    let h = 320.0;
    let (rect, response) = ui.allocate_exact_size(egui::vec2(w, h), egui::Sense::click());

    let painter = ui.painter_at(rect);
    let grid = egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color);
    let text_color = ui.visuals().weak_text_color();
    let font = egui::FontId::monospace(10.0);

    let plot = egui::Rect::from_min_max(
        egui::pos2(rect.left() + LEFT_GUTTER, rect.top() + PAD),
        egui::pos2(rect.right() - PAD, rect.bottom() - BOTTOM_GUTTER),
    );
    painter.rect_stroke(plot, 0.0, grid);

    let x_of = |hour: f32| plot.left() + plot.width() * (hour / HOURS_PER_DAY);
    // Latest at the top.
    let y_of = |fraction: f32| plot.bottom() - plot.height() * fraction;

    for hour in (0..=24).step_by(3) {
        let x = x_of(hour as f32);
        painter.line_segment([egui::pos2(x, plot.top()), egui::pos2(x, plot.bottom())], grid);
        painter.text(
            egui::pos2(x, plot.bottom() + 2.0),
            egui::Align2::CENTER_TOP,
            format!("{hour:02}:00"),
            font.clone(),
            text_color,
        );
    }

    for day in extent.day_ticks() {
        let y = y_of(extent.fraction(day));
        painter.line_segment([egui::pos2(plot.left(), y), egui::pos2(plot.right(), y)], grid);
        painter.text(
            egui::pos2(plot.left() - 6.0, y),
            egui::Align2::RIGHT_CENTER,
            day.date_label(),
            font.clone(),
            text_color,
        );
    }

    let all = chart_points(events);
    let mut points: Vec<(egui::Pos2, usize)> = Vec::with_capacity(visible.len());
    for &i in visible {
        let Some(point) = all.get(i) else { continue };
        points.push((
            egui::pos2(x_of(point.hour), y_of(extent.fraction(point.timestamp))),
            point.index,
        ));
    }

    let hovered = response
        .hover_pos()
        .and_then(|pos| nearest_point(&points, pos, HOVER_RADIUS))
        .map(|(_, i)| *i);

    for (p, i) in &points {
        let r = if hovered == Some(*i) { 6.5 } else { 4.5 };
        painter.circle_filled(*p, r, crate::ui::kind_color(&events[*i].kind));
        if hovered == Some(*i) {
            painter.circle_stroke(*p, r, egui::Stroke::new(1.5, egui::Color32::WHITE));
        }
    }

    if let Some(i) = hovered {
        egui::show_tooltip_at_pointer(ui.ctx(), egui::Id::new("timeline_hover"), |ui| {
            event_tooltip(ui, &events[i]);
        });
    }

    if response.clicked()
        && let Some(pos) = response.interact_pointer_pos()
        && let Some((_, i)) = nearest_point(&points, pos, HOVER_RADIUS)
    {
        return Some(events[*i].logon_id.clone());
    }
    None
}

fn event_tooltip(ui: &mut egui::Ui, ev: &SessionEvent) {
    ui.label(
        egui::RichText::new(format!("{} (Event {})", ev.kind, ev.event_id_label()))
            .color(crate::ui::kind_color(&ev.kind))
            .strong(),
    );
    egui::Grid::new("timeline_tooltip_grid")
        .num_columns(2)
        .spacing([10.0, 2.0])
        .show(ui, |ui| {
            let mut row = |name: &str, value: String| {
                ui.label(egui::RichText::new(name).strong());
                ui.monospace(value);
                ui.end_row();
            };
            row(
                "User",
                or_placeholder(ev.username.as_deref(), NOT_AVAILABLE).to_string(),
            );
            row("Time", format_date_time(Some(ev.timestamp), NOT_AVAILABLE));
            row("Session ID", ev.logon_id.clone());
            if let Some(linked) = &ev.linked_logon_id {
                row("Linked Session", linked.clone());
            }
            row(
                "Workstation",
                or_placeholder(ev.workstation.as_deref(), NOT_AVAILABLE).to_string(),
            );
            row(
                "IP Address",
                or_placeholder(ev.ip_address.as_deref(), NOT_AVAILABLE).to_string(),
            );
            row(
                "Logon Type",
                ev.logon_type
                    .as_ref()
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            );
            row("Elevation", ev.elevation_label().to_string());
        });
}

fn nearest_point(
    points: &[(egui::Pos2, usize)],
    pos: egui::Pos2,
    max_dist: f32,
) -> Option<(f32, &usize)> {
    points
        .iter()
        .map(|(p, i)| (p.distance(pos), i))
        .filter(|(d, _)| *d <= max_dist)
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
}
