//! Bottom status bar: stored event count, active tag scope, last error.

use super::EventCalendarApp;
use crate::models::filter::TagMatch;
use egui::{Color32, RichText};

const SEPARATOR_WIDTH: f32 = 8.0;

fn secondary_text_color(is_dark: bool) -> Color32 {
    if is_dark {
        Color32::from_gray(160)
    } else {
        Color32::from_gray(100)
    }
}

impl EventCalendarApp {
    pub(super) fn render_status_bar(&mut self, ctx: &egui::Context) {
        let is_dark = ctx.style().visuals.dark_mode;

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    let count_text = if self.stored_events == 1 {
                        "1 stored event".to_string()
                    } else {
                        format!("{} stored events", self.stored_events)
                    };
                    ui.label(RichText::new(count_text).small())
                        .on_hover_text(self.context.database().path());

                    ui.add_space(SEPARATOR_WIDTH);
                    ui.separator();
                    ui.add_space(SEPARATOR_WIDTH);

                    ui.label(
                        RichText::new(tag_scope_text(&self.calendar.tags(), self.calendar.tag_match()))
                            .small()
                            .color(secondary_text_color(is_dark)),
                    );

                    if let Some(message) = &self.status_message {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(RichText::new(message).small().color(Color32::LIGHT_RED));
                        });
                    }
                });
            });
    }
}

fn tag_scope_text(tags: &[String], tag_match: TagMatch) -> String {
    if tags.is_empty() {
        return "All tags".to_string();
    }
    let joiner = match tag_match {
        TagMatch::All => " + ",
        TagMatch::Any => " | ",
    };
    format!("Tags: {}", tags.join(joiner))
}
