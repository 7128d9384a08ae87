use super::EventCalendarApp;
use crate::models::filter::TagMatch;
use egui::RichText;

impl EventCalendarApp {
    /// Month navigation and the tag scope editor.
    pub(super) fn render_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("◀").on_hover_text("Previous month").clicked() {
                    self.calendar.previous_month();
                }
                if ui.button("Today").clicked() {
                    self.calendar.go_to_today();
                }
                if ui.button("▶").on_hover_text("Next month").clicked() {
                    self.calendar.next_month();
                }
                ui.label(
                    RichText::new(self.calendar.displayed_month().format("%B %Y").to_string())
                        .heading(),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Apply").clicked() {
                        self.apply_tag_input();
                    }

                    egui::ComboBox::from_id_source("tag_match")
                        .selected_text(tag_match_label(self.tag_match_input))
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut self.tag_match_input, TagMatch::All, "Match all");
                            ui.selectable_value(&mut self.tag_match_input, TagMatch::Any, "Match any");
                        });

                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.tag_input)
                            .hint_text("tags, comma separated")
                            .desired_width(220.0),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        self.apply_tag_input();
                    }
                    ui.label("Tags:");
                });
            });
        });
    }

    /// Push the edited tags to the calendar and persist them.
    pub(super) fn apply_tag_input(&mut self) {
        let tags = parse_tag_input(&self.tag_input);
        self.calendar.set_tags(tags, self.tag_match_input);
        self.tag_input = self.calendar.tags().join(", ");

        let config = self.context.config_mut();
        config.calendar.tags = self.calendar.tags();
        config.calendar.tag_match = self.tag_match_input;
        if let Err(err) = self.context.save_config() {
            log::warn!("Failed to save tag settings: {:#}", err);
        }
    }
}

fn tag_match_label(tag_match: TagMatch) -> &'static str {
    match tag_match {
        TagMatch::All => "Match all",
        TagMatch::Any => "Match any",
    }
}

fn parse_tag_input(input: &str) -> Vec<String> {
    input.split(',').map(str::to_string).collect()
}
