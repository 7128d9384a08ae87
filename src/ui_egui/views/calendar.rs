use chrono::{Datelike, Local, NaiveDate};
use chrono_tz::Tz;
use egui::{Color32, Margin, RichText, Sense, Stroke, Vec2};
use std::cell::{Cell, RefCell};

use crate::models::config::CalendarConfig;
use crate::models::filter::{normalize_tags, FilterSpec, TagMatch};
use crate::ui_egui::events_window::TagsFilterProvider;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const CELL_HEIGHT: f32 = 64.0;
const GRID_SPACING: f32 = 2.0;

/// Month calendar that opens a day when clicked and scopes event filters by tag.
///
/// Shared with the events window through `Rc`, so mutable state lives in cells.
pub struct EventCalendar {
    displayed_month: Cell<NaiveDate>,
    selected_day: Cell<Option<NaiveDate>>,
    tags: RefCell<Vec<String>>,
    tag_match: Cell<TagMatch>,
    time_zone: Option<Tz>,
    first_day_of_week: u8,
}

impl EventCalendar {
    pub fn new(config: &CalendarConfig) -> Self {
        let time_zone = config.timezone.as_deref().and_then(|name| match name.parse::<Tz>() {
            Ok(tz) => Some(tz),
            Err(err) => {
                log::warn!("Unknown time zone '{}' ({}), using system zone", name, err);
                None
            }
        });

        Self {
            displayed_month: Cell::new(first_of_month(today_in(time_zone))),
            selected_day: Cell::new(None),
            tags: RefCell::new(normalize_tags(config.tags.iter().cloned())),
            tag_match: Cell::new(config.tag_match),
            time_zone,
            first_day_of_week: config.first_day_of_week % 7,
        }
    }

    pub fn time_zone(&self) -> Option<Tz> {
        self.time_zone
    }

    /// Today's date in the calendar's zone.
    pub fn today(&self) -> NaiveDate {
        today_in(self.time_zone)
    }

    pub fn displayed_month(&self) -> NaiveDate {
        self.displayed_month.get()
    }

    pub fn show_month(&self, date: NaiveDate) {
        self.displayed_month.set(first_of_month(date));
    }

    pub fn previous_month(&self) {
        let current = self.displayed_month.get();
        if let Some(previous) = current.pred_opt() {
            self.displayed_month.set(first_of_month(previous));
        }
    }

    pub fn next_month(&self) {
        let current = self.displayed_month.get();
        let (year, month) = if current.month() == 12 {
            (current.year() + 1, 1)
        } else {
            (current.year(), current.month() + 1)
        };
        if let Some(next) = NaiveDate::from_ymd_opt(year, month, 1) {
            self.displayed_month.set(next);
        }
    }

    pub fn go_to_today(&self) {
        self.show_month(self.today());
    }

    pub fn selected_day(&self) -> Option<NaiveDate> {
        self.selected_day.get()
    }

    pub fn clear_selection(&self) {
        self.selected_day.set(None);
    }

    pub fn tags(&self) -> Vec<String> {
        self.tags.borrow().clone()
    }

    pub fn tag_match(&self) -> TagMatch {
        self.tag_match.get()
    }

    pub fn set_tags<I, S>(&self, tags: I, tag_match: TagMatch)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.tags.borrow_mut() = normalize_tags(tags);
        self.tag_match.set(tag_match);
    }

    /// Draw the displayed month. Returns the day clicked this frame.
    pub fn render(&self, ui: &mut egui::Ui) -> Option<NaiveDate> {
        let month = self.displayed_month.get();
        let today = self.today();
        let visuals = ui.visuals().clone();
        let col_width = (ui.available_width() - GRID_SPACING * 6.0) / 7.0;
        let mut clicked = None;

        egui::Grid::new("event_calendar_header")
            .spacing([GRID_SPACING, GRID_SPACING])
            .show(ui, |ui| {
                for idx in 0..7 {
                    let name = DAY_NAMES[(self.first_day_of_week as usize + idx) % 7];
                    ui.allocate_ui_with_layout(
                        Vec2::new(col_width, 24.0),
                        egui::Layout::centered_and_justified(egui::Direction::TopDown),
                        |ui| {
                            ui.label(RichText::new(name).strong());
                        },
                    );
                }
            });

        ui.add_space(4.0);

        let leading = leading_blank_days(month, self.first_day_of_week);
        let days = days_in_month(month);
        let weeks = (leading + days).div_ceil(7);

        egui::Grid::new("event_calendar_month")
            .spacing([GRID_SPACING, GRID_SPACING])
            .show(ui, |ui| {
                for week in 0..weeks {
                    for weekday in 0..7 {
                        let cell = week * 7 + weekday;
                        let date = cell
                            .checked_sub(leading)
                            .filter(|offset| *offset < days)
                            .and_then(|offset| month.checked_add_days(chrono::Days::new(offset as u64)));

                        let Some(date) = date else {
                            let (rect, _) =
                                ui.allocate_exact_size(Vec2::new(col_width, CELL_HEIGHT), Sense::hover());
                            ui.painter().rect_filled(rect, 2.0, visuals.faint_bg_color);
                            continue;
                        };

                        if self.render_day_cell(ui, date, date == today, col_width, &visuals) {
                            clicked = Some(date);
                        }
                    }
                    ui.end_row();
                }
            });

        if let Some(date) = clicked {
            self.selected_day.set(Some(date));
        }
        clicked
    }

    fn render_day_cell(
        &self,
        ui: &mut egui::Ui,
        date: NaiveDate,
        is_today: bool,
        width: f32,
        visuals: &egui::Visuals,
    ) -> bool {
        let is_selected = self.selected_day.get() == Some(date);
        let fill = if is_selected {
            visuals.selection.bg_fill
        } else if is_today {
            visuals.widgets.hovered.bg_fill
        } else {
            visuals.extreme_bg_color
        };
        let stroke = if is_today {
            Stroke::new(2.0, visuals.selection.stroke.color)
        } else {
            Stroke::new(1.0, visuals.widgets.noninteractive.bg_stroke.color)
        };

        let response = egui::Frame::none()
            .fill(fill)
            .stroke(stroke)
            .rounding(egui::Rounding::same(4.0))
            .inner_margin(Margin::same(4.0))
            .show(ui, |ui| {
                ui.set_min_size(Vec2::new(width - 8.0, CELL_HEIGHT - 8.0));
                ui.set_max_width(width - 8.0);
                let text = RichText::new(date.day().to_string()).size(14.0);
                ui.label(if is_today { text.strong() } else { text });
            })
            .response
            .interact(Sense::click())
            .on_hover_cursor(egui::CursorIcon::PointingHand);

        if response.hovered() {
            ui.painter().rect_stroke(
                response.rect,
                4.0,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(120, 160, 255, 160)),
            );
        }

        response.clicked()
    }
}

impl TagsFilterProvider for EventCalendar {
    fn compute_tags_filter(&self, start: i64, end: i64) -> FilterSpec {
        FilterSpec::new(start, end).with_tags(self.tags.borrow().iter().cloned(), self.tag_match.get())
    }
}

fn today_in(time_zone: Option<Tz>) -> NaiveDate {
    match time_zone {
        Some(tz) => chrono::Utc::now().with_timezone(&tz).date_naive(),
        None => Local::now().date_naive(),
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn days_in_month(first: NaiveDate) -> usize {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|next| next.signed_duration_since(first).num_days() as usize)
        .unwrap_or(31)
}

/// Empty cells before day 1 when weeks start on `first_day_of_week` (0 = Sunday).
fn leading_blank_days(first: NaiveDate, first_day_of_week: u8) -> usize {
    (first.weekday().num_days_from_sunday() as usize + 7 - first_day_of_week as usize % 7) % 7
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn calendar_with(tags: &[&str], tag_match: TagMatch) -> EventCalendar {
        EventCalendar::new(&CalendarConfig {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            tag_match,
            timezone: None,
            first_day_of_week: 0,
        })
    }

    #[test]
    fn test_compute_tags_filter_uses_configured_tags() {
        let calendar = calendar_with(&["prod", "db"], TagMatch::Any);
        let filter = calendar.compute_tags_filter(100, 200);

        assert_eq!(filter.start, 100);
        assert_eq!(filter.end, 200);
        assert_eq!(filter.tags, vec!["prod".to_string(), "db".to_string()]);
        assert_eq!(filter.tag_match, TagMatch::Any);
    }

    #[test]
    fn test_set_tags_updates_later_filters() {
        let calendar = calendar_with(&[], TagMatch::All);
        assert!(calendar.compute_tags_filter(0, 1).tags.is_empty());

        calendar.set_tags([" web ", ""], TagMatch::All);
        assert_eq!(calendar.compute_tags_filter(0, 1).tags, vec!["web".to_string()]);
    }

    #[test]
    fn test_month_navigation_wraps_years() {
        let calendar = calendar_with(&[], TagMatch::All);
        calendar.show_month(NaiveDate::from_ymd_opt(2024, 12, 15).unwrap());

        calendar.next_month();
        assert_eq!(calendar.displayed_month(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        calendar.previous_month();
        calendar.previous_month();
        assert_eq!(calendar.displayed_month(), NaiveDate::from_ymd_opt(2024, 11, 1).unwrap());
    }

    #[test]
    fn test_unknown_zone_falls_back_to_system() {
        let calendar = EventCalendar::new(&CalendarConfig {
            timezone: Some("Nowhere/Special".to_string()),
            ..CalendarConfig::default()
        });
        assert_eq!(calendar.time_zone(), None);
    }

    #[test_case(2024, 2, 29 ; "leap february")]
    #[test_case(2023, 2, 28 ; "common february")]
    #[test_case(2024, 12, 31 ; "december")]
    #[test_case(2024, 4, 30 ; "april")]
    fn test_days_in_month(year: i32, month: u32, expected: usize) {
        let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
        assert_eq!(days_in_month(first), expected);
    }

    #[test_case(0, 1 ; "sunday start")]
    #[test_case(1, 0 ; "monday start")]
    #[test_case(6, 2 ; "saturday start")]
    fn test_leading_blank_days_for_april_2024(first_day_of_week: u8, expected: usize) {
        // 2024-04-01 is a Monday
        let first = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert_eq!(leading_blank_days(first, first_day_of_week), expected);
    }

    #[test]
    fn test_render_month_without_click() {
        let calendar = calendar_with(&[], TagMatch::All);
        let ctx = egui::Context::default();
        let mut clicked = Some(NaiveDate::MIN);
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                clicked = calendar.render(ui);
            });
        });

        assert_eq!(clicked, None);
        assert_eq!(calendar.selected_day(), None);
    }
}
