mod context;
mod lifecycle;
mod status_bar;
mod toolbar;

use std::rc::Rc;

use self::context::AppContext;
use crate::models::filter::TagMatch;
use crate::models::ui::CalendarClickEvent;
use crate::ui_egui::events_window::{EventsWindow, EventsWindowError};
use crate::ui_egui::views::calendar::EventCalendar;
use chrono::{Local, NaiveDate, Utc};

pub struct EventCalendarApp {
    /// Database and configuration
    context: AppContext,
    /// Month view; the events window holds a weak reference to it
    calendar: Rc<EventCalendar>,
    events_window: EventsWindow,
    /// Tag editor contents, applied to the calendar on demand
    tag_input: String,
    tag_match_input: TagMatch,
    stored_events: usize,
    status_message: Option<String>,
}

impl eframe::App for EventCalendarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_update(ctx);
    }
}

impl EventCalendarApp {
    /// Open the events window on `date`, clicked at the current time of day.
    fn open_day(&mut self, date: NaiveDate) {
        let now = Utc::now();
        let result = match self.calendar.time_zone() {
            Some(tz) => CalendarClickEvent::at(date, now.with_timezone(&tz).time(), &tz)
                .map_err(EventsWindowError::from)
                .and_then(|click| self.events_window.show_events(&click, &[])),
            None => CalendarClickEvent::at(date, now.with_timezone(&Local).time(), &Local)
                .map_err(EventsWindowError::from)
                .and_then(|click| self.events_window.show_events(&click, &[])),
        };

        match result {
            Ok(()) => {
                self.status_message = None;
                self.refresh_stored_count();
            }
            Err(err) => {
                log::error!("Failed to open events for {}: {}", date, err);
                self.status_message = Some(format!("Could not open {}: {}", date, err));
                self.calendar.clear_selection();
            }
        }
    }

    fn refresh_stored_count(&mut self) {
        match self.context.event_service().count() {
            Ok(count) => self.stored_events = count,
            Err(err) => log::warn!("Failed to count stored events: {:#}", err),
        }
    }
}
