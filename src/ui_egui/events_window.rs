//! Modal window listing the events of one calendar day.

use std::rc::Weak;
use std::sync::Arc;

use chrono::TimeZone;
use thiserror::Error;

use crate::models::config::EventsWindowConfig;
use crate::models::filter::FilterSpec;
use crate::models::ui::CalendarClickEvent;
use crate::services::event::EventSource;
use crate::ui_egui::grid::{EventGrid, GridConfig};
use crate::ui_egui::popup::{CloseAction, ModalPopup};
use crate::utils::date::{DateError, DayBoundary};

/// Builds the tag-scoped filter for a time range.
#[cfg_attr(test, mockall::automock)]
pub trait TagsFilterProvider {
    fn compute_tags_filter(&self, start: i64, end: i64) -> FilterSpec;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventsWindowError {
    #[error("invalid click date: {0}")]
    InvalidDate(#[from] DateError),
    #[error("the calendar that owns this window is gone")]
    CalendarUnavailable,
}

pub struct EventsWindow {
    popup: ModalPopup,
    grid: EventGrid,
    calendar: Weak<dyn TagsFilterProvider>,
}

impl EventsWindow {
    pub fn new(
        calendar: Weak<dyn TagsFilterProvider>,
        config: &EventsWindowConfig,
        source: Arc<dyn EventSource>,
    ) -> Self {
        let popup = ModalPopup::new("events_window", "Events", config.width, config.height)
            .with_close_action(CloseAction::Hide);

        Self {
            popup,
            grid: Self::build_form(config, source),
            calendar,
        }
    }

    fn build_form(config: &EventsWindowConfig, source: Arc<dyn EventSource>) -> EventGrid {
        EventGrid::new(
            GridConfig {
                export_mode: config.export_mode,
                paging: true,
                filter: config.initial_filter.clone(),
                page_size: config.page_size,
                remote_sort: true,
                height: config.grid_height,
                bottom_bar: true,
            },
            source,
        )
    }

    /// Filter the grid to the clicked day, start loading, and show the window.
    ///
    /// `tags` is accepted for callers that pass one; the tag scope always
    /// comes from the calendar.
    pub fn show_events<Tz: TimeZone>(
        &mut self,
        click: &CalendarClickEvent<Tz>,
        tags: &[String],
    ) -> Result<(), EventsWindowError> {
        let day = DayBoundary::containing(&click.start)?;

        let calendar = self
            .calendar
            .upgrade()
            .ok_or(EventsWindowError::CalendarUnavailable)?;
        let filter = calendar.compute_tags_filter(day.start, day.end);

        if !tags.is_empty() {
            log::debug!("Ignoring {} caller tags; calendar tags apply", tags.len());
        }
        log::debug!(
            "Showing events for {}: [{}, {}) tags={:?}",
            click.date(),
            day.start,
            day.end,
            filter.tags
        );

        let store = self.grid.store_mut();
        store.set_filter(filter);
        store.load();

        self.popup
            .set_title(format!("Events on {}", click.date().format("%A %-d %B %Y")));
        self.popup.show();
        Ok(())
    }

    /// Poll the store and draw the window. Call once per frame.
    pub fn render(&mut self, ctx: &egui::Context) {
        let store = self.grid.store_mut();
        store.poll();
        if store.is_loading() {
            ctx.request_repaint();
        }

        let grid = &mut self.grid;
        self.popup.render(ctx, |ui| grid.render(ui));
    }

    pub fn close(&mut self) {
        self.popup.close();
    }

    pub fn is_visible(&self) -> bool {
        self.popup.is_visible()
    }

    pub fn popup(&self) -> &ModalPopup {
        &self.popup
    }

    pub fn popup_mut(&mut self) -> &mut ModalPopup {
        &mut self.popup
    }

    pub fn grid(&self) -> &EventGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut EventGrid {
        &mut self.grid
    }
}
