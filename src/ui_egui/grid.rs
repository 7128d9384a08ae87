//! Paged, sortable event table backed by an [`EventStore`].

use std::sync::Arc;

use chrono_tz::Tz;
use egui::{Align, Color32, Layout, RichText};
use egui_extras::{Column, TableBuilder};

use crate::models::event::{EventState, LoggedEvent};
use crate::models::filter::FilterSpec;
use crate::models::query::SortColumn;
use crate::services::event::EventSource;
use crate::services::store::{EventStore, LoadStatus, StoreOptions};

const ROW_HEIGHT: f32 = 20.0;
const HEADER_HEIGHT: f32 = 22.0;
const TOOLBAR_HEIGHT: f32 = 30.0;

/// Construction options for an [`EventGrid`]
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    /// Static rendering for reports: no sort buttons, no toolbar
    pub export_mode: bool,
    pub paging: bool,
    /// Filter installed on the store before the first load
    pub filter: Option<FilterSpec>,
    pub page_size: usize,
    pub remote_sort: bool,
    pub height: f32,
    pub bottom_bar: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            export_mode: false,
            paging: true,
            filter: None,
            page_size: 25,
            remote_sort: true,
            height: 490.0,
            bottom_bar: true,
        }
    }
}

/// User actions collected while drawing, applied afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GridAction {
    Sort(SortColumn),
    PreviousPage,
    NextPage,
    Refresh,
}

/// Header label and the sort column it drives
const COLUMNS: [(&str, Option<SortColumn>); 6] = [
    ("Time", Some(SortColumn::Timestamp)),
    ("Component", Some(SortColumn::Component)),
    ("Resource", Some(SortColumn::Resource)),
    ("State", Some(SortColumn::State)),
    ("Output", Some(SortColumn::Output)),
    ("Tags", None),
];

pub struct EventGrid {
    config: GridConfig,
    store: EventStore,
    time_zone: Option<Tz>,
}

impl EventGrid {
    pub fn new(config: GridConfig, source: Arc<dyn EventSource>) -> Self {
        let mut store = EventStore::new(
            source,
            StoreOptions {
                page_size: config.page_size,
                paging: config.paging,
                remote_sort: config.remote_sort,
            },
        );
        if let Some(filter) = config.filter.clone() {
            store.set_filter(filter);
        }

        Self {
            config,
            store,
            time_zone: None,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EventStore {
        &mut self.store
    }

    /// Zone used to print event times; the system zone when unset.
    pub fn set_time_zone(&mut self, time_zone: Option<Tz>) {
        self.time_zone = time_zone;
    }

    fn format_time(&self, event: &LoggedEvent) -> String {
        let formatted = match self.time_zone {
            Some(tz) => event.time_in(&tz).map(|t| t.format("%H:%M:%S").to_string()),
            None => event.local_time().map(|t| t.format("%H:%M:%S").to_string()),
        };
        formatted.unwrap_or_else(|| event.timestamp.to_string())
    }

    pub fn render(&mut self, ui: &mut egui::Ui) {
        let mut action = None;

        if let LoadStatus::Failed(message) = self.store.status() {
            ui.colored_label(Color32::LIGHT_RED, format!("Failed to load events: {}", message));
        }

        let show_toolbar = self.config.bottom_bar && !self.config.export_mode;
        let table_height = if show_toolbar {
            self.config.height - TOOLBAR_HEIGHT
        } else {
            self.config.height
        };

        ui.allocate_ui(egui::vec2(ui.available_width(), table_height), |ui| {
            self.render_table(ui, table_height, &mut action);
        });

        if show_toolbar {
            ui.separator();
            self.render_toolbar(ui, &mut action);
        }

        if let Some(action) = action {
            self.apply(action);
        }
    }

    fn render_table(&self, ui: &mut egui::Ui, height: f32, action: &mut Option<GridAction>) {
        let sort = self.store.sort();

        TableBuilder::new(ui)
            .striped(true)
            .resizable(!self.config.export_mode)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::auto().at_least(70.0))
            .column(Column::initial(110.0).at_least(60.0))
            .column(Column::initial(90.0).at_least(50.0))
            .column(Column::auto().at_least(60.0))
            .column(Column::remainder().at_least(120.0).clip(true))
            .column(Column::auto().at_least(60.0))
            .min_scrolled_height(0.0)
            .max_scroll_height(height - HEADER_HEIGHT)
            .header(HEADER_HEIGHT, |mut header| {
                for (label, column) in COLUMNS {
                    header.col(|ui| {
                        let text = match column {
                            Some(column) if column == sort.column => {
                                format!("{} {}", label, sort.direction.arrow())
                            }
                            _ => label.to_string(),
                        };

                        match column {
                            Some(column) if !self.config.export_mode => {
                                if ui.button(RichText::new(text).strong()).clicked() {
                                    *action = Some(GridAction::Sort(column));
                                }
                            }
                            _ => {
                                ui.strong(text);
                            }
                        }
                    });
                }
            })
            .body(|mut body| {
                for event in self.store.records() {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.label(self.format_time(event));
                        });
                        row.col(|ui| {
                            ui.label(&event.component);
                        });
                        row.col(|ui| {
                            ui.label(event.resource.as_deref().unwrap_or("-"));
                        });
                        row.col(|ui| {
                            ui.label(
                                RichText::new(event.state.label()).color(state_color(event.state)),
                            );
                        });
                        row.col(|ui| {
                            let response = ui.label(&event.output);
                            if let Some(long_output) = &event.long_output {
                                response.on_hover_text(long_output);
                            }
                        });
                        row.col(|ui| {
                            ui.label(event.tags.join(", "));
                        });
                    });
                }
            });

        if self.store.records().is_empty() && self.store.status() == &LoadStatus::Loaded {
            ui.label(RichText::new("No events for this day").italics());
        }
    }

    fn render_toolbar(&self, ui: &mut egui::Ui, action: &mut Option<GridAction>) {
        ui.horizontal(|ui| {
            if self.config.paging {
                if ui
                    .add_enabled(self.store.has_previous_page(), egui::Button::new("◀"))
                    .clicked()
                {
                    *action = Some(GridAction::PreviousPage);
                }
                ui.label(format!(
                    "Page {} of {}",
                    self.store.page() + 1,
                    self.store.page_count()
                ));
                if ui
                    .add_enabled(self.store.has_next_page(), egui::Button::new("▶"))
                    .clicked()
                {
                    *action = Some(GridAction::NextPage);
                }
                ui.separator();
            }

            if ui
                .add_enabled(!self.store.is_loading(), egui::Button::new("⟳ Refresh"))
                .clicked()
            {
                *action = Some(GridAction::Refresh);
            }

            if self.store.is_loading() {
                ui.spinner();
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(format!("{} event(s)", self.store.total()));
            });
        });
    }

    fn apply(&mut self, action: GridAction) {
        match action {
            GridAction::Sort(column) => self.store.sort_by(column),
            GridAction::PreviousPage => {
                self.store.previous_page();
            }
            GridAction::NextPage => {
                self.store.next_page();
            }
            GridAction::Refresh => self.store.refresh(),
        }
    }
}

pub fn state_color(state: EventState) -> Color32 {
    match state {
        EventState::Ok => Color32::from_rgb(60, 170, 80),
        EventState::Warning => Color32::from_rgb(220, 150, 50),
        EventState::Critical => Color32::from_rgb(200, 60, 60),
        EventState::Unknown => Color32::GRAY,
    }
}
