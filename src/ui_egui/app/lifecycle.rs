use std::path::PathBuf;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use anyhow::{Context, Result};

use super::context::AppContext;
use super::EventCalendarApp;
use crate::models::config::AppConfig;
use crate::services::database::Database;
use crate::services::event::{EventService, EventSource, SqliteEventSource};
use crate::ui_egui::events_window::{EventsWindow, TagsFilterProvider};
use crate::ui_egui::views::calendar::EventCalendar;

impl EventCalendarApp {
    pub fn new(config: AppConfig, config_path: Option<PathBuf>) -> Result<Self> {
        config.validate()?;
        let database = initialize_database(&config)?;
        import_startup_events(&database, &config);

        let source: Arc<dyn EventSource> = Arc::new(SqliteEventSource::from_database(&database));
        let calendar = Rc::new(EventCalendar::new(&config.calendar));
        let calendar_ref: Weak<dyn TagsFilterProvider> = Rc::downgrade(&calendar) as Weak<dyn TagsFilterProvider>;

        let mut events_window = EventsWindow::new(calendar_ref, &config.events_window, source);
        events_window.grid_mut().set_time_zone(calendar.time_zone());
        {
            let calendar = Rc::downgrade(&calendar);
            events_window.popup_mut().on_hide(move || {
                if let Some(calendar) = calendar.upgrade() {
                    calendar.clear_selection();
                }
            });
        }

        let tag_input = calendar.tags().join(", ");
        let tag_match_input = calendar.tag_match();
        let context = AppContext::new(database, config, config_path);

        let mut app = Self {
            context,
            calendar,
            events_window,
            tag_input,
            tag_match_input,
            stored_events: 0,
            status_message: None,
        };
        app.refresh_stored_count();
        log::info!("Event calendar ready with {} stored events", app.stored_events);
        Ok(app)
    }

    pub(super) fn handle_update(&mut self, ctx: &egui::Context) {
        self.render_toolbar(ctx);
        self.render_status_bar(ctx);

        let clicked = egui::CentralPanel::default()
            .show(ctx, |ui| self.calendar.render(ui))
            .inner;

        if let Some(date) = clicked {
            self.open_day(date);
        }

        self.events_window.render(ctx);
    }
}

fn initialize_database(config: &AppConfig) -> Result<Database> {
    let db_path = config.resolve_database_path();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
    }

    let db = Database::new(&db_path.to_string_lossy())?;
    db.initialize_schema()
        .context("Failed to initialize database schema")?;
    log::info!("Opened event database at {}", db.path());
    Ok(db)
}

fn import_startup_events(database: &Database, config: &AppConfig) {
    let Some(path) = &config.import_on_startup else {
        return;
    };

    if let Err(err) = EventService::new(database.connection()).import_json(path) {
        log::warn!("Startup import from {} failed: {:#}", path.display(), err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::{EventState, LoggedEvent};

    fn config_in(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            database_path: Some(dir.join("data").join("events.db")),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_new_creates_database_and_imports() {
        let dir = tempfile::tempdir().unwrap();
        let import = dir.path().join("seed.json");
        let events = vec![LoggedEvent::new("web-01", 1_704_100_000, EventState::Critical).unwrap()];
        std::fs::write(&import, serde_json::to_string(&events).unwrap()).unwrap();

        let mut config = config_in(dir.path());
        config.import_on_startup = Some(import);

        let app = EventCalendarApp::new(config, None).unwrap();
        assert_eq!(app.stored_events, 1);
        assert!(dir.path().join("data").join("events.db").exists());
    }

    #[test]
    fn test_open_day_shows_window() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = EventCalendarApp::new(config_in(dir.path()), None).unwrap();
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        app.open_day(date);
        assert!(app.events_window.is_visible());
        assert!(app.status_message.is_none());

        app.events_window.close();
        assert!(!app.events_window.is_visible());
        assert_eq!(app.calendar.selected_day(), None);
    }

    #[test]
    fn test_apply_tag_input_saves_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        let mut app = EventCalendarApp::new(config_in(dir.path()), Some(config_path.clone())).unwrap();

        app.tag_input = "prod, db, prod".to_string();
        app.tag_match_input = crate::models::filter::TagMatch::Any;
        app.apply_tag_input();

        assert_eq!(app.tag_input, "prod, db");
        let saved = AppConfig::load_from(&config_path).unwrap();
        assert_eq!(saved.calendar.tags, vec!["prod".to_string(), "db".to_string()]);
        assert_eq!(saved.calendar.tag_match, crate::models::filter::TagMatch::Any);
    }

    #[test]
    fn test_in_memory_database_is_rejected() {
        let config = AppConfig {
            database_path: Some(PathBuf::from(":memory:")),
            ..AppConfig::default()
        };
        assert!(EventCalendarApp::new(config, None).is_err());
    }

    #[test]
    fn test_missing_import_file_does_not_abort_startup() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.import_on_startup = Some(dir.path().join("missing.json"));

        let app = EventCalendarApp::new(config, None).unwrap();
        assert_eq!(app.stored_events, 0);
    }
}
