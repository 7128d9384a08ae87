// Event Calendar Application
// Main entry point

use event_calendar::models::config::AppConfig;
use event_calendar::ui_egui::EventCalendarApp;

type AppCreatorResult = Result<Box<dyn eframe::App>, Box<dyn std::error::Error + Send + Sync>>;

fn main() -> eframe::Result<()> {
    env_logger::init();

    log::info!("Starting Event Calendar");

    let config_path = AppConfig::default_path();
    let config = AppConfig::load_or_default();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Event Calendar")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Event Calendar",
        options,
        Box::new(move |_cc: &eframe::CreationContext<'_>| -> AppCreatorResult {
            let app = EventCalendarApp::new(config, config_path)?;
            Ok(Box::new(app))
        }),
    )
}
