mod app;
pub mod events_window;
pub mod grid;
pub mod popup;
pub mod views;

pub use app::EventCalendarApp;
