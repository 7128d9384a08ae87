// Module exports for models

pub mod config;
pub mod event;
pub mod filter;
pub mod query;
pub mod ui;
