pub mod api;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod models;
pub mod scrape;
pub mod state;
pub mod telemetry;
pub mod views;
