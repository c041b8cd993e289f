pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod exporters;
pub mod fetch_error;
pub mod models;
pub mod services;
pub mod utils;
