// Re-export all public modules so they can be used from main.rs
pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod ui;
pub mod utils;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

pub use app::Engine;
pub use config::Config;
pub use error::{Error, Result};
