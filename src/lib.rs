pub mod api;
pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod schemas;
pub mod services;
pub mod state;
pub mod theme;

pub use app::create_app;
pub use client::ApiClient;
pub use theme::ThemeManager;
