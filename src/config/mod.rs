/// Application configuration loading from config.toml and the environment
pub mod app;

pub use app::{AppConfig, ExportConfig, ServerConfig, load_app_configuration, load_config};
