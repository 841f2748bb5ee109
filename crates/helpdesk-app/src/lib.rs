//! Application shell: configuration, screen bindings, and the headless
//! run loop wiring in `main.rs`.

pub mod config;
pub mod screens;

pub use config::{load_from_env, load_from_path, ConfigError, HelpdeskConfig};
pub use screens::{ChatScreen, ListScreen};
