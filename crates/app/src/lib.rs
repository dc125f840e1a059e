//! Composition root: configuration, consumer handler sets and bus wiring.

pub mod config;
pub mod handlers;
pub mod wiring;

pub use config::{AppConfig, ConfigError, HandlerSetKind};
pub use handlers::HandlerSet;
pub use wiring::EventSystem;
