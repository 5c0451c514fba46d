//! Application module
//!
//! Contains the scene viewer, its configuration and theme definitions.

pub mod config;
pub mod scene_app;
pub mod theme;

pub use config::{AppConfig, ConfigError};
pub use scene_app::{Action, SceneApp, ViewerScene};
