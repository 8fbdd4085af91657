//! Core game module - states, configuration, and asset preload.
//!
//! This module provides the foundation that all other game systems build upon.

mod config;
mod loading;
mod plugin;
mod states;

pub use config::*;
pub use loading::SceneAssets;
pub use plugin::{CorePlugin, LoadSet};
pub use states::*;
