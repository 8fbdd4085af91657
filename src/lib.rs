//! Tuxmon Town - a top-down tile-based walking demo in Bevy.
//!
//! A single character walks around a tile map, blocked by the map's solid
//! tiles, with a four-direction walk cycle.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, configuration, asset preload
//! - **Player**: Movement resolution, walk animations, sprite atlas data
//! - **World**: Scene data, tile layers, tile collision, camera, debug view

pub mod core;
pub mod player;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct TuxmonTownPlugin;

impl Plugin for TuxmonTownPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // World systems
            .add_plugins(world::WorldPlugin);
    }
}
