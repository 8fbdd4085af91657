//! Core plugin that sets up game states, configuration, and asset preload.

use bevy::prelude::*;

use super::config::{log_config_report, GameConfig};
use super::loading::{check_scene_assets, preload_scene_assets};
use super::states::GameState;

/// Ordering for the work done when entering `GameState::Loading`.
///
/// Data files are parsed into registries first, then images are requested
/// from the asset server using the paths those registries contain.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum LoadSet {
    /// RON data files (scenes, atlases)
    Data,
    /// Image requests
    Assets,
}

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame)
/// - The game config resource (defaults if the bootstrap didn't insert one)
/// - Logging of how the config was loaded
/// - Asset preload and the transition into gameplay
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            // Keeps a config inserted by the bootstrap
            .init_resource::<GameConfig>()

            // Initialize game states
            .init_state::<GameState>()

            // Config is read before logging exists; report it now
            .add_systems(Startup, log_config_report)

            .configure_sets(
                OnEnter(GameState::Loading),
                (LoadSet::Data, LoadSet::Assets).chain(),
            )
            .add_systems(
                OnEnter(GameState::Loading),
                (apply_clear_color, preload_scene_assets).in_set(LoadSet::Assets),
            )
            .add_systems(
                Update,
                check_scene_assets.run_if(in_state(GameState::Loading)),
            );
    }
}

/// Set the window clear color from the configured background.
fn apply_clear_color(mut commands: Commands, config: Res<GameConfig>) {
    match config.clear_color() {
        Ok(color) => commands.insert_resource(ClearColor(color)),
        Err(e) => error!("{}. Keeping the default clear color.", e),
    }
}
