//! Player plugin - atlas loading, walk animations, and per-frame movement.

use bevy::prelude::*;

use super::animation::{animate_sprites, load_atlas_definitions, setup_player_animations};
use super::movement::player_movement;
use crate::core::{GameState, LoadSet};

/// Ordering of player work that other plugins depend on.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlayerSet {
    /// Walk animations exist after this set runs on entering `InGame`.
    Animations,
}

/// Player plugin - handles atlas data, animations, and movement.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(GameState::Loading),
            load_atlas_definitions.in_set(LoadSet::Data),
        )
        .add_systems(
            OnEnter(GameState::InGame),
            setup_player_animations.in_set(PlayerSet::Animations),
        )
        .add_systems(
            Update,
            (player_movement, animate_sprites)
                .chain()
                .run_if(in_state(GameState::InGame)),
        );
    }
}
