//! Player module - player entity, movement, and walk animations.

mod animation;
mod components;
mod movement;
mod plugin;

pub use animation::{
    generate_frame_names, AtlasDefinition, AtlasRegistry, PlayerAnimations, WalkAnimation,
};
pub use components::*;
pub use movement::{
    idle_pose, resolve_movement, settle_velocity, spawn_player, AnimationCommand, DirectionInput,
    MovementOutcome, PLAYER_Z, REST_SPEED,
};
pub use plugin::{PlayerPlugin, PlayerSet};
