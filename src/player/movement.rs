//! Top-down player movement and walk animation selection.
//!
//! [`resolve_movement`] is pure: it takes the held directions and the body's
//! velocity from the previous frame and decides this frame's velocity and
//! what the sprite should do. [`player_movement`] is the adapter that feeds it
//! from the keyboard and applies the result to the Rapier body and animator.
//!
//! Velocities inside the resolver are in screen space (+y down). The Rapier
//! body lives in Bevy's y-up world space, so the adapter flips y both ways.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::animation::{set_atlas_index, PlayerAnimations};
use super::components::*;
use crate::core::{GameConfig, KeyBindings, PlayerConfig};
use crate::world::{map_to_world, world_to_map};

/// Z of the player sprite; above every tile layer.
pub const PLAYER_Z: f32 = 10.0;

/// Speeds below this (pixels per second) count as standing still.
///
/// Contact resolution leaves tiny residue of either sign on a blocked axis.
pub const REST_SPEED: f32 = 1e-3;

/// Directional keys held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionInput {
    /// Read the bound keys from the keyboard state.
    pub fn from_keyboard(keyboard: &ButtonInput<KeyCode>, keys: &KeyBindings) -> Self {
        Self {
            up: keyboard.pressed(keys.up),
            down: keyboard.pressed(keys.down),
            left: keyboard.pressed(keys.left),
            right: keyboard.pressed(keys.right),
        }
    }
}

/// What the sprite should do this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationCommand {
    /// Loop the walk for this facing (no restart if it is already playing).
    Play(Facing),
    /// Stop animating; switch to the idle frame for `pose` if there is one.
    Stop { pose: Option<Facing> },
}

/// Result of one movement step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementOutcome {
    /// Screen-space velocity (+y down).
    pub velocity: Vec2,
    pub animation: AnimationCommand,
}

/// Decide this frame's velocity and animation.
///
/// Left beats right and up beats down, both for movement and for which walk
/// plays, and horizontal walks beat vertical ones. Diagonals are rescaled so
/// their speed equals `speed`. With no key held, the idle pose comes from the
/// sign of `previous`, checking x before y.
pub fn resolve_movement(input: DirectionInput, previous: Vec2, speed: f32) -> MovementOutcome {
    let mut velocity = Vec2::ZERO;

    if input.left {
        velocity.x = -speed;
    } else if input.right {
        velocity.x = speed;
    }

    if input.up {
        velocity.y = -speed;
    } else if input.down {
        velocity.y = speed;
    }

    // Zero stays zero instead of turning into NaN.
    let velocity = velocity.normalize_or_zero() * speed;

    let animation = if input.left {
        AnimationCommand::Play(Facing::Left)
    } else if input.right {
        AnimationCommand::Play(Facing::Right)
    } else if input.up {
        AnimationCommand::Play(Facing::Back)
    } else if input.down {
        AnimationCommand::Play(Facing::Front)
    } else {
        AnimationCommand::Stop {
            pose: idle_pose(previous),
        }
    };

    MovementOutcome {
        velocity,
        animation,
    }
}

/// Facing implied by the last velocity, or `None` if the body was at rest.
pub fn idle_pose(previous: Vec2) -> Option<Facing> {
    if previous.x < 0.0 {
        Some(Facing::Left)
    } else if previous.x > 0.0 {
        Some(Facing::Right)
    } else if previous.y < 0.0 {
        Some(Facing::Back)
    } else if previous.y > 0.0 {
        Some(Facing::Front)
    } else {
        None
    }
}

/// Snap near-zero velocity components to exactly zero.
pub fn settle_velocity(velocity: Vec2) -> Vec2 {
    Vec2::select(
        velocity.abs().cmplt(Vec2::splat(REST_SPEED)),
        Vec2::ZERO,
        velocity,
    )
}

/// Apply an animation command to the player's animator and sprite.
pub fn apply_animation(
    command: AnimationCommand,
    animator: &mut SpriteAnimator,
    sprite: &mut Sprite,
    animations: &PlayerAnimations,
) {
    match command {
        AnimationCommand::Play(facing) => {
            if animator.play(facing) {
                if let Some(&first) = animations.walk(facing).and_then(|w| w.frames.first()) {
                    set_atlas_index(sprite, first);
                }
            }
        }
        AnimationCommand::Stop { pose } => {
            animator.stop();
            if let Some(frame) = pose.and_then(|facing| animations.idle_frame(facing)) {
                set_atlas_index(sprite, frame);
            }
        }
    }
}

/// Per-frame player update: keys in, body velocity and animation out.
pub fn player_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    config: Res<GameConfig>,
    animations: Option<Res<PlayerAnimations>>,
    mut player_query: Query<(&mut Velocity, &mut SpriteAnimator, &mut Sprite), With<Player>>,
) {
    let Ok((mut velocity, mut animator, mut sprite)) = player_query.get_single_mut() else {
        return;
    };

    let input = DirectionInput::from_keyboard(&keyboard, &config.keys);
    let previous = settle_velocity(world_to_map(velocity.linvel));
    let outcome = resolve_movement(input, previous, config.player.speed);

    velocity.linvel = map_to_world(outcome.velocity);

    if let Some(animations) = animations {
        apply_animation(outcome.animation, &mut animator, &mut sprite, &animations);
    }
}

/// Spawn the player at `position` (world space) as a dynamic body that can't
/// rotate, so tile colliders block it but never spin it.
pub fn spawn_player(
    commands: &mut Commands,
    position: Vec2,
    config: &PlayerConfig,
    image: Handle<Image>,
    animations: &PlayerAnimations,
) -> Entity {
    let sprite = Sprite::from_atlas_image(
        image,
        TextureAtlas {
            layout: animations.layout.clone(),
            index: animations.spawn_frame,
        },
    );

    commands
        .spawn((
            Player,
            SpriteAnimator::new(config.frame_rate),
            sprite,
            Transform::from_translation(position.extend(PLAYER_Z)),
            // Rapier physics components
            RigidBody::Dynamic,
            Collider::cuboid(config.hitbox.0, config.hitbox.1),
            LockedAxes::ROTATION_LOCKED,
            Velocity::zero(),
            // Slide along walls instead of sticking to them
            Friction {
                coefficient: 0.0,
                combine_rule: CoefficientCombineRule::Min,
            },
            Ccd::enabled(),
        ))
        .id()
}
