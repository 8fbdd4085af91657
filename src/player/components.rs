//! Player-related components.

use bevy::prelude::*;
use std::time::Duration;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// One of the four directions the character can face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Left,
    Right,
    /// Away from the viewer (walking up the screen)
    Back,
    /// Toward the viewer (walking down the screen)
    Front,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::Left, Facing::Right, Facing::Back, Facing::Front];

    /// Name used in atlas frame and animation keys.
    pub fn name(self) -> &'static str {
        match self {
            Facing::Left => "left",
            Facing::Right => "right",
            Facing::Back => "back",
            Facing::Front => "front",
        }
    }
}

/// Plays looping walk animations on the player's sprite.
///
/// Starting the animation that is already playing is a no-op, so the update
/// loop can request the same walk every frame without restarting it.
/// Stopping leaves the sprite on whatever frame it was showing.
#[derive(Component, Debug, Clone)]
pub struct SpriteAnimator {
    playing: Option<Facing>,
    frame: usize,
    timer: Timer,
}

impl SpriteAnimator {
    pub fn new(frame_rate: f32) -> Self {
        Self {
            playing: None,
            frame: 0,
            timer: Timer::from_seconds(1.0 / frame_rate.max(f32::EPSILON), TimerMode::Repeating),
        }
    }

    /// The walk currently playing, if any.
    pub fn playing(&self) -> Option<Facing> {
        self.playing
    }

    /// Index into the playing walk's frame list.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Start the walk for `facing` from its first frame.
    ///
    /// Returns `false` without touching anything if it is already playing.
    pub fn play(&mut self, facing: Facing) -> bool {
        if self.playing == Some(facing) {
            return false;
        }
        self.playing = Some(facing);
        self.frame = 0;
        self.timer.reset();
        true
    }

    pub fn stop(&mut self) {
        self.playing = None;
    }

    /// Advance the clock; returns the new frame index if it changed.
    pub fn tick(&mut self, delta: Duration, frame_count: usize) -> Option<usize> {
        if self.playing.is_none() || frame_count == 0 {
            return None;
        }

        self.timer.tick(delta);
        let steps = self.timer.times_finished_this_tick() as usize;
        if steps == 0 {
            return None;
        }

        self.frame = (self.frame + steps) % frame_count;
        Some(self.frame)
    }
}
