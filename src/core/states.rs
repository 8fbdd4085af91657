//! Game state definitions that map the scene lifecycle onto Bevy states.
//!
//! `Loading` covers asset preload: images are requested on enter and the
//! state is left once they have finished loading. Entering `InGame` builds
//! the scene once, and the per-frame update systems run while `InGame` is
//! active.

use bevy::prelude::*;

/// Main game states.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Requesting and waiting on the tileset and atlas images
    #[default]
    Loading,
    /// Active gameplay
    InGame,
}
