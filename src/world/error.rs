//! Error types for scene, atlas, and config data loading.

use thiserror::Error;

/// Errors that can occur when loading scene, atlas, or config data.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// Layer dimensions don't match the first layer of the scene.
    #[error("Grid mismatch in layer '{layer}': expected {expected_width}x{expected_height}, got {actual_width}x{actual_height}")]
    GridMismatch {
        layer: String,
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    /// Invalid palette reference.
    #[error("Unknown palette entry '{character}' in layer '{layer}' at ({x}, {y})")]
    UnknownPaletteEntry {
        layer: String,
        character: char,
        x: usize,
        y: usize,
    },

    /// Palette tile index is outside the tileset grid.
    #[error("Palette entry '{character}' references tile {tile}, but the tileset only has {count} tiles")]
    TileOutOfRange { character: char, tile: u32, count: u32 },

    /// The scene names a collision layer it doesn't declare.
    #[error("Collision layer '{0}' not found")]
    MissingLayer(String),

    /// A named object the scene needs is missing.
    #[error("Object '{0}' not found")]
    MissingObject(String),

    /// A frame name is not present in the atlas.
    #[error("Frame '{frame}' not found in atlas '{atlas}'")]
    MissingFrame { atlas: String, frame: String },

    /// An animation was configured with no frames.
    #[error("Animation '{0}' has no frames")]
    EmptyAnimation(String),

    /// Atlas frame index is outside the sheet grid.
    #[error("Frame '{frame}' has index {index}, but atlas '{atlas}' only has {count} cells")]
    FrameOutOfRange {
        atlas: String,
        frame: String,
        index: usize,
        count: usize,
    },

    /// Color string could not be parsed.
    #[error("Invalid color '{value}': {details}")]
    InvalidColor { value: String, details: String },
}
