//! Game configuration loaded from an external RON file.
//!
//! Everything the bootstrap needs to build the app (window size, clear color,
//! physics gravity) plus the player tuning and key bindings.

use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

use crate::world::{read_ron_file, DataLoadError};

/// Path of the config file, relative to the working directory.
pub const GAME_CONFIG_PATH: &str = "assets/data/game_config.ron";

/// Keyboard bindings for the player and debug toggle.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub up: KeyCode,
    pub down: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    /// Enables physics debug rendering (first press only).
    pub debug: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: KeyCode::ArrowUp,
            down: KeyCode::ArrowDown,
            left: KeyCode::ArrowLeft,
            right: KeyCode::ArrowRight,
            debug: KeyCode::KeyD,
        }
    }
}

/// Player tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Movement speed in pixels per second, on any heading.
    pub speed: f32,
    /// Walk animation frames per second.
    pub frame_rate: f32,
    /// Number of frames in each walk cycle.
    pub walk_frames: usize,
    /// Half extents of the player's collider, in pixels.
    pub hitbox: (f32, f32),
    /// Prefix shared by the player's atlas frames ("misa-left", "misa-left-walk.000", ...).
    pub character: String,
    /// Atlas frame shown when the player spawns.
    pub initial_frame: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 175.0,
            frame_rate: 10.0,
            walk_frames: 4,
            hitbox: (15.0, 20.0),
            character: "misa".to_string(),
            initial_frame: "misa-back".to_string(),
        }
    }
}

/// Top-level game configuration.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    /// Clear color as a hex string ("#000", "#1a1a1a", ...).
    pub background: String,
    /// Nearest-neighbour texture sampling.
    pub pixel_art: bool,
    /// World gravity in pixels per second squared (y down).
    pub gravity: (f32, f32),
    pub pixels_per_meter: f32,
    /// Scene file stem under assets/data/scenes/.
    pub scene: String,
    /// Atlas file stem under assets/data/atlas/.
    pub atlas: String,
    pub player: PlayerConfig,
    pub keys: KeyBindings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "Tuxmon Town".to_string(),
            width: 800.0,
            height: 640.0,
            background: "#000".to_string(),
            pixel_art: true,
            gravity: (0.0, 0.0),
            pixels_per_meter: 32.0,
            scene: "scene1".to_string(),
            atlas: "atlas".to_string(),
            player: PlayerConfig::default(),
            keys: KeyBindings::default(),
        }
    }
}

/// Outcome of reading the config file.
///
/// The config is read before the app exists, so nothing can be logged yet;
/// the report is kept as a resource and logged at startup.
#[derive(Resource, Debug)]
pub enum ConfigLoadReport {
    /// Read from this path.
    Loaded(String),
    /// Defaults are in use because the file could not be used.
    Defaults(DataLoadError),
}

impl GameConfig {
    /// Load config from the RON file, falling back to defaults.
    pub fn load() -> (Self, ConfigLoadReport) {
        Self::load_from(GAME_CONFIG_PATH)
    }

    /// Load config from `path`, falling back to defaults.
    pub fn load_from(path: impl AsRef<Path>) -> (Self, ConfigLoadReport) {
        let path = path.as_ref();
        match read_ron_file(path) {
            Ok(config) => (config, ConfigLoadReport::Loaded(path.display().to_string())),
            Err(e) => (Self::default(), ConfigLoadReport::Defaults(e)),
        }
    }

    /// Parsed background color.
    pub fn clear_color(&self) -> Result<Color, DataLoadError> {
        parse_color(&self.background)
    }

    /// Gravity in Bevy's y-up world space.
    pub fn world_gravity(&self) -> Vec2 {
        Vec2::new(self.gravity.0, -self.gravity.1)
    }
}

/// Log how the config was obtained.
pub fn log_config_report(report: Option<Res<ConfigLoadReport>>) {
    match report.as_deref() {
        Some(ConfigLoadReport::Loaded(path)) => info!("Loaded game config from {}", path),
        Some(ConfigLoadReport::Defaults(DataLoadError::FileNotFound(path))) => {
            warn!("Could not find {}. Using defaults.", path)
        }
        Some(ConfigLoadReport::Defaults(e)) => error!("{}. Using defaults.", e),
        None => info!("No game config file read. Using defaults."),
    }
}

/// Parse a CSS-style hex color ("#rgb", "#rrggbb", with or without alpha).
pub fn parse_color(value: &str) -> Result<Color, DataLoadError> {
    Srgba::hex(value)
        .map(Color::from)
        .map_err(|e| DataLoadError::InvalidColor {
            value: value.to_string(),
            details: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_bootstrap() {
        let config = GameConfig::default();
        assert_eq!((config.width, config.height), (800.0, 640.0));
        assert_eq!(config.player.speed, 175.0);
        assert_eq!(config.player.frame_rate, 10.0);
        assert_eq!(config.world_gravity(), Vec2::ZERO);
        assert_eq!(config.keys.left, KeyCode::ArrowLeft);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: GameConfig = ron::from_str(
            r#"(
                title: "Custom",
                player: (speed: 200.0),
                keys: (up: KeyW, down: KeyS, left: KeyA, right: KeyD, debug: F1),
            )"#,
        )
        .unwrap();
        assert_eq!(config.title, "Custom");
        assert_eq!(config.player.speed, 200.0);
        assert_eq!(config.player.walk_frames, 4);
        assert_eq!(config.keys.up, KeyCode::KeyW);
        assert_eq!(config.keys.debug, KeyCode::F1);
        assert_eq!(config.width, 800.0);
    }

    #[test]
    fn test_short_hex_background() {
        let color = parse_color("#000").unwrap();
        assert_eq!(color.to_srgba(), Srgba::BLACK);
        let color = parse_color("#ff8000").unwrap().to_srgba();
        assert_eq!(color.red, 1.0);
        assert_eq!(color.blue, 0.0);
    }

    #[test]
    fn test_invalid_background() {
        assert!(matches!(
            parse_color("#zzz"),
            Err(DataLoadError::InvalidColor { .. })
        ));
    }

    #[test]
    fn test_gravity_is_flipped_into_world_space() {
        let config = GameConfig {
            gravity: (0.0, 300.0),
            ..default()
        };
        assert_eq!(config.world_gravity(), Vec2::new(0.0, -300.0));
    }

    #[test]
    fn test_missing_file_reports_defaults() {
        let (config, report) = GameConfig::load_from("assets/data/no_such_config.ron");
        assert_eq!(config.scene, "scene1");
        assert!(matches!(
            report,
            ConfigLoadReport::Defaults(DataLoadError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_broken_file_reports_parse_error() {
        let path = std::env::temp_dir().join("tuxmon_town_broken_config.ron");
        std::fs::write(&path, "(width: \"wide\")").unwrap();

        let (config, report) = GameConfig::load_from(&path);
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.width, 800.0);
        assert!(matches!(
            report,
            ConfigLoadReport::Defaults(DataLoadError::ParseError { .. })
        ));
    }

    #[test]
    fn test_shipped_config_reports_loaded() {
        let (_, report) = GameConfig::load();
        match report {
            ConfigLoadReport::Loaded(path) => assert!(path.ends_with("game_config.ron")),
            other => panic!("expected loaded config, got {:?}", other),
        }
    }

    #[test]
    fn test_report_is_logged_at_startup() {
        use bevy::ecs::system::RunSystemOnce;

        let mut world = World::new();
        world.insert_resource(ConfigLoadReport::Defaults(DataLoadError::FileNotFound(
            GAME_CONFIG_PATH.to_string(),
        )));
        world.run_system_once(log_config_report).expect("system runs");
        // The report stays available for later inspection.
        assert!(world.contains_resource::<ConfigLoadReport>());
    }

    #[test]
    fn test_shipped_config_parses() {
        let config: GameConfig = read_ron_file(GAME_CONFIG_PATH).unwrap();
        assert_eq!(config.scene, "scene1");
        assert!(config.clear_color().is_ok());
    }
}
