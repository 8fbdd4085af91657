//! Tuxmon Town - Entry Point
//!
//! Controls:
//! - Arrow keys: Walk
//! - D: Show physics debug view

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use tuxmon_town::core::GameConfig;

fn main() {
    let (config, config_report) = GameConfig::load();

    let image_plugin = if config.pixel_art {
        ImagePlugin::default_nearest()
    } else {
        ImagePlugin::default()
    };

    App::new()
        // Bevy default plugins
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: config.title.clone(),
                        resolution: (config.width, config.height).into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(image_plugin),
        )

        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(
            config.pixels_per_meter,
        ))
        .add_plugins(RapierDebugRenderPlugin {
            enabled: false,
            ..default()
        })

        // Our game plugin
        .insert_resource(config)
        .insert_resource(config_report)
        .add_plugins(tuxmon_town::TuxmonTownPlugin)

        .run();
}
