//! Spike: a cannon fires a spike across the map and the camera chases it.
//!
//! - `Space` launches the spike
//! - `R` puts it back on the cannon
//!
//! The flight itself lives in the `launch` module and is stepped by
//! [`plugin::LaunchPlugin`] on the fixed schedule. Everything drawn or heard
//! is wired up in the `game` module.

use bevy::{log::LogPlugin, prelude::*};

mod config;
mod game;
mod input;
mod launch;
mod plugin;

use config::LaunchTuning;
use game::GamePlugin;
use plugin::LaunchPlugin;

fn main() -> AppExit {
    // A local .env may point SPIKE_CONFIG somewhere else.
    let _ = dotenvy::dotenv();

    let tuning = match LaunchTuning::load() {
        Ok(tuning) => tuning,
        Err(error) => {
            eprintln!("spike: {error}");
            return AppExit::error();
        }
    };
    let [width, height] = tuning.window_size;

    App::new()
        .add_plugins((
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Spike".into(),
                        resolution: (width, height).into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: tuning.log_filter.clone(),
                    ..default()
                }),
            LaunchPlugin { tuning },
            GamePlugin,
        ))
        .insert_resource(ClearColor(Color::BLACK))
        .run()
}
