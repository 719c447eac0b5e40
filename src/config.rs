use std::{env, fmt, fs, io, path::PathBuf};

use bevy::prelude::*;
use serde::Deserialize;

pub const CONFIG_ENV: &str = "SPIKE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "spike.toml";
pub const MAX_TICK_HZ: f64 = 10_000.0;

/// Gameplay and presentation tuning. Every field has a default, so a
/// config file only needs the values it overrides.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LaunchTuning {
    /// Logical window size in pixels.
    pub window_size: [f32; 2],

    /// Simulation ticks per second. Each tick is one unit time-step.
    pub tick_hz: f64,

    pub cannon_position: [f32; 2],
    pub spike_size: [f32; 2],
    /// Spike rest position relative to the cannon.
    pub spawn_offset: [f32; 2],

    /// Velocity given to the spike on its first tick in the air.
    pub launch_impulse: [f32; 2],
    pub damping: f32,
    pub gravity: f32,
    /// Per-tick factor applied to the rendered height.
    pub shrink: f32,
    pub distance_scale: f32,

    pub camera_offset: [f32; 2],
    pub hud_inset: [f32; 2],
    pub hud_spacing: f32,
    pub hud_font_size: f32,
    pub hud_font: Option<String>,

    pub launch_volume: f32,
    pub music_volume: f32,

    pub background_image: String,
    pub cannon_image: String,
    pub spike_image: String,
    pub launch_sound: String,
    pub music: String,

    pub log_filter: String,
}

impl Default for LaunchTuning {
    fn default() -> Self {
        Self {
            window_size: [640.0, 480.0],
            tick_hz: 144.0,
            cannon_position: [0.0, 0.0],
            spike_size: [48.0, 48.0],
            spawn_offset: [50.0, 50.0],
            launch_impulse: [15.0, 3.0],
            damping: 0.9999,
            gravity: 0.05,
            shrink: 0.995,
            distance_scale: 1000.0,
            camera_offset: [50.0, 50.0],
            hud_inset: [10.0, 10.0],
            hud_spacing: 400.0,
            hud_font_size: 12.0,
            hud_font: None,
            launch_volume: 0.15,
            music_volume: 0.1,
            background_image: "textures/background.png".into(),
            cannon_image: "sprites/cannon.png".into(),
            spike_image: "sprites/spike.png".into(),
            launch_sound: "sounds/cannon.ogg".into(),
            music: "music/background.ogg".into(),
            log_filter: "info,wgpu=error,naga=warn".into(),
        }
    }
}

impl LaunchTuning {
    /// Reads tuning from `$SPIKE_CONFIG`, or from `spike.toml` when the
    /// variable is unset. Only a missing default file falls back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(PathBuf::from(path)),
            Err(_) => match Self::from_file(PathBuf::from(DEFAULT_CONFIG_PATH)) {
                Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                    Ok(Self::default())
                }
                result => result,
            },
        }
    }

    pub fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let tuning: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.numbers().all(f32::is_finite) {
            return Err(ConfigError::Invalid("numbers must be finite"));
        }
        let [width, height] = self.window_size;
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::Invalid("window_size must be positive"));
        }
        if !(self.tick_hz > 0.0 && self.tick_hz <= MAX_TICK_HZ) {
            return Err(ConfigError::Invalid("tick_hz must be in (0, 10000]"));
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(ConfigError::Invalid("damping must be in (0, 1]"));
        }
        if !(self.shrink > 0.0 && self.shrink <= 1.0) {
            return Err(ConfigError::Invalid("shrink must be in (0, 1]"));
        }
        if self.distance_scale == 0.0 {
            return Err(ConfigError::Invalid("distance_scale must be non-zero"));
        }
        for volume in [self.launch_volume, self.music_volume] {
            if !(0.0..=1.0).contains(&volume) {
                return Err(ConfigError::Invalid("volumes must be in [0, 1]"));
            }
        }
        if self.launch_impulse[1] == 0.0 {
            return Err(ConfigError::Invalid("launch_impulse needs a vertical component"));
        }
        Ok(())
    }

    fn numbers(&self) -> impl Iterator<Item = f32> {
        [
            self.window_size,
            self.cannon_position,
            self.spike_size,
            self.spawn_offset,
            self.launch_impulse,
            self.camera_offset,
            self.hud_inset,
        ]
        .into_iter()
        .flatten()
        .chain([
            self.damping,
            self.gravity,
            self.shrink,
            self.distance_scale,
            self.hud_spacing,
            self.hud_font_size,
            self.launch_volume,
            self.music_volume,
        ])
    }

    pub fn window_size(&self) -> Vec2 {
        Vec2::from(self.window_size)
    }

    pub fn cannon_position(&self) -> Vec2 {
        Vec2::from(self.cannon_position)
    }

    pub fn spike_size(&self) -> Vec2 {
        Vec2::from(self.spike_size)
    }

    pub fn spawn_offset(&self) -> Vec2 {
        Vec2::from(self.spawn_offset)
    }

    pub fn launch_impulse(&self) -> Vec2 {
        Vec2::from(self.launch_impulse)
    }

    pub fn camera_offset(&self) -> Vec2 {
        Vec2::from(self.camera_offset)
    }

    pub fn hud_inset(&self) -> Vec2 {
        Vec2::from(self.hud_inset)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Parse(toml::de::Error),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            ConfigError::Parse(error) => write!(f, "malformed tuning file: {error}"),
            ConfigError::Invalid(reason) => write!(f, "invalid tuning: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(error) => Some(error),
            ConfigError::Invalid(_) => None,
        }
    }
}
