use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_FAR_PLANE_DISTANCE: f32 = 100.0;
pub const DEFAULT_TIME_BETWEEN_GAMES: Duration = Duration::from_millis(10_000);
pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(2_000);
pub const DEFAULT_JUMP_GAP_CHANCE: f32 = 0.3;

/// Everything that shapes a run. Durations are stored as whole milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    /// Camera far plane; also spaces the scenes apart so they never see each other.
    pub far_plane_distance: f32,
    #[serde(with = "millis")]
    pub time_between_games: Duration,
    #[serde(with = "millis")]
    pub animation_duration: Duration,
    pub fov_y_degrees: f32,
    pub window_width: u32,
    pub window_height: u32,
    pub seed: u64,
    /// Chance that a recycled jump stone comes back as a hole.
    pub jump_gap_chance: f32,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            far_plane_distance: DEFAULT_FAR_PLANE_DISTANCE,
            time_between_games: DEFAULT_TIME_BETWEEN_GAMES,
            animation_duration: DEFAULT_ANIMATION_DURATION,
            fov_y_degrees: engine::camera::DEFAULT_FOV_Y_DEGREES,
            window_width: 1024,
            window_height: 768,
            seed: 0x5EED_CAFE,
            jump_gap_chance: DEFAULT_JUMP_GAP_CHANCE,
        }
    }
}

impl ShowcaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.animation_duration.is_zero() {
            return Err(ConfigError::ZeroAnimationDuration);
        }
        if !(self.far_plane_distance.is_finite() && self.far_plane_distance > 0.0) {
            return Err(ConfigError::InvalidFarPlane(self.far_plane_distance));
        }
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            return Err(ConfigError::InvalidFieldOfView(self.fov_y_degrees));
        }
        if self.time_between_games < self.animation_duration {
            return Err(ConfigError::SpacingShorterThanAnimation {
                spacing: self.time_between_games,
                animation: self.animation_duration,
            });
        }
        if !(0.0..=1.0).contains(&self.jump_gap_chance) {
            return Err(ConfigError::InvalidProbability {
                name: "jump_gap_chance",
                value: self.jump_gap_chance,
            });
        }
        Ok(())
    }

    /// Applies `SHOWCASE_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from `lookup`; unparsable values are ignored with a warning.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(far) = parse_override::<f32>(&lookup, "SHOWCASE_FAR") {
            self.far_plane_distance = far;
        }
        if let Some(ms) = parse_override::<u64>(&lookup, "SHOWCASE_TIME_BETWEEN_GAMES_MS") {
            self.time_between_games = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_override::<u64>(&lookup, "SHOWCASE_ANIMATION_MS") {
            self.animation_duration = Duration::from_millis(ms);
        }
        if let Some(seed) = parse_override::<u64>(&lookup, "SHOWCASE_SEED") {
            self.seed = seed;
        }
        self
    }
}

fn parse_override<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("ignoring {name}={raw:?}: not a valid value");
            None
        }
    }
}

/// Where the config file lives: `SHOWCASE_CONFIG_PATH`, else the XDG config directory.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("SHOWCASE_CONFIG_PATH") {
            return Self {
                path: PathBuf::from(explicit),
            };
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            path: base.join("multiview-showcase").join("config.json"),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the config file. A missing file means defaults; a malformed one is an error.
    pub fn load(&self) -> Result<ShowcaseConfig, ConfigError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", self.path.display());
                return Ok(ShowcaseConfig::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_slice(&bytes).map_err(|source| ConfigError::Json {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, config: &ShowcaseConfig) -> Result<(), ConfigError> {
        let io_err = |source: io::Error| ConfigError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let text = serde_json::to_string_pretty(config).map_err(|source| ConfigError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, text).map_err(io_err)
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(value.as_millis().min(u64::MAX as u128) as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
