use std::path::PathBuf;
use std::time::Duration;

use crate::games::GameKind;

/// Problems with a run configuration. All of them are caught before the first frame.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no games configured")]
    EmptyGameList,

    /// Each kind owns one active flag, so a kind may only appear once.
    #[error("game {0} is configured more than once")]
    DuplicateGame(GameKind),

    #[error("animation duration must be positive")]
    ZeroAnimationDuration,

    #[error("far plane distance must be positive and finite, got {0}")]
    InvalidFarPlane(f32),

    #[error("field of view must be within (0, 180) degrees, got {0}")]
    InvalidFieldOfView(f32),

    #[error("time between games ({spacing:?}) is shorter than the animation window ({animation:?})")]
    SpacingShorterThanAnimation { spacing: Duration, animation: Duration },

    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f32 },

    #[error("failed reading config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed parsing config {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
