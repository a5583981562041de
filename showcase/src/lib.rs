pub mod config;
pub mod director;
pub mod error;
pub mod games;
pub mod hud;
pub mod input;
pub mod schedule;
pub mod state;

pub use config::{ConfigStore, ShowcaseConfig};
pub use director::{Showcase, ShowcaseApp};
pub use error::ConfigError;
pub use schedule::ViewSchedule;
