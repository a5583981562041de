pub mod app;
pub mod camera;
pub mod clock;
pub mod graphics;
pub mod headless;
pub mod layout;
pub mod pixels_renderer;
pub mod regression;
pub mod scene;
pub mod surface;

pub use app::{AppConfig, GameApp, KeyEvent, run_game};
pub use clock::{Clock, ManualTimeSource, SystemTimeSource, TimeSource};
pub use headless::HeadlessRunner;
pub use layout::{ViewportLayoutTable, ViewportRect};
pub use surface::SurfaceSize;
