use anyhow::Context;
use engine::app::AppConfig;
use engine::surface::SurfaceSize;
use showcase::games::default_lineup;
use showcase::{ConfigStore, ShowcaseApp, ViewSchedule};
use winit::dpi::PhysicalSize;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let store = ConfigStore::from_env();
    let config = store
        .load()
        .with_context(|| format!("loading {}", store.path().display()))?
        .with_env_overrides();
    config.validate()?;
    log::info!("config: {config:?}");

    let size = SurfaceSize::new(config.window_width, config.window_height);
    let schedule = ViewSchedule::new(default_lineup(), &config, size)?;
    let app = AppConfig {
        title: "Multi-view showcase".to_owned(),
        desired_size: PhysicalSize::new(size.width, size.height),
        clamp_to_monitor: true,
        vsync: true,
    };

    engine::app::run_game(app, ShowcaseApp::new(config, schedule)).map_err(|err| anyhow::anyhow!("{err}"))
}
