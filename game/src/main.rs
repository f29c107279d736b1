use std::error::Error;
use std::time::{SystemTime, UNIX_EPOCH};

use engine::app::{AppConfig, run_app};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::dpi::PhysicalSize;

use snake_game::config::GameConfig;
use snake_game::headful::{FramePresenter, SnakeApp};
use snake_game::jungle::JungleSim;
use snake_game::layout::{Layout, MIN_BUFFER_WIDTH};
use snake_game::session::Session;
use snake_game::stats::{FileStore, GameStorage};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = GameConfig::load();
    let seed = config.seed.unwrap_or_else(clock_seed);
    let spawn = JungleSim::random_spawn(config.jungle_width, seed);
    let sim = match JungleSim::with_seed(config.jungle_width, spawn, seed) {
        Ok(sim) => sim,
        Err(err) => {
            error!(%err, width = config.jungle_width, spawn, "failed to create jungle");
            return Err(err.into());
        }
    };

    let storage = GameStorage::new(FileStore::from_env());
    info!(
        data_dir = %storage.store().dir().display(),
        seed,
        width = config.jungle_width,
        "starting snake"
    );

    let buffer = Layout::new(config.jungle_width, config.cell_size).buffer_size();
    let window = Layout::initial_window(&config, config.jungle_width);
    let app_config = AppConfig {
        title: "Snake".to_string(),
        desired_size: PhysicalSize::new(window.width, window.height),
        min_size: Some(PhysicalSize::new(MIN_BUFFER_WIDTH, MIN_BUFFER_WIDTH)),
        buffer_size: buffer,
        clamp_to_monitor: true,
        vsync: Some(true),
    };

    let session = Session::new(sim, FramePresenter::new(), storage, &config);
    run_app(app_config, SnakeApp::new(session, config))
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}
