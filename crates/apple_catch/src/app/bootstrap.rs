use engine::{LoopConfig, Scene, WorldSize};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{self, ConfigError};
use super::scene;
use crate::gameplay::{WORLD_HEIGHT, WORLD_WIDTH};

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, ConfigError> {
    init_tracing();
    info!("=== Apple Catch Startup ===");

    let game_config = config::load_config_from_env()?;
    info!(
        time_limit_seconds = game_config.progression.time_limit_seconds,
        apples_needed_curve = ?game_config.progression.apples_needed_curve,
        price_growth = ?game_config.rules.price_growth,
        seed = ?game_config.seed,
        "config_loaded"
    );

    let config = LoopConfig {
        world_size: WorldSize::new(WORLD_WIDTH, WORLD_HEIGHT),
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        scene: scene::build_scene(game_config),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
