use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use abyss_client::blocks;
use abyss_client::config::ClientConfig;
use abyss_client::scene::{self, DemoScene};
use abyss_client::textures::{STANDARD_TEXTURES, TextureArray};
use abyss_client::window::HeadlessWindow;
use abyss_engine::runtime::{Coordinator, LoopConfig};
use abyss_engine::world::World;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let config = ClientConfig::from_args(std::env::args().skip(1))?;
    tracing::info!("{} {}", config.title, config.version);

    // ── Shared resources, built once and passed explicitly ──────────────
    let textures = TextureArray::scan(&config.texture_dir, STANDARD_TEXTURES);
    let catalog = Arc::new(blocks::standard_catalog(&textures));

    let world = Arc::new(World::new());
    let placed = world.place_structure(&scene::spawn_platform());
    tracing::info!("Spawn platform: {} blocks in {} columns", placed, world.column_count());

    // ── Window first: without it there is nothing to run ────────────────
    let mut window = HeadlessWindow::open(config.width, config.height, &config.title)
        .context("creating window")?
        .with_target_fps(config.target_fps)
        .with_frame_budget(config.max_frames)
        .attach_world(Arc::clone(&world), Arc::clone(&catalog));

    let mut coordinator = Coordinator::new(
        DemoScene::new(Arc::clone(&world)),
        LoopConfig {
            tick_rate: config.tick_rate,
            ..LoopConfig::default()
        },
    );
    coordinator.run(&mut window).context("game loop")?;

    let snapshot = coordinator.metrics().snapshot();
    tracing::info!(
        "Stopped after {:.1}s: {:.1} ticks/s, {:.1} frames/s",
        snapshot.uptime_secs,
        snapshot.tick_rate(),
        snapshot.frame_rate()
    );
    println!("{}", serde_json::to_string(&snapshot)?);
    Ok(())
}
