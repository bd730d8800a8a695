pub mod adapter_utils;
pub mod camera;
pub mod config;
pub mod constant_data;
pub mod dds;
pub mod dx_sample;
pub mod geometry;
pub mod input;
pub mod lights;
pub mod mesh_file;
pub mod renderer;
pub mod sample_runner;
pub mod scene;

use renderer::sample::LayeredSceneSample;
use sample_runner::run_sample;
use tracing::info;

pub fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::SubscriberBuilder::default()
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .with_target(false)
        .init();
    info!("starting layered scene renderer");

    run_sample::<LayeredSceneSample>()?;

    info!("renderer exited cleanly");
    Ok(())
}
