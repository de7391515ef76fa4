//! Vantage Runtime
//!
//! Native host: loads settings and the avatar, then runs the viewer in a
//! window or headless from an input script.

mod cli;
mod headless;
mod window;

use anyhow::{Context, Result};
use clap::Parser;

use vantage_core::Viewer;
use vantage_services::{InputRecorder, InputScript, Settings};

use crate::cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    tracing::info!("Vantage v{}", vantage_core::VERSION);

    let settings = match &cli.settings {
        Some(path) => Settings::load(path).with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    let script = cli
        .script
        .as_ref()
        .map(|path| InputScript::load(path).with_context(|| format!("loading script {}", path.display())))
        .transpose()?;

    let mut viewer = Viewer::new(settings.viewer_options(), &settings.world_config()?);

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    let bundle = runtime.block_on(vantage_asset::load_avatar(&settings.avatar.directory, &settings.avatar.file));
    viewer.load_avatar(bundle.map(|b| b.into_parts()))?;

    // Native hosts have no immersive session; scripts may simulate one.
    let xr_supported = script.as_ref().is_some_and(|s| s.xr_supported);
    viewer.enable_xr(xr_supported);

    if cli.headless {
        if cli.record.is_some() {
            tracing::warn!("--record only applies to windowed sessions");
        }
        let script = script.unwrap_or_default();
        headless::run(&mut viewer, script, cli.frames);
        return Ok(());
    }

    let recording = cli.record.map(|path| (InputRecorder::new(xr_supported), path));
    window::run(viewer, script, recording)
}
