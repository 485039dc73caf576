//! patchbay - play a text patch
//!
//! Run with: cargo run -- patch.txt
//! Offline: cargo run -- patch.txt --blocks 200 --record output=out.wav

mod app;
mod cli;

use std::rc::Rc;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use patchbay::{graph::HeldControls, patch::load_patch, Driver, Graph, Registry};
use tracing::info;

use cli::Cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_target(false)
        .init();

    let controls = Rc::new(HeldControls::new());
    for held in &cli.axis {
        controls.set(held.axis, held.value);
    }

    let registry = Registry::standard(controls.clone());
    let mut graph = Graph::new();
    load_patch(&registry, &mut graph, &cli.patch)
        .wrap_err_with(|| format!("failed to load patch {}", cli.patch.display()))?;

    for target in &cli.record {
        graph
            .record(&target.name, &target.path, cli.scaler)
            .wrap_err_with(|| format!("failed to record `{}`", target.name))?;
    }

    let mut driver = Driver::new(&graph)?;

    match cli.blocks {
        Some(blocks) => {
            driver.run_offline(blocks, cli.block_size)?;
            graph.stop_recording()?;
            info!(blocks, frames = cli.block_size, "offline render finished");
        }
        None => app::play(driver, cli.block_size)?,
    }

    Ok(())
}
