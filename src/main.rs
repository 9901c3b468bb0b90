mod app;
mod color;
mod data;
mod export;
mod profile;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use eframe::egui;

use app::ArborviewApp;
use profile::Profile;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .context("usage: arborview <data-file> [classic|noir]")?;
    let profile = Profile::from_arg(args.next().as_deref());

    // The dataset is loaded exactly once; a failed load aborts startup.
    let dataset = data::loader::load_file(&path)
        .with_context(|| format!("loading dataset from {}", path.display()))?;
    log::info!(
        "prepared {} records ({} genera, {} neighbourhoods)",
        dataset.len(),
        dataset.genera.len(),
        dataset.neighbourhoods.len()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        profile.title(),
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(profile.visuals());
            Ok(Box::new(ArborviewApp::new(dataset, profile)))
        }),
    )
    .map_err(|e| anyhow!("failed to start UI: {e}"))
}
