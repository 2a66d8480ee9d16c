pub mod config;
pub mod coords;
pub mod events;
pub mod io;
pub mod overlap;
pub mod render;
pub mod store;
pub mod widget;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use config::SessionConfig;
use log::{error, info};
use widget::MapWidget;

use crate::io::svg_output::make_svg;


#[derive(Parser)]
pub struct Args {
    /// Path to the session config with the map settings and the drawing events.
    pub config: PathBuf,
}


fn main() {
    if let Err(_) = std::env::var("RUST_LOG") {
        unsafe { std::env::set_var("RUST_LOG", "info") };
    }

    env_logger::init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        error!("{err:#}");
        std::process::exit(1);
    }
}


fn run(args: Args) -> Result<()> {
    let file = std::fs::File::open(&args.config)
        .with_context(|| format!("Could not open {:?}", args.config))?;
    let config: SessionConfig = serde_norway::from_reader(file)?;

    if !config.outdir.exists() {
        std::fs::create_dir_all(&config.outdir)?;
    }
    ensure!(config.outdir.is_dir(), "{:?} should be a directory", config.outdir);

    let name = config.name;
    let mut widget = MapWidget::new(config.widget)?;

    for (i, event) in config.events.into_iter().enumerate() {
        let kind = event.name();
        let outcome = widget.handle(event)
            .with_context(|| format!("Event {i:02} ({kind}) failed"))?;

        info!("Event {i:02} - {kind}: {outcome}");

        if config.snapshots {
            let document = make_svg(&widget.render_list(), &widget.config().map);
            let output_path = config.outdir.join(format!("{name}-{i:02}.svg"));
            svg::save(output_path, &document)?;
        }
    }

    let store = widget.store();
    info!("{} polygons, {} flagged", store.len(), store.flagged().len());

    let document = make_svg(&widget.render_list(), &widget.config().map);
    let output_path = config.outdir.join(format!("{name}.svg"));
    svg::save(output_path, &document)?;

    info!("Produced the map SVG");

    Ok(())
}
