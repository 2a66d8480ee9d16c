mod session;

use std::path::Path;

use anyhow::{ensure, Result};

use crate::{coords::LatLng, io::svg_output::make_svg, widget::MapWidget};

pub const OUTDIR: &'_ str = "tmp/test-output/";

fn ensure_dir(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    ensure!(dir.is_dir(), "{dir:?} should be a directory");
    Ok(())
}

pub fn init_test_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .format_timestamp(None)
        .format_target(false)
        .is_test(true)
        .try_init();
}

/// Render the current state of the widget for manual inspection.
pub fn save(name: &str, widget: &MapWidget) -> Result<()> {
    ensure_dir(&OUTDIR)?;

    let output = Path::new(OUTDIR).join(format!("output-{name}")).with_extension("svg");
    let doc = make_svg(&widget.render_list(), &widget.config().map);
    svg::save(output, &doc)?;

    Ok(())
}

pub fn square(lat: f64, lng: f64, size: f64) -> Vec<LatLng> {
    vec![
        LatLng::new(lat, lng),
        LatLng::new(lat, lng + size),
        LatLng::new(lat + size, lng + size),
        LatLng::new(lat + size, lng),
    ]
}
