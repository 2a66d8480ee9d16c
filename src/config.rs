use std::path::PathBuf;

use anyhow::{ensure, Result};
use serde::Deserialize;

use crate::{coords::LatLng, events::{DrawEvent, ShapeKind}, overlap::ConflictRule};

pub const DEFAULT_CENTER: LatLng = LatLng::new(51.505, -0.09);
pub const DEFAULT_ZOOM: u8 = 13;
pub const MAX_ZOOM: u8 = 22;

/// Web Mercator stops being defined past this latitude.
pub const MAX_LATITUDE: f64 = 85.05112878;

fn default_center() -> LatLng {
    DEFAULT_CENTER
}

fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}

fn enabled() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MapConfig {
    #[serde(default = "default_center")]
    pub center: LatLng,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl MapConfig {
    pub fn validate(&self) -> Result<()> {
        let LatLng { lat, lng } = self.center;
        ensure!(lat.abs() <= MAX_LATITUDE, "Map center latitude {lat} is outside of the projectable range");
        ensure!(lng.abs() <= 180.0, "Map center longitude {lng} is outside of [-180, 180]");
        ensure!(self.zoom <= MAX_ZOOM, "Zoom level {} is above the maximum of {MAX_ZOOM}", self.zoom);
        Ok(())
    }
}

/// Which tools the drawing control exposes.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DrawConfig {
    #[serde(default = "enabled")]
    pub polygon: bool,
    #[serde(default)]
    pub rectangle: bool,
    #[serde(default)]
    pub polyline: bool,
    #[serde(default)]
    pub circle: bool,
    #[serde(default)]
    pub marker: bool,
    #[serde(default)]
    pub circlemarker: bool,
    #[serde(default = "enabled")]
    pub edit: bool,
    #[serde(default = "enabled")]
    pub remove: bool,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            polygon: true,
            rectangle: false,
            polyline: false,
            circle: false,
            marker: false,
            circlemarker: false,
            edit: true,
            remove: true,
        }
    }
}

impl DrawConfig {
    pub fn allows(&self, shape: ShapeKind) -> bool {
        match shape {
            ShapeKind::Polygon => self.polygon,
            ShapeKind::Rectangle => self.rectangle,
            ShapeKind::Polyline => self.polyline,
            ShapeKind::Circle => self.circle,
            ShapeKind::Marker => self.marker,
            ShapeKind::CircleMarker => self.circlemarker,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WidgetConfig {
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub draw: DrawConfig,
    #[serde(default)]
    pub conflict: ConflictRule,
}

#[derive(Debug, Deserialize)]
pub struct SessionConfig {
    pub name: String,
    pub outdir: PathBuf,
    #[serde(flatten)]
    pub widget: WidgetConfig,
    /// Write an SVG after every event, not only the final one.
    #[serde(default)]
    pub snapshots: bool,
    pub events: Vec<DrawEvent>,
}
