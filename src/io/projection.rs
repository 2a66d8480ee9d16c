use std::f64::consts::PI;

use crate::{config::{MapConfig, MAX_LATITUDE}, coords::LatLng};

pub const TILE_SIZE: f64 = 256.0;

/// Spherical Web Mercator in screen pixels, with the map center at the origin
/// and `y` growing southwards.
#[derive(Clone, Debug)]
pub struct WebMercator {
    scale: f64,
    origin: (f64, f64),
}

impl WebMercator {
    pub fn new(map: &MapConfig) -> Self {
        let scale = TILE_SIZE * 2f64.powi(map.zoom as i32);
        let origin = world_pixel(map.center, scale);

        Self {
            scale,
            origin,
        }
    }

    pub fn project(&self, p: LatLng) -> (f64, f64) {
        let (x, y) = world_pixel(p, self.scale);
        (x - self.origin.0, y - self.origin.1)
    }
}

fn world_pixel(p: LatLng, scale: f64) -> (f64, f64) {
    let lat = p.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

    let x = (p.lng + 180.0) / 360.0 * scale;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * scale;

    (x, y)
}
