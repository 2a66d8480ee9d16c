use std::fmt;

use geo::Coord;
use serde::Deserialize;

/// A geographic point in degrees.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(from = "LatLngRepr")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LatLngRepr {
    Pair([f64; 2]),
    Named { lat: f64, lng: f64 },
}

impl From<LatLngRepr> for LatLng {
    fn from(repr: LatLngRepr) -> Self {
        match repr {
            LatLngRepr::Pair([lat, lng]) => Self { lat, lng },
            LatLngRepr::Named { lat, lng } => Self { lat, lng },
        }
    }
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Longitude goes to `x`, latitude to `y`.
    pub fn to_coord(self) -> Coord {
        Coord { x: self.lng, y: self.lat }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

/// Point list of one drawn shape.
pub type Outline = Vec<LatLng>;

pub fn is_closed(points: &[LatLng]) -> bool {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => first == last,
        _ => false,
    }
}

/// Copy the points, repeating the first one at the end when there are more
/// than two of them and the list is still open.
pub fn normalize(points: impl IntoIterator<Item = impl Into<LatLng>>) -> Outline {
    let mut outline: Outline = points.into_iter().map(Into::into).collect();

    if outline.len() > 2 && !is_closed(&outline) {
        outline.push(outline[0]);
    }

    outline
}

/// Exact comparison, the way the drawing control reports its layers.
pub fn outline_eq(a: &[LatLng], b: &[LatLng]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(pa, pb)| pa == pb)
}

pub fn fmt_outline(points: &[LatLng]) -> String {
    let mut s = String::new();
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            s.push(' ');
        }
        s.push_str(&p.to_string());
    }
    if s.is_empty() {
        s.push('∅');
    }
    s
}
