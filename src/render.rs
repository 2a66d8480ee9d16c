use crate::{coords::LatLng, store::{PolygonId, PolygonStore}};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Blue,
}

impl Color {
    pub fn stroke(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
        }
    }

    pub fn fill(self) -> &'static str {
        match self {
            Color::Red => "#FF000033",
            Color::Blue => "#0000FF33",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderItem<'a> {
    pub id: PolygonId,
    pub outline: &'a [LatLng],
    pub color: Color,
}

/// Flagged polygons are drawn red, everything else blue.
pub fn render_list(store: &PolygonStore) -> Vec<RenderItem<'_>> {
    store.iter()
        .map(|p| RenderItem {
            id: p.id,
            outline: &p.outline,
            color: if store.is_flagged(p.id) { Color::Red } else { Color::Blue },
        })
        .collect()
}
