use std::fmt;

use serde::Deserialize;

use crate::{coords::Outline, store::PolygonId};

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Polygon,
    Rectangle,
    Polyline,
    Circle,
    Marker,
    CircleMarker,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Polygon => "polygon",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Polyline => "polyline",
            ShapeKind::Circle => "circle",
            ShapeKind::Marker => "marker",
            ShapeKind::CircleMarker => "circlemarker",
        };
        f.write_str(name)
    }
}

/// A layer the drawing control reports as edited.
///
/// With an `id` the layer is matched by identity; otherwise `previous` must
/// hold the exact outline the store has for it.
#[derive(Clone, Debug, Deserialize)]
pub struct EditedLayer {
    #[serde(default)]
    pub id: Option<PolygonId>,
    #[serde(default)]
    pub previous: Option<Outline>,
    pub points: Outline,
}

/// A layer the drawing control reports as removed, matched by `id` or by its
/// current `points`.
#[derive(Clone, Debug, Deserialize)]
pub struct DeletedLayer {
    #[serde(default)]
    pub id: Option<PolygonId>,
    #[serde(default)]
    pub points: Option<Outline>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawEvent {
    Created {
        #[serde(default)]
        shape: ShapeKind,
        points: Outline,
    },
    Edited {
        layers: Vec<EditedLayer>,
    },
    Deleted {
        layers: Vec<DeletedLayer>,
    },
}

impl DrawEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DrawEvent::Created { .. } => "created",
            DrawEvent::Edited { .. } => "edited",
            DrawEvent::Deleted { .. } => "deleted",
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::LatLng;

    #[test]
    fn event_script() -> anyhow::Result<()> {
        let yaml = "
- created:
    points: [[0, 0], [0, 1], [1, 1]]
- created:
    shape: rectangle
    points: [[5, 5], [5, 6], [6, 6], [6, 5]]
- edited:
    layers:
      - id: 0
        points: [[0, 0], [0, 2], [2, 2]]
      - previous: [[5, 5], [5, 6], [6, 6], [6, 5], [5, 5]]
        points: [[5, 5], [5, 7], [7, 7], [7, 5]]
- deleted:
    layers:
      - id: 1
      - points: [[0, 0], [0, 2], [2, 2], [0, 0]]
";
        let events: Vec<DrawEvent> = serde_norway::from_str(yaml)?;
        assert_eq!(events.len(), 4);

        let DrawEvent::Created { shape, points } = &events[0] else { panic!("expected a creation") };
        assert_eq!(*shape, ShapeKind::Polygon);
        assert_eq!(points[2], LatLng::new(1.0, 1.0));

        let DrawEvent::Created { shape, .. } = &events[1] else { panic!("expected a creation") };
        assert_eq!(*shape, ShapeKind::Rectangle);

        let DrawEvent::Edited { layers } = &events[2] else { panic!("expected an edit") };
        assert_eq!(layers[0].id, Some(PolygonId(0)));
        assert!(layers[0].previous.is_none());
        assert_eq!(layers[1].id, None);
        assert_eq!(layers[1].previous.as_ref().map(Vec::len), Some(5));

        let DrawEvent::Deleted { layers } = &events[3] else { panic!("expected a deletion") };
        assert_eq!(layers[0].id, Some(PolygonId(1)));
        assert!(layers[1].points.is_some());
        assert_eq!(events[3].name(), "deleted");

        Ok(())
    }
}
