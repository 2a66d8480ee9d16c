use std::fmt;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::{
    config::WidgetConfig,
    coords::{fmt_outline, normalize, outline_eq, LatLng, Outline},
    events::{DeletedLayer, DrawEvent, EditedLayer, ShapeKind},
    overlap::to_geometry,
    render::{render_list, RenderItem},
    store::{PolygonId, PolygonStore},
};

#[derive(Debug, PartialEq)]
pub enum CreateOutcome {
    ToolDisabled(ShapeKind),
    Added {
        id: PolygonId,
        /// Stored polygon the new one ran into, if any.
        conflict: Option<PolygonId>,
    },
}

#[derive(Debug, Default, PartialEq)]
pub struct EditOutcome {
    pub disabled: bool,
    pub updated: Vec<PolygonId>,
    pub unmatched: usize,
}

#[derive(Debug, Default, PartialEq)]
pub struct DeleteOutcome {
    pub disabled: bool,
    pub removed: usize,
    pub unmatched: usize,
}

#[derive(Debug, PartialEq)]
pub enum EventOutcome {
    Created(CreateOutcome),
    Edited(EditOutcome),
    Deleted(DeleteOutcome),
}

impl fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventOutcome::Created(CreateOutcome::ToolDisabled(shape)) => write!(f, "{shape} tool is disabled"),
            EventOutcome::Created(CreateOutcome::Added { id, conflict: None }) => write!(f, "added {id}"),
            EventOutcome::Created(CreateOutcome::Added { id, conflict: Some(other) }) => write!(f, "added {id}, conflicts with {other}"),
            EventOutcome::Edited(EditOutcome { disabled: true, .. }) => write!(f, "editing is disabled"),
            EventOutcome::Edited(EditOutcome { updated, unmatched, .. }) => write!(f, "updated {}, unmatched {unmatched}", updated.len()),
            EventOutcome::Deleted(DeleteOutcome { disabled: true, .. }) => write!(f, "removal is disabled"),
            EventOutcome::Deleted(DeleteOutcome { removed, unmatched, .. }) => write!(f, "removed {removed}, unmatched {unmatched}"),
        }
    }
}

/// Keeps the drawn polygons and their conflict flags in sync with the events
/// of the drawing control.
///
/// Every handler runs to completion before the next event is accepted, and a
/// handler that fails leaves the store as it was.
#[derive(Debug)]
pub struct MapWidget {
    config: WidgetConfig,
    store: PolygonStore,
}

impl MapWidget {
    pub fn new(config: WidgetConfig) -> Result<Self> {
        config.map.validate()?;

        Ok(Self {
            config,
            store: PolygonStore::new(),
        })
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn store(&self) -> &PolygonStore {
        &self.store
    }

    pub fn render_list(&self) -> Vec<RenderItem<'_>> {
        render_list(&self.store)
    }

    pub fn handle(&mut self, event: DrawEvent) -> Result<EventOutcome> {
        let outcome = match event {
            DrawEvent::Created { shape, points } => EventOutcome::Created(self.on_create(shape, points)?),
            DrawEvent::Edited { layers } => EventOutcome::Edited(self.on_edit(&layers)?),
            DrawEvent::Deleted { layers } => EventOutcome::Deleted(self.on_delete(&layers)?),
        };
        Ok(outcome)
    }

    /// A conflicting polygon is still kept; it gets flagged together with
    /// the first stored polygon it conflicts with.
    pub fn on_create(&mut self, shape: ShapeKind, points: impl IntoIterator<Item = impl Into<LatLng>>) -> Result<CreateOutcome> {
        if !self.config.draw.allows(shape) {
            warn!("Ignoring a new {shape}: the tool is disabled");
            return Ok(CreateOutcome::ToolDisabled(shape));
        }

        let outline = normalize(points);
        debug!("New {shape}: {}", fmt_outline(&outline));

        let conflict = self.config.conflict
            .first_conflict(&outline, self.store.outlines())
            .context("Could not check the new polygon for conflicts")?
            .and_then(|i| self.store.iter().nth(i))
            .map(|p| p.id);

        let id = self.store.insert(outline);

        if let Some(other) = conflict {
            info!("Polygon {id} conflicts with {other}");
            self.store.flag(id);
            self.store.flag(other);
        }

        Ok(CreateOutcome::Added { id, conflict })
    }

    pub fn on_edit(&mut self, layers: &[EditedLayer]) -> Result<EditOutcome> {
        if !self.config.draw.edit {
            warn!("Ignoring an edit of {} layers: editing is disabled", layers.len());
            return Ok(EditOutcome { disabled: true, ..Default::default() });
        }

        let mut edits: Vec<(PolygonId, Outline)> = vec![];
        let mut unmatched = 0;

        for layer in layers {
            let outline = normalize(layer.points.iter().copied());
            to_geometry(&outline).context("Edited layer is not a valid polygon")?;

            let id = match (layer.id, &layer.previous) {
                (Some(id), _) => self.store.get(id).map(|p| p.id),
                (None, Some(previous)) => self.store.find_by_outline(&normalize(previous.iter().copied())),
                (None, None) => None,
            };

            match id {
                Some(id) => edits.push((id, outline)),
                None => {
                    warn!("Edited layer {:?} does not match any stored polygon", layer.id);
                    unmatched += 1;
                },
            }
        }

        let updated: Vec<PolygonId> = edits.iter().map(|(id, _)| *id).collect();
        for (id, outline) in edits {
            self.store.replace(id, outline);
        }

        self.recompute_flags()?;

        Ok(EditOutcome { disabled: false, updated, unmatched })
    }

    pub fn on_delete(&mut self, layers: &[DeletedLayer]) -> Result<DeleteOutcome> {
        if !self.config.draw.remove {
            warn!("Ignoring a removal of {} layers: removal is disabled", layers.len());
            return Ok(DeleteOutcome { disabled: true, ..Default::default() });
        }

        let mut doomed: Vec<PolygonId> = vec![];
        let mut unmatched = 0;

        for layer in layers {
            let ids: Vec<PolygonId> = match (layer.id, &layer.points) {
                (Some(id), _) => self.store.get(id).map(|p| p.id).into_iter().collect(),
                (None, Some(points)) => {
                    let outline = normalize(points.iter().copied());
                    self.store.iter()
                        .filter(|p| outline_eq(&p.outline, &outline))
                        .map(|p| p.id)
                        .collect()
                },
                (None, None) => vec![],
            };

            if ids.is_empty() {
                warn!("Deleted layer {:?} does not match any stored polygon", layer.id);
                unmatched += 1;
            }
            doomed.extend(ids);
        }

        let removed = self.store.retain(|p| !doomed.contains(&p.id));

        self.recompute_flags()?;

        Ok(DeleteOutcome { disabled: false, removed, unmatched })
    }

    fn recompute_flags(&mut self) -> Result<()> {
        let positions = self.config.conflict
            .conflicting_indices(self.store.outlines())
            .context("Could not recompute the polygon conflicts")?;

        self.store.set_flags_at(positions);

        if self.store.has_conflicts() {
            info!("{} polygons are in conflict", self.store.flagged().len());
        }

        Ok(())
    }
}
