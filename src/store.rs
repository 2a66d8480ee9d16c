use std::{collections::BTreeSet, fmt};

use serde::Deserialize;

use crate::coords::{outline_eq, LatLng, Outline};

/// Identity handed out when a polygon is created; carried by the layer the
/// drawing control keeps for it.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct PolygonId(pub u64);

impl fmt::Display for PolygonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StoredPolygon {
    pub id: PolygonId,
    pub outline: Outline,
}

/// Polygons in insertion order, plus the set of those currently flagged as
/// intersecting.
#[derive(Debug, Default)]
pub struct PolygonStore {
    polygons: Vec<StoredPolygon>,
    flagged: BTreeSet<PolygonId>,
    next_id: u64,
}

impl PolygonStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, outline: Outline) -> PolygonId {
        let id = PolygonId(self.next_id);
        self.next_id += 1;
        self.polygons.push(StoredPolygon { id, outline });
        id
    }

    pub fn get(&self, id: PolygonId) -> Option<&StoredPolygon> {
        self.polygons.iter().find(|p| p.id == id)
    }

    #[cfg(test)]
    pub fn position(&self, id: PolygonId) -> Option<usize> {
        self.polygons.iter().position(|p| p.id == id)
    }

    /// First polygon whose outline is exactly `outline`.
    pub fn find_by_outline(&self, outline: &[LatLng]) -> Option<PolygonId> {
        self.polygons.iter()
            .find(|p| outline_eq(&p.outline, outline))
            .map(|p| p.id)
    }

    pub fn replace(&mut self, id: PolygonId, outline: Outline) -> bool {
        match self.polygons.iter_mut().find(|p| p.id == id) {
            Some(p) => {
                p.outline = outline;
                true
            },
            None => false,
        }
    }

    /// Keep the polygons for which `keep` holds; flags of dropped ones go too.
    pub fn retain(&mut self, mut keep: impl FnMut(&StoredPolygon) -> bool) -> usize {
        let before = self.polygons.len();
        self.polygons.retain(|p| keep(p));

        let polygons = &self.polygons;
        self.flagged.retain(|id| polygons.iter().any(|p| p.id == *id));

        before - self.polygons.len()
    }

    #[cfg(test)]
    pub fn remove(&mut self, id: PolygonId) -> bool {
        self.retain(|p| p.id != id) > 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoredPolygon> {
        self.polygons.iter()
    }

    pub fn outlines(&self) -> impl Iterator<Item = &[LatLng]> {
        self.polygons.iter().map(|p| p.outline.as_slice())
    }

    #[cfg(test)]
    pub fn ids(&self) -> Vec<PolygonId> {
        self.polygons.iter().map(|p| p.id).collect()
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn flagged(&self) -> &BTreeSet<PolygonId> {
        &self.flagged
    }

    pub fn is_flagged(&self, id: PolygonId) -> bool {
        self.flagged.contains(&id)
    }

    pub fn flag(&mut self, id: PolygonId) {
        self.flagged.insert(id);
    }

    /// Replace the flag set with the polygons at the given store positions.
    pub fn set_flags_at(&mut self, positions: impl IntoIterator<Item = usize>) {
        self.flagged = positions.into_iter()
            .filter_map(|i| self.polygons.get(i))
            .map(|p| p.id)
            .collect();
    }

    #[cfg(test)]
    pub fn clear_flags(&mut self) {
        self.flagged.clear();
    }

    pub fn has_conflicts(&self) -> bool {
        !self.flagged.is_empty()
    }
}
