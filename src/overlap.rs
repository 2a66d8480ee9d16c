use std::collections::BTreeSet;

use anyhow::{ensure, Result};
use geo::{Coord, Intersects, LineString, Polygon, Relate};
use geo::line_intersection::{line_intersection, LineIntersection};
use log::debug;
use serde::Deserialize;

use crate::coords::{is_closed, LatLng};

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Predicate {
    /// Interiors share area, and neither polygon contains the other.
    Overlaps,
    /// The exterior rings cross each other at a proper intersection point.
    Crosses,
    /// Any shared point, touching boundaries included.
    Intersects,
}

impl Predicate {
    pub fn holds(self, a: &Polygon, b: &Polygon) -> bool {
        match self {
            Predicate::Overlaps => {
                let im = a.relate(b);
                im.is_intersects() && !im.is_touches() && !im.is_within() && !im.is_contains()
            },
            Predicate::Crosses => rings_cross(a.exterior(), b.exterior()),
            Predicate::Intersects => a.intersects(b),
        }
    }
}

fn rings_cross(a: &LineString, b: &LineString) -> bool {
    a.lines().any(|la| {
        b.lines().any(|lb| matches!(
            line_intersection(la, lb),
            Some(LineIntersection::SinglePoint { is_proper: true, .. })
        ))
    })
}

/// Build the polygon geometry of a closed outline.
pub fn to_geometry(outline: &[LatLng]) -> Result<Polygon> {
    ensure!(is_closed(outline), "Outline with {} points is not closed", outline.len());
    ensure!(outline.iter().all(LatLng::is_finite), "Outline contains non-finite coordinates");

    let mut distinct: Vec<LatLng> = vec![];
    for p in &outline[..outline.len() - 1] {
        if !distinct.contains(p) {
            distinct.push(*p);
        }
    }
    ensure!(distinct.len() >= 3, "A polygon needs at least 3 distinct points, got {}", distinct.len());

    let exterior: LineString = outline.iter().map(|p| p.to_coord()).collect::<Vec<Coord>>().into();
    Ok(Polygon::new(exterior, vec![]))
}


/// A pair of polygons is in conflict when any of the predicates holds.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(try_from = "Vec<Predicate>")]
pub struct ConflictRule {
    predicates: Vec<Predicate>,
}

impl Default for ConflictRule {
    fn default() -> Self {
        Self {
            predicates: vec![Predicate::Overlaps, Predicate::Crosses, Predicate::Intersects],
        }
    }
}

impl TryFrom<Vec<Predicate>> for ConflictRule {
    type Error = anyhow::Error;

    fn try_from(predicates: Vec<Predicate>) -> Result<Self> {
        Self::new(predicates)
    }
}

impl ConflictRule {
    pub fn new(predicates: Vec<Predicate>) -> Result<Self> {
        ensure!(!predicates.is_empty(), "A conflict rule needs at least one predicate");
        Ok(Self { predicates })
    }

    #[cfg(test)]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    fn geometries_conflict(&self, a: &Polygon, b: &Polygon) -> bool {
        self.predicates.iter().any(|&p| {
            let holds = p.holds(a, b);
            debug!("{p:?} -> {holds}");
            holds
        })
    }

    #[cfg(test)]
    pub fn conflicts(&self, a: &[LatLng], b: &[LatLng]) -> Result<bool> {
        Ok(self.geometries_conflict(&to_geometry(a)?, &to_geometry(b)?))
    }

    /// Index of the first outline in `others` that conflicts with `candidate`.
    pub fn first_conflict<'a>(&self, candidate: &[LatLng], others: impl IntoIterator<Item = &'a [LatLng]>) -> Result<Option<usize>> {
        let candidate = to_geometry(candidate)?;

        for (i, other) in others.into_iter().enumerate() {
            if self.geometries_conflict(&candidate, &to_geometry(other)?) {
                return Ok(Some(i));
            }
        }

        Ok(None)
    }

    /// Indices of every outline that conflicts with at least one other.
    pub fn conflicting_indices<'a>(&self, outlines: impl IntoIterator<Item = &'a [LatLng]>) -> Result<BTreeSet<usize>> {
        let geometries = outlines.into_iter()
            .map(to_geometry)
            .collect::<Result<Vec<_>>>()?;

        let mut result = BTreeSet::new();

        for (i, a) in geometries.iter().enumerate() {
            for (j, b) in geometries.iter().enumerate().skip(i + 1) {
                if self.geometries_conflict(a, b) {
                    debug!("Polygons {i} and {j} are in conflict");
                    result.insert(i);
                    result.insert(j);
                }
            }
        }

        Ok(result)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::normalize;

    fn square(lat: f64, lng: f64, size: f64) -> Vec<LatLng> {
        normalize(vec![(lat, lng), (lat, lng + size), (lat + size, lng + size), (lat + size, lng)])
    }

    fn overlaps_only() -> ConflictRule {
        ConflictRule::new(vec![Predicate::Overlaps]).unwrap()
    }

    #[test]
    fn disjoint_squares() -> Result<()> {
        let a = square(0.0, 0.0, 1.0);
        let b = square(5.0, 5.0, 1.0);

        assert!(!ConflictRule::default().conflicts(&a, &b)?);
        assert!(!overlaps_only().conflicts(&a, &b)?);
        Ok(())
    }

    #[test]
    fn identical_squares() -> Result<()> {
        let a = square(0.0, 0.0, 1.0);

        assert!(ConflictRule::default().conflicts(&a, &a.clone())?);
        Ok(())
    }

    #[test]
    fn partially_overlapping_squares() -> Result<()> {
        let a = square(0.0, 0.0, 1.0);
        let b = square(0.5, 0.5, 1.0);

        assert!(Predicate::Overlaps.holds(&to_geometry(&a)?, &to_geometry(&b)?));
        assert!(Predicate::Crosses.holds(&to_geometry(&a)?, &to_geometry(&b)?));
        assert!(overlaps_only().conflicts(&a, &b)?);
        Ok(())
    }

    #[test]
    fn touching_squares() -> Result<()> {
        let a = square(0.0, 0.0, 1.0);
        let b = square(0.0, 1.0, 1.0);

        assert!(ConflictRule::default().conflicts(&a, &b)?);
        assert!(!overlaps_only().conflicts(&a, &b)?);
        Ok(())
    }

    #[test]
    fn enclosed_triangle() -> Result<()> {
        let outer = to_geometry(&normalize(vec![(0.0, 0.0), (10.0, 5.0), (0.0, 10.0)]))?;
        let inner = to_geometry(&normalize(vec![(2.0, 4.0), (4.0, 5.0), (2.0, 6.0)]))?;

        assert!(!Predicate::Overlaps.holds(&outer, &inner));
        assert!(!Predicate::Overlaps.holds(&inner, &outer));
        assert!(!Predicate::Crosses.holds(&outer, &inner));
        assert!(Predicate::Intersects.holds(&outer, &inner));
        Ok(())
    }

    #[test]
    fn first_conflict_in_order() -> Result<()> {
        let others = vec![
            square(5.0, 5.0, 1.0),
            square(0.5, 0.5, 1.0),
            square(0.2, 0.2, 0.5),
        ];

        let found = ConflictRule::default()
            .first_conflict(&square(0.0, 0.0, 1.0), others.iter().map(Vec::as_slice))?;
        assert_eq!(found, Some(1));

        let none = ConflictRule::default()
            .first_conflict(&square(20.0, 20.0, 1.0), others.iter().map(Vec::as_slice))?;
        assert_eq!(none, None);
        Ok(())
    }

    #[test]
    fn conflicting_indices_all_pairs() -> Result<()> {
        let outlines = vec![
            square(0.0, 0.0, 1.0),
            square(5.0, 5.0, 1.0),
            square(0.5, 0.5, 1.0),
            square(10.0, 10.0, 1.0),
        ];

        let found = ConflictRule::default().conflicting_indices(outlines.iter().map(Vec::as_slice))?;
        assert_eq!(found, BTreeSet::from([0, 2]));
        Ok(())
    }

    #[test]
    fn degenerate_outlines() {
        let line = normalize(vec![(0.0, 0.0), (1.0, 1.0)]);
        assert!(to_geometry(&line).is_err());

        let flat = normalize(vec![(0.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        assert!(to_geometry(&flat).is_err());

        let nan = normalize(vec![(0.0, 0.0), (f64::NAN, 1.0), (1.0, 0.0)]);
        assert!(to_geometry(&nan).is_err());
    }

    #[test]
    fn empty_rule_is_rejected() -> Result<()> {
        assert!(ConflictRule::new(vec![]).is_err());

        let rule: ConflictRule = serde_norway::from_str("[crosses, overlaps]")?;
        assert_eq!(rule.predicates(), &[Predicate::Crosses, Predicate::Overlaps]);
        Ok(())
    }
}
