//! Distance from the bullseye and its mapping to ring scores.

use nalgebra::{distance, Point2};
use ringscore_core::Region;
use serde::{Deserialize, Serialize};

use crate::TableError;

/// One ring: distances below `max_distance` (and not inside an inner ring)
/// score `score`.
///
/// A distance exactly equal to `max_distance` is on the ring edge and falls
/// into the next ring out; on the outermost ring's edge it scores 0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RingEntry {
    pub max_distance: f64,
    pub score: u32,
}

/// Rings ordered from the bullseye outwards.
///
/// Rings are half-open: a distance equal to a ring's `max_distance` falls
/// into the next ring out, and anything at or beyond the last ring misses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RingEntry>", into = "Vec<RingEntry>")]
pub struct RingTable {
    rings: Vec<RingEntry>,
}

impl RingTable {
    pub fn new(rings: Vec<RingEntry>) -> Result<Self, TableError> {
        if rings.is_empty() {
            return Err(TableError::Empty);
        }
        for (index, ring) in rings.iter().enumerate() {
            if !ring.max_distance.is_finite() || ring.max_distance < 0.0 {
                return Err(TableError::InvalidDistance { index });
            }
            if index > 0 && ring.max_distance <= rings[index - 1].max_distance {
                return Err(TableError::NotAscending { index });
            }
        }
        Ok(Self { rings })
    }

    /// Build from `(max_distance, score)` pairs.
    pub fn from_pairs(pairs: &[(f64, u32)]) -> Result<Self, TableError> {
        Self::new(
            pairs
                .iter()
                .map(|&(max_distance, score)| RingEntry {
                    max_distance,
                    score,
                })
                .collect(),
        )
    }

    pub fn rings(&self) -> &[RingEntry] {
        &self.rings
    }

    /// Score for a distance; 0 when it lies outside every ring.
    pub fn score_for(&self, distance: f64) -> u32 {
        self.rings
            .iter()
            .find(|ring| distance < ring.max_distance)
            .map_or(0, |ring| ring.score)
    }
}

impl TryFrom<Vec<RingEntry>> for RingTable {
    type Error = TableError;

    fn try_from(rings: Vec<RingEntry>) -> Result<Self, Self::Error> {
        Self::new(rings)
    }
}

impl From<RingTable> for Vec<RingEntry> {
    fn from(table: RingTable) -> Self {
        table.rings
    }
}

/// Geometric center of a `width x height` image.
pub fn image_center(width: usize, height: usize) -> Point2<f64> {
    Point2::new(width as f64 / 2.0, height as f64 / 2.0)
}

/// Euclidean pixel distance from the region center to the image center.
pub fn region_distance(width: usize, height: usize, region: &Region) -> f64 {
    distance(&region.center(), &image_center(width, height))
}

/// Distance and ring score for one region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RingScore {
    pub distance: f64,
    pub score: u32,
}

/// Scores regions against a fixed ring table.
#[derive(Clone, Debug)]
pub struct DistanceScorer {
    table: RingTable,
}

impl DistanceScorer {
    pub fn new(table: RingTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RingTable {
        &self.table
    }

    pub fn score(&self, width: usize, height: usize, region: &Region) -> RingScore {
        let distance = region_distance(width, height, region);
        RingScore {
            distance,
            score: self.table.score_for(distance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn table() -> RingTable {
        RingTable::from_pairs(&[(10.0, 10), (30.0, 8), (60.0, 5), (100.0, 2)]).expect("table")
    }

    #[test]
    fn centered_region_hits_bullseye() {
        let s = DistanceScorer::new(table()).score(640, 480, &Region::new(300, 220, 40, 40));
        assert_eq!(s.distance, 0.0);
        assert_eq!(s.score, 10);
    }

    #[test]
    fn distance_on_last_ring_edge_is_a_miss() {
        let s = DistanceScorer::new(table()).score(640, 480, &Region::new(400, 220, 40, 40));
        assert_relative_eq!(s.distance, 100.0);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn ring_edges_belong_to_the_outer_ring() {
        let t = table();
        assert_eq!(t.score_for(9.99), 10);
        assert_eq!(t.score_for(10.0), 8);
        assert_eq!(t.score_for(59.0), 5);
        assert_eq!(t.score_for(99.5), 2);
        assert_eq!(t.score_for(250.0), 0);
    }

    #[test]
    fn distance_matches_euclid_for_odd_and_even_sizes() {
        for &(w, h) in &[(640usize, 480usize), (641, 481), (15, 8), (7, 7)] {
            let r = Region::new(1, 2, 3, 5);
            let (cx, cy) = (1.0 + 1.5, 2.0 + 2.5);
            let expected = ((cx - w as f64 / 2.0).powi(2) + (cy - h as f64 / 2.0).powi(2)).sqrt();
            assert_relative_eq!(region_distance(w, h, &r), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn unsorted_table_is_rejected() {
        let err = RingTable::from_pairs(&[(10.0, 10), (5.0, 8)]).expect_err("unsorted");
        assert_eq!(err, TableError::NotAscending { index: 1 });
    }

    #[test]
    fn empty_table_is_rejected() {
        assert_eq!(RingTable::new(Vec::new()), Err(TableError::Empty));
    }

    #[test]
    fn table_deserializes_through_validation() {
        let ok: RingTable =
            serde_json::from_str(r#"[{"max_distance": 5, "score": 10}]"#).expect("json");
        assert_eq!(ok.rings().len(), 1);
        let bad = serde_json::from_str::<RingTable>(
            r#"[{"max_distance": 5, "score": 10}, {"max_distance": 5, "score": 9}]"#,
        );
        assert!(bad.is_err());
    }
}
