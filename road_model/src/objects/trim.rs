use std::collections::BTreeMap;

use geom::{Bounds, Pt2D};
use serde::{Deserialize, Serialize};

/// A span of a segment's [0, 1] parametric domain marked for removal, tagged
/// with the overlap/corner ids that caused it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrimInterval {
    pub t0: f64,
    pub t1: f64,
    /// Sorted, de-duplicated.
    pub source_ids: Vec<String>,
}

/// A trimmed sub-rectangle of pavement. Kept pieces become asphalt polygons;
/// dropped ones were too short to be worth emitting.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    pub index: usize,
    pub t0: f64,
    pub t1: f64,
    /// Counter-clockwise.
    pub corners: Vec<Pt2D>,
    pub aabb: Bounds,
}

/// One pairwise asphalt-strip overlap, with the clipped polygon and the
/// removal span it projects to on each segment.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlap {
    pub id: String,
    pub seg_a: String,
    pub seg_b: String,
    pub polygon: Vec<Pt2D>,
    pub interval_a: (f64, f64),
    pub interval_b: (f64, f64),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentTrim {
    pub removed: Vec<TrimInterval>,
    pub kept: Vec<Piece>,
    pub dropped: Vec<Piece>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrimOutput {
    pub enabled: bool,
    pub threshold: f64,
    pub overlaps: Vec<Overlap>,
    pub per_segment: BTreeMap<String, SegmentTrim>,
}
