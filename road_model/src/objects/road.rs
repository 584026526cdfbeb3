use geom::Pt2D;
use serde::{Deserialize, Serialize};

/// A road vertex with its tile anchor canonicalized and its world position
/// resolved.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadPoint {
    pub id: String,
    pub tile_x: i64,
    pub tile_y: i64,
    /// Always within [-0.5, 0.5); exactly +0.5 rolls into the next tile.
    pub offset_u: f64,
    pub offset_v: f64,
    pub world: Pt2D,
    /// Reserved for spline authoring; carried through untouched.
    pub tangent_factor: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Road {
    pub id: String,
    pub name: String,
    pub lanes_f: u32,
    pub lanes_b: u32,
    pub points: Vec<RoadPoint>,
    /// Ids of the segments actually built from this road, in order. Can be
    /// shorter than `points.len() - 1` when point pairs were degenerate.
    pub segment_ids: Vec<String>,
}
