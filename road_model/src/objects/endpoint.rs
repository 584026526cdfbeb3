use geom::{Pt2D, Vec2D};
use serde::{Deserialize, Serialize};

/// A connectable road end: either a true terminus of a road or a cut
/// boundary left behind by trimming. Junctions pair these up.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub id: String,
    pub segment_id: String,
    pub road_id: String,
    pub world: Pt2D,
    /// Unit vector pointing away from the pavement piece, into whatever the
    /// end faces.
    pub dir_out: Vec2D,
    /// `dir_out` rotated 90 degrees.
    pub right_out: Vec2D,
    pub left_edge: Pt2D,
    pub right_edge: Pt2D,
    /// How far away another endpoint can be and still cluster into an
    /// automatic junction proposal.
    pub connect_radius: f64,
    /// The trim sources that produced this cut; empty at a true road end.
    pub source_ids: Vec<String>,
}
