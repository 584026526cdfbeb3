use geom::Pt2D;
use serde::{Deserialize, Serialize};

use crate::objects::endpoint::Endpoint;

/// An interior road point whose incoming/outgoing directions diverge enough
/// to be worth cutting. Only produces cuts when an authored junction lists it
/// as a candidate.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Corner {
    pub id: String,
    pub road_id: String,
    pub point_id: String,
    pub world: Pt2D,
    pub in_segment_id: String,
    pub out_segment_id: String,
    /// Turn angle between the two directions, radians.
    pub angle: f64,
}

/// A merge of endpoints/corners into one surface, either authored or
/// proposed automatically from endpoint proximity.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Junction {
    pub id: String,
    pub auto: bool,
    pub asphalt_visible: bool,
    pub candidate_ids: Vec<String>,
    /// The endpoints the candidates resolved to, sorted.
    pub endpoint_ids: Vec<String>,
    /// Candidates that matched nothing. Not an error; they're reported so the
    /// authoring side can clean up stale references.
    pub missing_candidate_ids: Vec<String>,
    pub surface: Option<JunctionSurface>,
    /// Fillet records; two entries (outer + inner) for a two-endpoint
    /// junction, empty otherwise.
    pub tat: Vec<TatRecord>,
    pub connectors: Vec<Connector>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JunctionSurface {
    /// Counter-clockwise, non-self-intersecting.
    pub points: Vec<Pt2D>,
    pub area: f64,
    pub fallback: SurfaceFallback,
}

/// How far down the degenerate-surface chain construction had to go.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SurfaceFallback {
    None,
    Quad,
    ConvexHull,
}

/// A tangent-arc-tangent polyline joining two paired edge points. Radius 0
/// means the fillet degenerated to a straight segment.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TatRecord {
    pub id: String,
    pub a_edge: Pt2D,
    pub b_edge: Pt2D,
    pub radius: f64,
    pub chord: f64,
    pub points: Vec<Pt2D>,
}

/// A candidate link between two endpoints inside a junction, for downstream
/// routing.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub id: String,
    pub a_endpoint_id: String,
    pub b_endpoint_id: String,
    pub distance: f64,
    pub same_road: bool,
    /// Externally marked as absorbed into the road surface; suppresses the
    /// visible cross-link.
    pub merged_into_road: bool,
}

/// Everything an authoring UI can reference when defining junctions.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JunctionCandidates {
    pub endpoints: Vec<Endpoint>,
    pub corners: Vec<Corner>,
}
