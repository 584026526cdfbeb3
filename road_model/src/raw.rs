//! The caller-authored input schema. This is the boundary with the map
//! adapter: roads as tile+offset polylines, plus raw (possibly partial)
//! settings. Every field is optional or defaulted; resolution never fails on
//! missing or out-of-range values.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawNetwork {
    pub roads: Vec<RawRoad>,
    pub settings: RawSettings,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRoad {
    /// Synthesized as `road_<index>` when empty.
    pub id: Option<String>,
    pub name: String,
    /// Forward/backward lane counts. Negative input is treated as 0.
    pub lanes_f: i64,
    pub lanes_b: i64,
    pub points: Vec<RawRoadPoint>,
}

/// A road vertex: an integer tile coordinate plus a fractional offset within
/// that tile. `tile_x`/`offset_u` locate along world X, `tile_y`/`offset_v`
/// along world Z.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRoadPoint {
    /// Synthesized as `pt_<roadId>_<index>` when empty. Must be unique within
    /// the road.
    pub id: Option<String>,
    pub tile_x: i64,
    pub tile_y: i64,
    pub offset_u: f64,
    pub offset_v: f64,
    pub tangent_factor: Option<f64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSettings {
    pub tile_size: Option<f64>,
    pub lane_width: Option<f64>,
    pub margin_factor: Option<f64>,
    pub origin: RawOrigin,
    pub flags: RawFlags,
    pub trim: RawTrim,
    pub junctions: RawJunctions,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawOrigin {
    pub x: Option<f64>,
    pub z: Option<f64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawFlags {
    pub centerline: Option<bool>,
    pub direction_centerlines: Option<bool>,
    pub lane_edges: Option<bool>,
    pub asphalt_edges: Option<bool>,
    pub markers: Option<bool>,
    pub asphalt_obb: Option<bool>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTrim {
    pub enabled: Option<bool>,
    pub threshold: Option<f64>,
    pub debug: RawTrimDebug,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTrimDebug {
    pub show_overlaps: Option<bool>,
    pub show_strips: Option<bool>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawJunctions {
    pub enabled: Option<bool>,
    pub threshold_factor: Option<f64>,
    pub min_threshold: Option<f64>,
    pub max_threshold: Option<f64>,
    pub merged_connector_ids: Vec<String>,
    pub manual_junctions: Vec<RawManualJunction>,
    pub hidden_junction_ids: Vec<String>,
    pub suppressed_auto_junction_ids: Vec<String>,
    pub debug: RawJunctionDebug,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawManualJunction {
    /// Synthesized as `junc_<hash of candidateIds>` when empty.
    pub id: Option<String>,
    /// Endpoint ids or corner ids.
    pub candidate_ids: Vec<String>,
    pub asphalt_visible: Option<bool>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawJunctionDebug {
    pub show_tat: Option<bool>,
    pub show_connectors: Option<bool>,
}
