//! Canonical settings: the raw, hole-riddled input normalized into something
//! every later stage can trust. All numerics are finite and in range after
//! this; nothing downstream re-validates.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids;
use crate::raw::RawSettings;

pub const DEFAULT_TILE_SIZE: f64 = 24.0;
pub const DEFAULT_LANE_WIDTH: f64 = 4.8;
pub const DEFAULT_MARGIN_FACTOR: f64 = 0.1;
pub const DEFAULT_TRIM_THRESHOLD: f64 = 2.0;
pub const DEFAULT_JUNCTION_THRESHOLD_FACTOR: f64 = 1.0;
pub const DEFAULT_JUNCTION_MIN_THRESHOLD: f64 = 2.0;
pub const DEFAULT_JUNCTION_MAX_THRESHOLD: f64 = 12.0;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub tile_size: f64,
    pub lane_width: f64,
    pub margin_factor: f64,
    pub origin: WorldOrigin,
    pub flags: Flags,
    pub trim: TrimSettings,
    pub junctions: JunctionSettings,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldOrigin {
    pub x: f64,
    pub z: f64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flags {
    pub centerline: bool,
    pub direction_centerlines: bool,
    pub lane_edges: bool,
    pub asphalt_edges: bool,
    pub markers: bool,
    pub asphalt_obb: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrimSettings {
    pub enabled: bool,
    pub threshold: f64,
    pub debug: TrimDebug,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrimDebug {
    pub show_overlaps: bool,
    pub show_strips: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JunctionSettings {
    pub enabled: bool,
    pub threshold_factor: f64,
    pub min_threshold: f64,
    pub max_threshold: f64,
    pub merged_connector_ids: BTreeSet<String>,
    pub manual_junctions: Vec<ManualJunction>,
    pub hidden_junction_ids: BTreeSet<String>,
    pub suppressed_auto_junction_ids: BTreeSet<String>,
    pub debug: JunctionDebug,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualJunction {
    pub id: String,
    /// Sorted and de-duplicated during resolution.
    pub candidate_ids: Vec<String>,
    pub asphalt_visible: bool,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JunctionDebug {
    pub show_tat: bool,
    pub show_connectors: bool,
}

impl Settings {
    /// Never fails: anything missing, NaN, or out of range becomes its
    /// documented default.
    pub fn resolve(raw: &RawSettings) -> Settings {
        let min_threshold = positive_or(raw.junctions.min_threshold, DEFAULT_JUNCTION_MIN_THRESHOLD);
        let max_threshold = positive_or(raw.junctions.max_threshold, DEFAULT_JUNCTION_MAX_THRESHOLD)
            .max(min_threshold);

        let manual_junctions = raw
            .junctions
            .manual_junctions
            .iter()
            .map(|mj| {
                let mut candidate_ids = mj.candidate_ids.clone();
                candidate_ids.sort();
                candidate_ids.dedup();
                let id = match &mj.id {
                    Some(id) if !id.is_empty() => id.clone(),
                    _ => ids::junction_id(&candidate_ids),
                };
                ManualJunction {
                    id,
                    candidate_ids,
                    asphalt_visible: mj.asphalt_visible.unwrap_or(true),
                }
            })
            .collect();

        Settings {
            tile_size: positive_or(raw.tile_size, DEFAULT_TILE_SIZE),
            lane_width: positive_or(raw.lane_width, DEFAULT_LANE_WIDTH),
            margin_factor: non_negative_or(raw.margin_factor, DEFAULT_MARGIN_FACTOR),
            origin: WorldOrigin {
                x: finite_or(raw.origin.x, 0.0),
                z: finite_or(raw.origin.z, 0.0),
            },
            flags: Flags {
                centerline: raw.flags.centerline.unwrap_or(true),
                direction_centerlines: raw.flags.direction_centerlines.unwrap_or(true),
                lane_edges: raw.flags.lane_edges.unwrap_or(true),
                asphalt_edges: raw.flags.asphalt_edges.unwrap_or(true),
                markers: raw.flags.markers.unwrap_or(false),
                asphalt_obb: raw.flags.asphalt_obb.unwrap_or(false),
            },
            trim: TrimSettings {
                enabled: raw.trim.enabled.unwrap_or(true),
                threshold: non_negative_or(raw.trim.threshold, DEFAULT_TRIM_THRESHOLD),
                debug: TrimDebug {
                    show_overlaps: raw.trim.debug.show_overlaps.unwrap_or(false),
                    show_strips: raw.trim.debug.show_strips.unwrap_or(false),
                },
            },
            junctions: JunctionSettings {
                enabled: raw.junctions.enabled.unwrap_or(true),
                threshold_factor: positive_or(
                    raw.junctions.threshold_factor,
                    DEFAULT_JUNCTION_THRESHOLD_FACTOR,
                ),
                min_threshold,
                max_threshold,
                merged_connector_ids: raw.junctions.merged_connector_ids.iter().cloned().collect(),
                manual_junctions,
                hidden_junction_ids: raw.junctions.hidden_junction_ids.iter().cloned().collect(),
                suppressed_auto_junction_ids: raw
                    .junctions
                    .suppressed_auto_junction_ids
                    .iter()
                    .cloned()
                    .collect(),
                debug: JunctionDebug {
                    show_tat: raw.junctions.debug.show_tat.unwrap_or(false),
                    show_connectors: raw.junctions.debug.show_connectors.unwrap_or(false),
                },
            },
        }
    }

    /// Kept pavement shorter than this is dropped instead of emitted.
    pub fn snap_step(&self) -> f64 {
        self.tile_size / 10.0
    }

    /// Total margin beyond the outermost lane edge, each side.
    pub fn margin(&self) -> f64 {
        self.lane_width * self.margin_factor
    }
}

fn finite_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => default,
    }
}

fn positive_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => default,
    }
}

fn non_negative_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_input() {
        let s = Settings::resolve(&RawSettings::default());
        assert_eq!(s.tile_size, DEFAULT_TILE_SIZE);
        assert_eq!(s.lane_width, DEFAULT_LANE_WIDTH);
        assert!(s.trim.enabled);
        assert!(s.junctions.enabled);
        assert!(!s.flags.markers);
    }

    #[test]
    fn bad_numerics_fall_back() {
        let raw = RawSettings {
            tile_size: Some(f64::NAN),
            lane_width: Some(-3.0),
            margin_factor: Some(f64::INFINITY),
            ..Default::default()
        };
        let s = Settings::resolve(&raw);
        assert_eq!(s.tile_size, DEFAULT_TILE_SIZE);
        assert_eq!(s.lane_width, DEFAULT_LANE_WIDTH);
        assert_eq!(s.margin_factor, DEFAULT_MARGIN_FACTOR);
    }

    #[test]
    fn manual_junction_candidates_are_canonicalized() {
        let mut raw = RawSettings::default();
        raw.junctions.manual_junctions.push(crate::raw::RawManualJunction {
            id: None,
            candidate_ids: vec!["b".to_string(), "a".to_string(), "b".to_string()],
            asphalt_visible: None,
        });
        let s = Settings::resolve(&raw);
        let mj = &s.junctions.manual_junctions[0];
        assert_eq!(mj.candidate_ids, vec!["a".to_string(), "b".to_string()]);
        assert!(mj.id.starts_with("junc_"));
        assert!(mj.asphalt_visible);
    }

    #[test]
    fn threshold_ordering_is_enforced() {
        let mut raw = RawSettings::default();
        raw.junctions.min_threshold = Some(10.0);
        raw.junctions.max_threshold = Some(4.0);
        let s = Settings::resolve(&raw);
        assert!(s.junctions.max_threshold >= s.junctions.min_threshold);
    }
}
