//! Tile+offset canonicalization and world resolution, the first pipeline
//! stage.

use std::collections::BTreeSet;

use geom::Pt2D;

use crate::ids;
use crate::objects::road::{Road, RoadPoint};
use crate::raw::RawRoad;
use crate::settings::Settings;

/// How close to +half counts as "on the boundary".
const BOUNDARY_EPSILON: f64 = 1e-9;

/// Clamps the offset into [-0.5, 0.5] and rolls an offset at the +0.5
/// boundary into the neighboring tile, so every physical location has exactly
/// one representation.
pub fn normalize_tile_offset(tile: i64, offset: f64) -> (i64, f64) {
    let offset = if offset.is_finite() {
        offset.clamp(-0.5, 0.5)
    } else {
        0.0
    };
    if offset >= 0.5 - BOUNDARY_EPSILON {
        (tile + 1, -0.5)
    } else {
        (tile, offset)
    }
}

pub fn resolve_roads(raw_roads: &[RawRoad], settings: &Settings) -> Vec<Road> {
    let mut seen_road_ids: BTreeSet<String> = BTreeSet::new();
    let mut roads: Vec<Road> = Vec::new();

    for (road_idx, raw) in raw_roads.iter().enumerate() {
        let id = match &raw.id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => format!("road_{}", road_idx),
        };
        if !seen_road_ids.insert(id.clone()) {
            warn!("Duplicate road id {}; later output ids will collide", id);
        }

        let mut seen_point_ids: BTreeSet<String> = BTreeSet::new();
        let mut points: Vec<RoadPoint> = Vec::new();
        for (pt_idx, rp) in raw.points.iter().enumerate() {
            let pt_id = match &rp.id {
                Some(pid) if !pid.is_empty() => pid.clone(),
                _ => ids::road_point_id(&id, pt_idx),
            };
            if !seen_point_ids.insert(pt_id.clone()) {
                warn!("Duplicate point id {} in road {}", pt_id, id);
            }

            let (tile_x, offset_u) = normalize_tile_offset(rp.tile_x, rp.offset_u);
            let (tile_y, offset_v) = normalize_tile_offset(rp.tile_y, rp.offset_v);
            let world = Pt2D::new(
                settings.origin.x + (tile_x as f64 + offset_u) * settings.tile_size,
                settings.origin.z + (tile_y as f64 + offset_v) * settings.tile_size,
            );
            let tangent_factor = match rp.tangent_factor {
                Some(t) if t.is_finite() => t,
                _ => 1.0,
            };
            points.push(RoadPoint {
                id: pt_id,
                tile_x,
                tile_y,
                offset_u,
                offset_v,
                world,
                tangent_factor,
            });
        }

        roads.push(Road {
            id,
            name: raw.name.clone(),
            lanes_f: raw.lanes_f.max(0) as u32,
            lanes_b: raw.lanes_b.max(0) as u32,
            points,
            segment_ids: Vec::new(),
        });
    }
    roads
}
