//! Flags interior road points where the polyline bends sharply enough that
//! the rectangular pieces would visibly gap or overlap.

use crate::ids;
use crate::make::segments::SegmentsOut;
use crate::objects::junction::Corner;
use crate::objects::road::Road;

/// Turn angles below ~6.9 degrees render fine without a cut.
pub const CORNER_ANGLE_THRESHOLD: f64 = 0.12;

pub fn detect_corners(roads: &[Road], segs: &SegmentsOut) -> Vec<Corner> {
    let mut corners: Vec<Corner> = Vec::new();

    for (road_idx, road) in roads.iter().enumerate() {
        let pairs = &segs.pair_to_segment[road_idx];
        for pt_idx in 1..road.points.len().saturating_sub(1) {
            let (in_seg, out_seg) = match (pairs[pt_idx - 1], pairs[pt_idx]) {
                (Some(i), Some(o)) => (&segs.segments[i], &segs.segments[o]),
                // A degenerate neighbor already broke the polyline here.
                _ => continue,
            };
            let angle = in_seg.dir.dot(out_seg.dir).clamp(-1.0, 1.0).acos();
            if angle < CORNER_ANGLE_THRESHOLD {
                continue;
            }
            let point = &road.points[pt_idx];
            corners.push(Corner {
                id: ids::corner_id(&road.id, &point.id),
                road_id: road.id.clone(),
                point_id: point.id.clone(),
                world: point.world,
                in_segment_id: in_seg.id.clone(),
                out_segment_id: out_seg.id.clone(),
                angle,
            });
        }
    }
    corners
}
