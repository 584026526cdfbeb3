//! Per-point-pair segment construction: direction frames, lane/asphalt
//! offsets, and the paved footprint.

use geom::EPSILON_DIST;

use crate::ids;
use crate::objects::road::Road;
use crate::objects::segment::{AsphaltObb, Segment};
use crate::settings::Settings;

pub struct SegmentsOut {
    pub segments: Vec<Segment>,
    /// Per road, per consecutive point pair: index into `segments`, or None
    /// when that pair was degenerate.
    pub pair_to_segment: Vec<Vec<Option<usize>>>,
}

pub fn build_segments(roads: &mut [Road], settings: &Settings) -> SegmentsOut {
    let mut segments: Vec<Segment> = Vec::new();
    let mut pair_to_segment: Vec<Vec<Option<usize>>> = Vec::new();

    for road in roads.iter_mut() {
        let mut pairs: Vec<Option<usize>> = Vec::new();
        for pair in 0..road.points.len().saturating_sub(1) {
            let a = &road.points[pair];
            let b = &road.points[pair + 1];
            let delta = b.world - a.world;
            let length = delta.length();
            let dir = match delta.normalized() {
                Some(dir) if length > EPSILON_DIST => dir,
                _ => {
                    warn!(
                        "Skipping zero-length segment {} -> {} on road {}",
                        a.id, b.id, road.id
                    );
                    pairs.push(None);
                    continue;
                }
            };
            let right = dir.right();

            let right_lane_edge = f64::from(road.lanes_f) * settings.lane_width;
            let left_lane_edge = f64::from(road.lanes_b) * settings.lane_width;
            let margin = settings.margin();
            let right_asphalt_edge = right_lane_edge + margin;
            let left_asphalt_edge = left_lane_edge + margin;

            let id = ids::segment_id(&road.id, &a.id, &b.id);
            let obb = AsphaltObb::new(a.world, b.world, dir, left_asphalt_edge, right_asphalt_edge);

            road.segment_ids.push(id.clone());
            pairs.push(Some(segments.len()));
            segments.push(Segment {
                id,
                road_id: road.id.clone(),
                a_point_id: a.id.clone(),
                b_point_id: b.id.clone(),
                a: a.world,
                b: b.world,
                dir,
                right,
                length,
                lanes_f: road.lanes_f,
                lanes_b: road.lanes_b,
                right_lane_edge,
                left_lane_edge,
                right_asphalt_edge,
                left_asphalt_edge,
                obb,
            });
        }
        pair_to_segment.push(pairs);
    }

    SegmentsOut {
        segments,
        pair_to_segment,
    }
}
