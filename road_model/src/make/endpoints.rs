//! Derives connectable endpoints from kept pavement pieces: true road ends
//! and the boundaries that trimming cut open.

use geom::EPSILON_LOOSE;

use crate::ids;
use crate::make::segments::SegmentsOut;
use crate::objects::endpoint::Endpoint;
use crate::objects::segment::Segment;
use crate::objects::trim::{SegmentTrim, TrimOutput};

pub fn extract_endpoints(segs: &SegmentsOut, trim: &TrimOutput) -> Vec<Endpoint> {
    // Whether each segment's a/b point continues into a neighboring segment
    // of the same road. Untouched interior boundaries never get endpoints.
    let mut has_neighbor: Vec<(bool, bool)> = vec![(false, false); segs.segments.len()];
    for pairs in &segs.pair_to_segment {
        for (pair_idx, maybe_seg) in pairs.iter().enumerate() {
            if let Some(si) = maybe_seg {
                let a = pair_idx > 0 && pairs[pair_idx - 1].is_some();
                let b = pair_idx + 1 < pairs.len() && pairs[pair_idx + 1].is_some();
                has_neighbor[*si] = (a, b);
            }
        }
    }

    let mut endpoints: Vec<Endpoint> = Vec::new();
    for (si, seg) in segs.segments.iter().enumerate() {
        let seg_trim = &trim.per_segment[&seg.id];
        let (a_interior, b_interior) = has_neighbor[si];
        for piece in &seg_trim.kept {
            if let Some(ep) = boundary_endpoint(seg, seg_trim, piece.t0, false, a_interior) {
                endpoints.push(ep);
            }
            if let Some(ep) = boundary_endpoint(seg, seg_trim, piece.t1, true, b_interior) {
                endpoints.push(ep);
            }
        }
    }
    endpoints
}

/// One piece boundary. `end_b` is true for the boundary facing the segment's
/// b end (outward direction +dir), false for the a-facing one.
fn boundary_endpoint(
    seg: &Segment,
    seg_trim: &SegmentTrim,
    t: f64,
    end_b: bool,
    interior: bool,
) -> Option<Endpoint> {
    let at_segment_end = if end_b {
        t >= 1.0 - EPSILON_LOOSE
    } else {
        t <= EPSILON_LOOSE
    };

    let (id, source_ids) = if at_segment_end {
        if interior {
            // An untouched boundary between two segments of the same road.
            return None;
        }
        (ids::end_endpoint_id(&seg.id, end_b), Vec::new())
    } else {
        let sources = cut_sources(seg_trim, t, end_b);
        (ids::cut_endpoint_id(&sources, &seg.id, end_b), sources)
    };

    let world = seg.pt_at(t);
    let dir_out = if end_b { seg.dir } else { -seg.dir };
    let right_out = dir_out.right();
    // The segment's left/right half-widths swap roles when looking backward.
    let (rightward, leftward) = if end_b {
        (seg.obb.half_width_right, seg.obb.half_width_left)
    } else {
        (seg.obb.half_width_left, seg.obb.half_width_right)
    };

    Some(Endpoint {
        id,
        segment_id: seg.id.clone(),
        road_id: seg.road_id.clone(),
        world,
        dir_out,
        right_out,
        left_edge: world - right_out * leftward,
        right_edge: world + right_out * rightward,
        connect_radius: seg.obb.half_width_left.max(seg.obb.half_width_right),
        source_ids,
    })
}

/// The removal interval this cut boundary abuts.
fn cut_sources(seg_trim: &SegmentTrim, t: f64, end_b: bool) -> Vec<String> {
    for iv in &seg_trim.removed {
        let adjacent = if end_b {
            (iv.t0 - t).abs() <= EPSILON_LOOSE
        } else {
            (iv.t1 - t).abs() <= EPSILON_LOOSE
        };
        if adjacent {
            return iv.source_ids.clone();
        }
    }
    warn!("Cut boundary at t={} matches no removal interval", t);
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make::points::resolve_roads;
    use crate::make::segments::build_segments;
    use crate::make::trim::trim_segments;
    use crate::raw::{RawRoad, RawRoadPoint, RawSettings};
    use crate::settings::Settings;
    use geom::Vec2D;

    fn raw_point(x: i64, y: i64) -> RawRoadPoint {
        RawRoadPoint {
            tile_x: x,
            tile_y: y,
            ..Default::default()
        }
    }

    fn simple_settings() -> Settings {
        Settings::resolve(&RawSettings {
            tile_size: Some(1.0),
            lane_width: Some(4.0),
            margin_factor: Some(0.0),
            ..Default::default()
        })
    }

    #[test]
    fn straight_road_has_two_end_endpoints() {
        let settings = simple_settings();
        let road = RawRoad {
            id: Some("r".to_string()),
            lanes_f: 1,
            lanes_b: 1,
            points: vec![raw_point(0, 0), raw_point(10, 0), raw_point(20, 0)],
            ..Default::default()
        };
        let mut roads = resolve_roads(&[road], &settings);
        let segs = build_segments(&mut roads, &settings);
        let trim = trim_segments(&segs.segments, &[], &settings);
        let endpoints = extract_endpoints(&segs, &trim);

        // The interior point at x=10 is untouched; only the true ends emit.
        assert_eq!(endpoints.len(), 2);
        let a = &endpoints[0];
        assert_eq!(a.id, format!("ep_{}__a", segs.segments[0].id));
        assert_eq!(a.dir_out, Vec2D::new(-1.0, 0.0));
        assert_eq!(a.right_out, Vec2D::new(0.0, -1.0));
        // Looking outward at the a end, the forward-lane side is to the left.
        assert_eq!(a.right_edge.z, -4.0);
        assert_eq!(a.left_edge.z, 4.0);
        let b = &endpoints[1];
        assert_eq!(b.id, format!("ep_{}__b", segs.segments[1].id));
        assert_eq!(b.dir_out, Vec2D::new(1.0, 0.0));
    }

    #[test]
    fn cut_endpoints_are_stable_across_input_order() {
        let settings = simple_settings();
        let ew = RawRoad {
            id: Some("ew".to_string()),
            lanes_f: 1,
            lanes_b: 1,
            points: vec![raw_point(-50, 0), raw_point(50, 0)],
            ..Default::default()
        };
        let ns = RawRoad {
            id: Some("ns".to_string()),
            lanes_f: 1,
            lanes_b: 1,
            points: vec![raw_point(0, -50), raw_point(0, 50)],
            ..Default::default()
        };

        let cut_ids = |order: Vec<RawRoad>| -> Vec<String> {
            let mut roads = resolve_roads(&order, &settings);
            let segs = build_segments(&mut roads, &settings);
            let trim = trim_segments(&segs.segments, &[], &settings);
            let mut ids: Vec<String> = extract_endpoints(&segs, &trim)
                .into_iter()
                .filter(|ep| ep.id.starts_with("cut_"))
                .map(|ep| ep.id)
                .collect();
            ids.sort();
            ids
        };

        let forward = cut_ids(vec![ew.clone(), ns.clone()]);
        let reversed = cut_ids(vec![ns, ew]);
        assert_eq!(forward.len(), 4);
        assert_eq!(forward, reversed);
    }
}
