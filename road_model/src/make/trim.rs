//! Pairwise overlap trimming: find where paved strips collide, project the
//! collisions onto each segment's parametric domain, and carve the domain
//! into kept and dropped pavement pieces.

use std::collections::{BTreeMap, BTreeSet};

use geom::{clip_to_convex, polygon_area, Bounds, Pt2D, Vec2D, EPSILON_LOOSE};

use crate::ids;
use crate::objects::junction::Corner;
use crate::objects::segment::Segment;
use crate::objects::trim::{Overlap, Piece, SegmentTrim, TrimInterval, TrimOutput};
use crate::settings::Settings;

/// A corner cut never consumes more than this share of either adjoining
/// segment.
const MAX_CORNER_CUT_SHARE: f64 = 0.45;

/// Clipped overlap polygons under this area are numerical noise.
const MIN_OVERLAP_AREA: f64 = 1e-6;

type RawInterval = (f64, f64, BTreeSet<String>);

pub fn trim_segments(segments: &[Segment], corners: &[Corner], settings: &Settings) -> TrimOutput {
    let mut overlaps: Vec<Overlap> = Vec::new();
    let mut removals: BTreeMap<String, Vec<RawInterval>> = BTreeMap::new();

    if settings.trim.enabled {
        collect_overlaps(segments, settings, &mut overlaps, &mut removals);
        collect_corner_cuts(segments, corners, settings, &mut removals);
    }

    let mut per_segment: BTreeMap<String, SegmentTrim> = BTreeMap::new();
    for seg in segments {
        let removed = merge_intervals(removals.remove(&seg.id).unwrap_or_default());
        per_segment.insert(seg.id.clone(), split_pieces(seg, removed, settings));
    }

    TrimOutput {
        enabled: settings.trim.enabled,
        threshold: settings.trim.threshold,
        overlaps,
        per_segment,
    }
}

fn collect_overlaps(
    segments: &[Segment],
    settings: &Settings,
    overlaps: &mut Vec<Overlap>,
    removals: &mut BTreeMap<String, Vec<RawInterval>>,
) {
    // Pair iteration in lexicographic id order, so overlap ids and interval
    // sources never depend on input ordering.
    let mut order: Vec<usize> = (0..segments.len()).collect();
    order.sort_by(|&i, &j| segments[i].id.cmp(&segments[j].id));

    let pad = settings.trim.threshold / 2.0;
    for i in 0..order.len() {
        for j in (i + 1)..order.len() {
            let sa = &segments[order[i]];
            let sb = &segments[order[j]];
            // Segments that legitimately join at an authored point are the
            // junction machinery's business, not the trimmer's.
            if shares_point(sa, sb) {
                continue;
            }
            if !sa
                .obb
                .aabb
                .expanded(pad)
                .intersects(&sb.obb.aabb.expanded(pad))
            {
                continue;
            }

            let strip_a = sa.obb.expanded(pad);
            let strip_b = sb.obb.expanded(pad);
            if sat_separated(&strip_a, &strip_b, &[sa.dir, sa.right, sb.dir, sb.right]) {
                continue;
            }

            let clipped = clip_to_convex(&strip_a, &strip_b);
            if clipped.len() < 3 || polygon_area(&clipped) <= MIN_OVERLAP_AREA {
                continue;
            }

            let interval_a = project_interval(sa, &clipped);
            let interval_b = project_interval(sb, &clipped);
            let id = ids::overlap_id(&sa.id, &sb.id);
            push_removal(removals, &sa.id, interval_a, &id);
            push_removal(removals, &sb.id, interval_b, &id);
            overlaps.push(Overlap {
                id,
                seg_a: sa.id.clone(),
                seg_b: sb.id.clone(),
                polygon: clipped,
                interval_a,
                interval_b,
            });
        }
    }
}

fn collect_corner_cuts(
    segments: &[Segment],
    corners: &[Corner],
    settings: &Settings,
    removals: &mut BTreeMap<String, Vec<RawInterval>>,
) {
    // Corners only cut when some manual junction claims them.
    let active: BTreeSet<&str> = settings
        .junctions
        .manual_junctions
        .iter()
        .flat_map(|mj| mj.candidate_ids.iter().map(String::as_str))
        .collect();
    if active.is_empty() {
        return;
    }
    let by_id: BTreeMap<&str, &Segment> =
        segments.iter().map(|seg| (seg.id.as_str(), seg)).collect();

    for corner in corners {
        if !active.contains(corner.id.as_str()) {
            continue;
        }
        let (sin, sout) = match (
            by_id.get(corner.in_segment_id.as_str()),
            by_id.get(corner.out_segment_id.as_str()),
        ) {
            (Some(sin), Some(sout)) => (*sin, *sout),
            _ => continue,
        };

        let half_width = sin
            .obb
            .half_width_left
            .max(sin.obb.half_width_right)
            .max(sout.obb.half_width_left)
            .max(sout.obb.half_width_right);
        let cut = (half_width * settings.junctions.threshold_factor)
            .clamp(
                settings.junctions.min_threshold,
                settings.junctions.max_threshold,
            )
            .min(MAX_CORNER_CUT_SHARE * sin.length.min(sout.length));

        push_removal(
            removals,
            &sin.id,
            (1.0 - cut / sin.length, 1.0),
            &corner.id,
        );
        push_removal(removals, &sout.id, (0.0, cut / sout.length), &corner.id);
    }
}

fn push_removal(
    removals: &mut BTreeMap<String, Vec<RawInterval>>,
    segment_id: &str,
    (t0, t1): (f64, f64),
    source_id: &str,
) {
    let t0 = t0.clamp(0.0, 1.0);
    let t1 = t1.clamp(0.0, 1.0);
    if t1 <= t0 {
        return;
    }
    let mut sources = BTreeSet::new();
    sources.insert(source_id.to_string());
    removals
        .entry(segment_id.to_string())
        .or_default()
        .push((t0, t1, sources));
}

fn shares_point(a: &Segment, b: &Segment) -> bool {
    a.a_point_id == b.a_point_id
        || a.a_point_id == b.b_point_id
        || a.b_point_id == b.a_point_id
        || a.b_point_id == b.b_point_id
}

/// Separating-axis test over the four strip frame axes. True when some axis
/// cleanly separates the two convex quads.
fn sat_separated(a: &[Pt2D], b: &[Pt2D], axes: &[Vec2D]) -> bool {
    for axis in axes {
        let (a_min, a_max) = project_extent(a, *axis);
        let (b_min, b_max) = project_extent(b, *axis);
        if a_max < b_min || b_max < a_min {
            return true;
        }
    }
    false
}

fn project_extent(pts: &[Pt2D], axis: Vec2D) -> (f64, f64) {
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for pt in pts {
        let d = axis.x * pt.x + axis.z * pt.z;
        min = min.min(d);
        max = max.max(d);
    }
    (min, max)
}

/// Projects a clipped polygon onto the segment's [0, 1] domain.
fn project_interval(seg: &Segment, poly: &[Pt2D]) -> (f64, f64) {
    let mut t0 = f64::MAX;
    let mut t1 = f64::MIN;
    for pt in poly {
        let t = ((*pt - seg.a).dot(seg.dir) / seg.length).clamp(0.0, 1.0);
        t0 = t0.min(t);
        t1 = t1.max(t);
    }
    (t0, t1)
}

/// Sorts by start, merges anything overlapping or adjacent (within 1e-6),
/// unioning the source-id sets.
fn merge_intervals(mut raw: Vec<RawInterval>) -> Vec<TrimInterval> {
    raw.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut merged: Vec<RawInterval> = Vec::new();
    for (t0, t1, sources) in raw {
        match merged.last_mut() {
            Some(last) if t0 <= last.1 + EPSILON_LOOSE => {
                last.1 = last.1.max(t1);
                last.2.extend(sources);
            }
            _ => merged.push((t0, t1, sources)),
        }
    }

    merged
        .into_iter()
        .map(|(t0, t1, sources)| TrimInterval {
            t0,
            t1,
            source_ids: sources.into_iter().collect(),
        })
        .collect()
}

/// The complement of the removals over [0, 1], classified into kept pieces
/// and dropped slivers.
fn split_pieces(seg: &Segment, removed: Vec<TrimInterval>, settings: &Settings) -> SegmentTrim {
    let mut spans: Vec<(f64, f64)> = Vec::new();
    let mut cursor = 0.0;
    for iv in &removed {
        if iv.t0 > cursor + EPSILON_LOOSE {
            spans.push((cursor, iv.t0));
        }
        cursor = cursor.max(iv.t1);
    }
    if cursor < 1.0 - EPSILON_LOOSE {
        spans.push((cursor, 1.0));
    }

    let mut kept: Vec<Piece> = Vec::new();
    let mut dropped: Vec<Piece> = Vec::new();
    for (index, (t0, t1)) in spans.into_iter().enumerate() {
        let corners = seg.piece_corners(t0, t1);
        let piece = Piece {
            index,
            t0,
            t1,
            aabb: Bounds::from_pts(&corners),
            corners,
        };
        if (t1 - t0) * seg.length < settings.snap_step() {
            dropped.push(piece);
        } else {
            kept.push(piece);
        }
    }
    SegmentTrim {
        removed,
        kept,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make::points::resolve_roads;
    use crate::make::segments::build_segments;
    use crate::raw::{RawManualJunction, RawRoad, RawRoadPoint, RawSettings};

    fn raw_point(x: i64, y: i64) -> RawRoadPoint {
        RawRoadPoint {
            tile_x: x,
            tile_y: y,
            ..Default::default()
        }
    }

    fn crossing() -> (Vec<Segment>, Settings) {
        let settings = Settings::resolve(&RawSettings {
            tile_size: Some(1.0),
            lane_width: Some(4.0),
            margin_factor: Some(0.0),
            ..Default::default()
        });
        let roads = vec![
            RawRoad {
                id: Some("ew".to_string()),
                lanes_f: 1,
                lanes_b: 1,
                points: vec![raw_point(-50, 0), raw_point(50, 0)],
                ..Default::default()
            },
            RawRoad {
                id: Some("ns".to_string()),
                lanes_f: 1,
                lanes_b: 1,
                points: vec![raw_point(0, -50), raw_point(0, 50)],
                ..Default::default()
            },
        ];
        let mut roads = resolve_roads(&roads, &settings);
        let segs = build_segments(&mut roads, &settings);
        (segs.segments, settings)
    }

    #[test]
    fn perpendicular_crossing_trims_both() {
        let (segments, settings) = crossing();
        let out = trim_segments(&segments, &[], &settings);

        assert_eq!(out.overlaps.len(), 1);
        let ov = &out.overlaps[0];
        assert!(ov.id.starts_with("ov_"));

        for seg in &segments {
            let trim = &out.per_segment[&seg.id];
            assert_eq!(trim.removed.len(), 1);
            assert!(trim.removed[0].source_ids.contains(&ov.id));
            // One kept piece on each side of the crossing.
            assert_eq!(trim.kept.len(), 2);
            // Kept pieces plus removals tile the whole domain.
            let covered: f64 = trim
                .removed
                .iter()
                .map(|iv| iv.t1 - iv.t0)
                .chain(trim.kept.iter().map(|p| p.t1 - p.t0))
                .sum();
            assert!((covered - 1.0).abs() < 1e-9, "covered {}", covered);
        }
    }

    #[test]
    fn kept_pieces_do_not_mutually_overlap() {
        let (segments, settings) = crossing();
        let out = trim_segments(&segments, &[], &settings);
        let a = &out.per_segment[&segments[0].id].kept;
        let b = &out.per_segment[&segments[1].id].kept;
        for pa in a {
            for pb in b {
                let clipped = clip_to_convex(&pa.corners, &pb.corners);
                assert!(
                    clipped.len() < 3 || polygon_area(&clipped) <= MIN_OVERLAP_AREA,
                    "pieces overlap"
                );
            }
        }
    }

    #[test]
    fn disabled_trim_keeps_whole_segments() {
        let (segments, _) = crossing();
        let settings = Settings::resolve(&RawSettings {
            trim: crate::raw::RawTrim {
                enabled: Some(false),
                ..Default::default()
            },
            ..Default::default()
        });
        let out = trim_segments(&segments, &[], &settings);
        assert!(out.overlaps.is_empty());
        for seg in &segments {
            let trim = &out.per_segment[&seg.id];
            assert_eq!(trim.kept.len(), 1);
            assert_eq!((trim.kept[0].t0, trim.kept[0].t1), (0.0, 1.0));
        }
    }

    #[test]
    fn parallel_far_apart_segments_do_not_trim() {
        let settings = Settings::resolve(&RawSettings {
            tile_size: Some(1.0),
            lane_width: Some(2.0),
            margin_factor: Some(0.0),
            ..Default::default()
        });
        let roads = vec![
            RawRoad {
                id: Some("a".to_string()),
                lanes_f: 1,
                points: vec![raw_point(0, 0), raw_point(100, 0)],
                ..Default::default()
            },
            RawRoad {
                id: Some("b".to_string()),
                lanes_f: 1,
                points: vec![raw_point(0, 50), raw_point(100, 50)],
                ..Default::default()
            },
        ];
        let mut roads = resolve_roads(&roads, &settings);
        let segs = build_segments(&mut roads, &settings);
        let out = trim_segments(&segs.segments, &[], &settings);
        assert!(out.overlaps.is_empty());
    }

    #[test]
    fn corner_cut_requires_manual_junction() {
        let settings_base = RawSettings {
            tile_size: Some(1.0),
            lane_width: Some(4.0),
            margin_factor: Some(0.0),
            ..Default::default()
        };
        let road = RawRoad {
            id: Some("bend".to_string()),
            lanes_f: 1,
            lanes_b: 1,
            points: vec![raw_point(0, 0), raw_point(60, 0), raw_point(60, 60)],
            ..Default::default()
        };

        let settings = Settings::resolve(&settings_base);
        let mut roads = resolve_roads(&[road.clone()], &settings);
        let segs = build_segments(&mut roads, &settings);
        let corners = crate::make::corners::detect_corners(&roads, &segs);
        assert_eq!(corners.len(), 1);

        // Without the manual junction: no cuts.
        let out = trim_segments(&segs.segments, &corners, &settings);
        for seg in &segs.segments {
            assert!(out.per_segment[&seg.id].removed.is_empty());
        }

        // With it: both adjoining segments get an end cut.
        let mut raw = settings_base;
        raw.junctions.manual_junctions.push(RawManualJunction {
            id: None,
            candidate_ids: vec![corners[0].id.clone()],
            asphalt_visible: None,
        });
        let settings = Settings::resolve(&raw);
        let out = trim_segments(&segs.segments, &corners, &settings);
        let in_trim = &out.per_segment[&corners[0].in_segment_id];
        let out_trim = &out.per_segment[&corners[0].out_segment_id];
        assert_eq!(in_trim.removed.len(), 1);
        assert!((in_trim.removed[0].t1 - 1.0).abs() < 1e-12);
        assert!(in_trim.removed[0].source_ids.contains(&corners[0].id));
        assert_eq!(out_trim.removed.len(), 1);
        assert_eq!(out_trim.removed[0].t0, 0.0);
    }

    #[test]
    fn interval_merging_unions_sources() {
        let mut sources1 = BTreeSet::new();
        sources1.insert("ov_a".to_string());
        let mut sources2 = BTreeSet::new();
        sources2.insert("ov_b".to_string());
        let merged = merge_intervals(vec![
            (0.4, 0.6, sources2),
            (0.1, 0.5, sources1),
            (0.9, 1.0, BTreeSet::new()),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!((merged[0].t0, merged[0].t1), (0.1, 0.6));
        assert_eq!(
            merged[0].source_ids,
            vec!["ov_a".to_string(), "ov_b".to_string()]
        );
    }

    #[test]
    fn short_leftovers_are_dropped() {
        let settings = Settings::resolve(&RawSettings {
            tile_size: Some(10.0),
            ..Default::default()
        });
        let road = RawRoad {
            id: Some("r".to_string()),
            points: vec![raw_point(0, 0), raw_point(1, 0)],
            ..Default::default()
        };
        let mut roads = resolve_roads(&[road], &settings);
        let segs = build_segments(&mut roads, &settings);
        let seg = &segs.segments[0];
        // Leave only 5% of a 10m segment: 0.5m, under the 1m snap step.
        let mut sources = BTreeSet::new();
        sources.insert("ov_x".to_string());
        let trim = split_pieces(
            seg,
            merge_intervals(vec![(0.05, 1.0, sources)]),
            &settings,
        );
        assert!(trim.kept.is_empty());
        assert_eq!(trim.dropped.len(), 1);
    }
}
