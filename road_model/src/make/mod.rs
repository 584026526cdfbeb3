//! The pipeline itself: every stage in dependency order, then primitive
//! emission. Everything is a pure transform; the only entry point is
//! [`build_network`].

pub mod corners;
pub mod endpoints;
pub mod junctions;
pub mod points;
pub mod segments;
pub mod trim;

use std::collections::BTreeMap;

use geom::{polygon_area, Pt2D};

use crate::objects::endpoint::Endpoint;
use crate::objects::junction::{Junction, JunctionCandidates};
use crate::objects::network::RoadNetwork;
use crate::objects::primitive::{Primitive, PrimitiveData};
use crate::objects::road::Road;
use crate::objects::segment::Segment;
use crate::objects::trim::TrimOutput;
use crate::raw::RawNetwork;
use crate::settings::Settings;

/// Builds the complete geometric model for one road network snapshot.
/// Deterministic: identical input produces byte-identical output.
pub fn build_network(raw: &RawNetwork) -> RoadNetwork {
    let settings = Settings::resolve(&raw.settings);
    let mut roads = points::resolve_roads(&raw.roads, &settings);
    let segs = segments::build_segments(&mut roads, &settings);
    let corners = corners::detect_corners(&roads, &segs);
    let trim = trim::trim_segments(&segs.segments, &corners, &settings);
    let endpoints = endpoints::extract_endpoints(&segs, &trim);
    let junctions = junctions::build_junctions(&endpoints, &settings);
    let primitives = emit_primitives(
        &roads,
        &segs.segments,
        &trim,
        &endpoints,
        &junctions,
        &settings,
    );

    RoadNetwork {
        settings,
        roads,
        segments: segs.segments,
        primitives,
        trim,
        junctions,
        junction_candidates: JunctionCandidates { endpoints, corners },
    }
}

fn emit_primitives(
    roads: &[Road],
    segments: &[Segment],
    trim: &TrimOutput,
    endpoints: &[Endpoint],
    junctions: &[Junction],
    settings: &Settings,
) -> Vec<Primitive> {
    let mut out: Vec<Primitive> = Vec::new();

    if settings.flags.markers {
        for road in roads {
            if road.points.is_empty() {
                continue;
            }
            out.push(Primitive::Points(data(
                format!("road_points__{}", road.id),
                "road_points",
                road.points.iter().map(|pt| pt.world).collect(),
            )
            .for_road(&road.id)));
        }
    }

    for seg in segments {
        emit_segment_polylines(seg, settings, &mut out);

        for piece in &trim.per_segment[&seg.id].kept {
            out.push(Primitive::Polygon(data(
                format!("asphalt_piece__{}__{}", seg.id, piece.index),
                "asphalt_piece",
                piece.corners.clone(),
            )
            .for_segment(seg)));
        }

        if settings.trim.enabled && settings.trim.debug.show_strips {
            out.push(Primitive::Polygon(data(
                format!("trim_strip__{}", seg.id),
                "trim_strip",
                seg.obb.expanded(settings.trim.threshold / 2.0),
            )
            .for_segment(seg)));
        }
    }

    if settings.trim.debug.show_overlaps {
        for ov in &trim.overlaps {
            if let Some(polygon) = checked_polygon(&ov.polygon, &ov.id) {
                out.push(Primitive::Polygon(data(
                    format!("trim_overlap__{}", ov.id),
                    "trim_overlap",
                    polygon,
                )));
            }
        }
    }

    let endpoint_by_id: BTreeMap<&str, &Endpoint> =
        endpoints.iter().map(|ep| (ep.id.as_str(), ep)).collect();
    for junction in junctions {
        let hidden = settings.junctions.hidden_junction_ids.contains(&junction.id)
            || !junction.asphalt_visible;
        if let Some(surface) = &junction.surface {
            if !hidden {
                out.push(Primitive::Polygon(data(
                    format!("junction_surface__{}", junction.id),
                    "junction_surface",
                    surface.points.clone(),
                )
                .for_junction(&junction.id)));
            }
        }
        if settings.junctions.debug.show_tat {
            for tat in &junction.tat {
                out.push(Primitive::Polyline(data(
                    tat.id.clone(),
                    "junction_tat",
                    tat.points.clone(),
                )
                .for_junction(&junction.id)));
            }
        }
        if settings.junctions.debug.show_connectors {
            for conn in &junction.connectors {
                if conn.merged_into_road {
                    continue;
                }
                let (a, b) = match (
                    endpoint_by_id.get(conn.a_endpoint_id.as_str()),
                    endpoint_by_id.get(conn.b_endpoint_id.as_str()),
                ) {
                    (Some(a), Some(b)) => (a.world, b.world),
                    _ => continue,
                };
                let mut prim = data(format!("connector__{}", conn.id), "connector", vec![a, b])
                    .for_junction(&junction.id);
                prim.connector_id = Some(conn.id.clone());
                out.push(Primitive::Polyline(prim));
            }
        }
    }

    out
}

fn emit_segment_polylines(seg: &Segment, settings: &Settings, out: &mut Vec<Primitive>) {
    let flags = &settings.flags;
    let shifted = |offset: f64| vec![seg.a + seg.right * offset, seg.b + seg.right * offset];

    if flags.centerline {
        out.push(Primitive::Polyline(
            data(
                format!("centerline__{}", seg.id),
                "centerline",
                vec![seg.a, seg.b],
            )
            .for_segment(seg),
        ));
    }
    if flags.direction_centerlines {
        if seg.lanes_f > 0 {
            out.push(Primitive::Polyline(
                data(
                    format!("direction_centerline_f__{}", seg.id),
                    "direction_centerline",
                    shifted(seg.right_lane_edge / 2.0),
                )
                .for_segment(seg),
            ));
        }
        if seg.lanes_b > 0 {
            out.push(Primitive::Polyline(
                data(
                    format!("direction_centerline_b__{}", seg.id),
                    "direction_centerline",
                    shifted(-seg.left_lane_edge / 2.0),
                )
                .for_segment(seg),
            ));
        }
    }
    if flags.lane_edges {
        if seg.lanes_f > 0 {
            out.push(Primitive::Polyline(
                data(
                    format!("lane_edge_r__{}", seg.id),
                    "lane_edge",
                    shifted(seg.right_lane_edge),
                )
                .for_segment(seg),
            ));
        }
        if seg.lanes_b > 0 {
            out.push(Primitive::Polyline(
                data(
                    format!("lane_edge_l__{}", seg.id),
                    "lane_edge",
                    shifted(-seg.left_lane_edge),
                )
                .for_segment(seg),
            ));
        }
    }
    if flags.asphalt_edges {
        out.push(Primitive::Polyline(
            data(
                format!("asphalt_edge_r__{}", seg.id),
                "asphalt_edge",
                shifted(seg.right_asphalt_edge),
            )
            .for_segment(seg),
        ));
        out.push(Primitive::Polyline(
            data(
                format!("asphalt_edge_l__{}", seg.id),
                "asphalt_edge",
                shifted(-seg.left_asphalt_edge),
            )
            .for_segment(seg),
        ));
    }
    if flags.asphalt_obb {
        out.push(Primitive::Polygon(
            data(
                format!("asphalt_obb__{}", seg.id),
                "asphalt_obb",
                seg.obb.corners.clone(),
            )
            .for_segment(seg),
        ));
    }
}

/// Degenerate polygons are dropped from output, never emitted.
fn checked_polygon(pts: &[Pt2D], id: &str) -> Option<Vec<Pt2D>> {
    if pts.len() < 3 || polygon_area(pts) <= 1e-9 {
        warn!("Dropping degenerate polygon {}", id);
        return None;
    }
    Some(pts.to_vec())
}

fn data(id: String, kind: &str, points: Vec<Pt2D>) -> PrimitiveData {
    PrimitiveData {
        id,
        kind: kind.to_string(),
        road_id: None,
        segment_id: None,
        junction_id: None,
        connector_id: None,
        points,
    }
}

impl PrimitiveData {
    fn for_road(mut self, road_id: &str) -> PrimitiveData {
        self.road_id = Some(road_id.to_string());
        self
    }

    fn for_segment(mut self, seg: &Segment) -> PrimitiveData {
        self.road_id = Some(seg.road_id.clone());
        self.segment_id = Some(seg.id.clone());
        self
    }

    fn for_junction(mut self, junction_id: &str) -> PrimitiveData {
        self.junction_id = Some(junction_id.to_string());
        self
    }
}
