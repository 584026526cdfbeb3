//! Junction surfaces: resolve authored candidate sets to endpoints, join
//! facing pairs with tangent-arc-tangent fillets, fan-bound higher degrees,
//! and propose automatic junctions from endpoint proximity.

use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::{PI, TAU};

use ordered_float::NotNan;

use geom::{
    approx_dedupe, convex_hull, ensure_ccw, polygon_area, self_intersects, Pt2D, Vec2D,
    EPSILON_LOOSE,
};

use crate::ids;
use crate::objects::endpoint::Endpoint;
use crate::objects::junction::{
    Connector, Junction, JunctionSurface, SurfaceFallback, TatRecord,
};
use crate::settings::Settings;

/// Arcs are sampled at a fixed segment count regardless of radius.
const ARC_STEPS: usize = 8;
const MIN_SURFACE_AREA: f64 = 1e-6;
const MIN_FILLET_RADIUS: f64 = 1e-6;
const RADIUS_SEARCH_ITERATIONS: usize = 48;

pub fn build_junctions(endpoints: &[Endpoint], settings: &Settings) -> Vec<Junction> {
    if !settings.junctions.enabled {
        return Vec::new();
    }

    let by_id: BTreeMap<&str, &Endpoint> =
        endpoints.iter().map(|ep| (ep.id.as_str(), ep)).collect();
    // A corner candidate expands to the endpoints its cuts produced.
    let mut by_corner: BTreeMap<&str, Vec<&Endpoint>> = BTreeMap::new();
    for ep in endpoints {
        for source in &ep.source_ids {
            if source.starts_with("corner_") {
                by_corner.entry(source.as_str()).or_default().push(ep);
            }
        }
    }

    let mut junctions: Vec<Junction> = Vec::new();
    let mut seen_ids: BTreeSet<String> = BTreeSet::new();
    let mut claimed: BTreeSet<String> = BTreeSet::new();

    for mj in &settings.junctions.manual_junctions {
        if !seen_ids.insert(mj.id.clone()) {
            warn!("Duplicate junction id {}; keeping the first", mj.id);
            continue;
        }
        let mut resolved: BTreeMap<&str, &Endpoint> = BTreeMap::new();
        let mut missing: Vec<String> = Vec::new();
        for cid in &mj.candidate_ids {
            if let Some(ep) = by_id.get(cid.as_str()) {
                resolved.insert(ep.id.as_str(), *ep);
            } else if let Some(eps) = by_corner.get(cid.as_str()) {
                for ep in eps {
                    resolved.insert(ep.id.as_str(), *ep);
                }
            } else {
                missing.push(cid.clone());
            }
        }
        for id in resolved.keys() {
            claimed.insert((*id).to_string());
        }
        junctions.push(assemble(
            mj.id.clone(),
            false,
            mj.asphalt_visible,
            mj.candidate_ids.clone(),
            &resolved,
            missing,
            settings,
        ));
    }

    // Automatic proposals: cluster the leftover endpoints by proximity.
    let unclaimed: Vec<&Endpoint> = {
        let mut eps: Vec<&Endpoint> = endpoints
            .iter()
            .filter(|ep| !claimed.contains(&ep.id))
            .collect();
        eps.sort_by(|a, b| a.id.cmp(&b.id));
        eps
    };
    for cluster in cluster_endpoints(&unclaimed) {
        if cluster.len() < 2 {
            continue;
        }
        let candidate_ids: Vec<String> = cluster.iter().map(|ep| ep.id.clone()).collect();
        let id = ids::junction_id(&candidate_ids);
        if settings.junctions.suppressed_auto_junction_ids.contains(&id)
            || !seen_ids.insert(id.clone())
        {
            continue;
        }
        let resolved: BTreeMap<&str, &Endpoint> =
            cluster.iter().map(|ep| (ep.id.as_str(), *ep)).collect();
        junctions.push(assemble(
            id,
            true,
            true,
            candidate_ids,
            &resolved,
            Vec::new(),
            settings,
        ));
    }

    junctions.sort_by(|a, b| a.id.cmp(&b.id));
    junctions
}

fn assemble(
    id: String,
    auto: bool,
    asphalt_visible: bool,
    candidate_ids: Vec<String>,
    resolved: &BTreeMap<&str, &Endpoint>,
    missing_candidate_ids: Vec<String>,
    settings: &Settings,
) -> Junction {
    let eps: Vec<&Endpoint> = resolved.values().copied().collect();
    let endpoint_ids: Vec<String> = eps.iter().map(|ep| ep.id.clone()).collect();

    let (surface, tat) = match eps.len() {
        2 => two_endpoint_surface(&id, eps[0], eps[1]),
        n if n >= 3 => (fan_surface(&eps), Vec::new()),
        _ => (None, Vec::new()),
    };
    if surface.is_none() && eps.len() >= 2 {
        warn!("Junction {} has no buildable surface", id);
    }

    Junction {
        id,
        auto,
        asphalt_visible,
        candidate_ids,
        endpoint_ids,
        missing_candidate_ids,
        surface,
        tat,
        connectors: build_connectors(&eps, settings),
    }
}

/// The common case: two road ends facing each other. Pair up their edge
/// points, fillet each pair, and close outer-forward + inner-reverse.
fn two_endpoint_surface(
    junction_id: &str,
    e1: &Endpoint,
    e2: &Endpoint,
) -> (Option<JunctionSurface>, Vec<TatRecord>) {
    let direct = e1.left_edge.dist_to(e2.right_edge) + e1.right_edge.dist_to(e2.left_edge);
    let swapped = e1.left_edge.dist_to(e2.left_edge) + e1.right_edge.dist_to(e2.right_edge);
    let pairs = if direct <= swapped {
        [(e1.left_edge, e2.right_edge), (e1.right_edge, e2.left_edge)]
    } else {
        [(e1.left_edge, e2.left_edge), (e1.right_edge, e2.right_edge)]
    };

    let mut tats: Vec<TatRecord> = pairs
        .iter()
        .map(|(a, b)| build_tat(*a, e1.dir_out, *b, e2.dir_out))
        .collect();
    // The longer chord is the outer side of the surface.
    if tats[1].chord > tats[0].chord {
        tats.swap(0, 1);
    }
    tats[0].id = format!("tat_{}__outer", junction_id);
    tats[1].id = format!("tat_{}__inner", junction_id);

    let mut pts = tats[0].points.clone();
    pts.extend(tats[1].points.iter().rev().copied());
    let quad = vec![
        tats[0].a_edge,
        tats[0].b_edge,
        tats[1].b_edge,
        tats[1].a_edge,
    ];
    (finish_surface(pts, quad), tats)
}

/// Degree 3+: no per-pair fillets, just the edge points in angular order
/// around the junction.
fn fan_surface(eps: &[&Endpoint]) -> Option<JunctionSurface> {
    let mut ordered: Vec<&Endpoint> = eps.to_vec();
    ordered.sort_by_key(|ep| {
        // Outward from the junction is the opposite of the endpoint's own
        // outward direction.
        (
            NotNan::new((-ep.dir_out).angle()).unwrap(),
            ep.id.clone(),
        )
    });
    let mut pts: Vec<Pt2D> = Vec::new();
    for ep in ordered {
        // Walking counter-clockwise, each arm's right edge comes first.
        pts.push(ep.right_edge);
        pts.push(ep.left_edge);
    }
    let fallback = pts.clone();
    finish_surface(pts, fallback)
}

/// Fallback chain: the candidate ring, else a ring of the fallback points,
/// else their convex hull.
fn finish_surface(best: Vec<Pt2D>, fallback: Vec<Pt2D>) -> Option<JunctionSurface> {
    for (pts, kind) in [
        (best, SurfaceFallback::None),
        (fallback.clone(), SurfaceFallback::Quad),
        (convex_hull(fallback), SurfaceFallback::ConvexHull),
    ] {
        let ring = ensure_ccw(approx_dedupe(pts, EPSILON_LOOSE));
        if ring.len() >= 3 && polygon_area(&ring) > MIN_SURFACE_AREA && !self_intersects(&ring) {
            let area = polygon_area(&ring);
            return Some(JunctionSurface {
                points: ring,
                area,
                fallback: kind,
            });
        }
    }
    None
}

/// Joins two inward rays with the widest circular fillet whose tangent points
/// stay forward of both edge points. Converges to radius 0 (a straight
/// segment) when no arc fits.
fn build_tat(a_edge: Pt2D, a_dir: Vec2D, b_edge: Pt2D, b_dir: Vec2D) -> TatRecord {
    let chord = a_edge.dist_to(b_edge);
    let straight = || TatRecord {
        id: String::new(),
        a_edge,
        b_edge,
        radius: 0.0,
        chord,
        points: vec![a_edge, b_edge],
    };

    let denom = a_dir.cross(b_dir);
    if denom.abs() <= 1e-9 {
        // Parallel rays never meet; connect directly.
        return straight();
    }
    let w = b_edge - a_edge;
    let t1 = w.cross(b_dir) / denom;
    let t2 = w.cross(a_dir) / denom;
    if t1 <= 0.0 || t2 <= 0.0 {
        // The rays' intersection lies behind an edge point.
        return straight();
    }

    let hinge = a_edge + a_dir * t1;
    let phi = a_dir.dot(b_dir).clamp(-1.0, 1.0).acos();
    let half_tan = (phi / 2.0).tan();
    if half_tan <= 1e-9 {
        return straight();
    }

    // Tangent distance back from the hinge grows with radius; search for the
    // widest radius both rays can accommodate.
    let feasible = |r: f64| r / half_tan <= t1.min(t2);
    let mut lo = 0.0;
    let mut hi = t1.min(t2) * half_tan + 1.0;
    for _ in 0..RADIUS_SEARCH_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if feasible(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let radius = lo;
    if radius <= MIN_FILLET_RADIUS {
        return straight();
    }

    let tangent_dist = radius / half_tan;
    let tangent_a = a_edge + a_dir * (t1 - tangent_dist);
    let tangent_b = b_edge + b_dir * (t2 - tangent_dist);
    let bisector = match ((-a_dir) + (-b_dir)).normalized() {
        Some(b) => b,
        None => return straight(),
    };
    let center = hinge + bisector * (radius / (phi / 2.0).sin());

    let start = (tangent_a - center).angle();
    let end = (tangent_b - center).angle();
    // The fillet subtends PI - phi, so the shorter sweep is always the arc we
    // want.
    let mut sweep = end - start;
    while sweep > PI {
        sweep -= TAU;
    }
    while sweep < -PI {
        sweep += TAU;
    }

    let mut points = vec![a_edge, tangent_a];
    for step in 1..ARC_STEPS {
        let ang = start + sweep * (step as f64) / (ARC_STEPS as f64);
        points.push(center + Vec2D::new(ang.cos(), ang.sin()) * radius);
    }
    points.push(tangent_b);
    points.push(b_edge);
    let mut points = approx_dedupe(points, 1e-9);
    if points.len() < 2 {
        points = vec![a_edge, b_edge];
    }

    TatRecord {
        id: String::new(),
        a_edge,
        b_edge,
        radius,
        chord,
        points,
    }
}

fn build_connectors(eps: &[&Endpoint], settings: &Settings) -> Vec<Connector> {
    let mut connectors: Vec<Connector> = Vec::new();
    for i in 0..eps.len() {
        for j in (i + 1)..eps.len() {
            let (a, b) = (eps[i], eps[j]);
            let id = ids::connector_id(&a.id, &b.id);
            connectors.push(Connector {
                a_endpoint_id: a.id.clone(),
                b_endpoint_id: b.id.clone(),
                distance: a.world.dist_to(b.world),
                same_road: a.road_id == b.road_id,
                merged_into_road: settings.junctions.merged_connector_ids.contains(&id),
                id,
            });
        }
    }
    connectors
}

/// Union-find over endpoint pairs within each other's connect radii. Cluster
/// order follows the (sorted) input order of their first member.
fn cluster_endpoints<'a>(eps: &[&'a Endpoint]) -> Vec<Vec<&'a Endpoint>> {
    let mut parent: Vec<usize> = (0..eps.len()).collect();

    fn find(parent: &mut Vec<usize>, mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for i in 0..eps.len() {
        for j in (i + 1)..eps.len() {
            let reach = eps[i].connect_radius + eps[j].connect_radius;
            if eps[i].world.dist_to(eps[j].world) <= reach {
                let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                if ri != rj {
                    parent[rj.max(ri)] = rj.min(ri);
                }
            }
        }
    }

    let mut clusters: BTreeMap<usize, Vec<&Endpoint>> = BTreeMap::new();
    for i in 0..eps.len() {
        let root = find(&mut parent, i);
        clusters.entry(root).or_default().push(eps[i]);
    }
    clusters.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(id: &str, road: &str, world: Pt2D, dir_out: Vec2D, half_width: f64) -> Endpoint {
        let right_out = dir_out.right();
        Endpoint {
            id: id.to_string(),
            segment_id: format!("seg_{}", id),
            road_id: road.to_string(),
            world,
            dir_out,
            right_out,
            left_edge: world - right_out * half_width,
            right_edge: world + right_out * half_width,
            connect_radius: half_width,
            source_ids: Vec::new(),
        }
    }

    fn settings_with_manual(candidates: Vec<String>) -> Settings {
        let mut raw = crate::raw::RawSettings::default();
        raw.junctions.manual_junctions.push(crate::raw::RawManualJunction {
            id: Some("j1".to_string()),
            candidate_ids: candidates,
            asphalt_visible: None,
        });
        Settings::resolve(&raw)
    }

    #[test]
    fn facing_pair_builds_quad_surface_and_one_connector() {
        let e1 = endpoint("ep_a", "r1", Pt2D::new(0.0, 0.0), Vec2D::new(1.0, 0.0), 4.0);
        let e2 = endpoint("ep_b", "r2", Pt2D::new(10.0, 0.0), Vec2D::new(-1.0, 0.0), 4.0);
        let settings =
            settings_with_manual(vec!["ep_a".to_string(), "ep_b".to_string()]);
        let junctions = build_junctions(&[e1, e2], &settings);

        assert_eq!(junctions.len(), 1);
        let j = &junctions[0];
        assert_eq!(j.id, "j1");
        assert_eq!(j.endpoint_ids.len(), 2);
        assert!(j.missing_candidate_ids.is_empty());
        assert_eq!(j.tat.len(), 2);
        // Anti-parallel rays can't fit an arc; both fillets degrade straight.
        assert_eq!(j.tat[0].radius, 0.0);
        assert_eq!(j.tat[1].radius, 0.0);
        let surface = j.surface.as_ref().unwrap();
        assert!(surface.points.len() >= 3);
        assert!((surface.area - 80.0).abs() < 1e-6);
        assert_eq!(j.connectors.len(), 1);
        assert!(!j.connectors[0].same_road);
    }

    #[test]
    fn angled_pair_gets_a_real_fillet() {
        // Two ends meeting at a right angle: rays (1,0) from the west and
        // (0,1) from the south cross ahead of both edge points.
        let e1 = endpoint("ep_a", "r1", Pt2D::new(0.0, 0.0), Vec2D::new(1.0, 0.0), 2.0);
        let e2 = endpoint("ep_b", "r2", Pt2D::new(10.0, -10.0), Vec2D::new(0.0, 1.0), 2.0);
        let settings =
            settings_with_manual(vec!["ep_a".to_string(), "ep_b".to_string()]);
        let junctions = build_junctions(&[e1, e2], &settings);
        let j = &junctions[0];
        assert_eq!(j.tat.len(), 2);
        assert!(j.tat.iter().any(|tat| tat.radius > 0.0));
        for tat in &j.tat {
            if tat.radius > 0.0 {
                assert!(tat.points.len() > 2);
            }
        }
        assert!(j.surface.is_some());
    }

    #[test]
    fn missing_candidates_are_reported_not_fatal() {
        let e1 = endpoint("ep_a", "r1", Pt2D::new(0.0, 0.0), Vec2D::new(1.0, 0.0), 4.0);
        let e2 = endpoint("ep_b", "r2", Pt2D::new(10.0, 0.0), Vec2D::new(-1.0, 0.0), 4.0);
        let settings = settings_with_manual(vec![
            "ep_a".to_string(),
            "ep_b".to_string(),
            "ep_ghost".to_string(),
        ]);
        let junctions = build_junctions(&[e1, e2], &settings);
        let j = &junctions[0];
        assert_eq!(j.missing_candidate_ids, vec!["ep_ghost".to_string()]);
        assert!(j.surface.is_some());
    }

    #[test]
    fn three_endpoints_use_the_fan_boundary() {
        let eps = vec![
            endpoint("ep_e", "r1", Pt2D::new(10.0, 0.0), Vec2D::new(-1.0, 0.0), 3.0),
            endpoint("ep_n", "r2", Pt2D::new(0.0, 10.0), Vec2D::new(0.0, -1.0), 3.0),
            endpoint("ep_w", "r3", Pt2D::new(-10.0, 0.0), Vec2D::new(1.0, 0.0), 3.0),
        ];
        let settings = settings_with_manual(vec![
            "ep_e".to_string(),
            "ep_n".to_string(),
            "ep_w".to_string(),
        ]);
        let junctions = build_junctions(&eps, &settings);
        let j = &junctions[0];
        assert!(j.tat.is_empty());
        let surface = j.surface.as_ref().unwrap();
        assert!(surface.points.len() >= 6);
        assert!(surface.area > 0.0);
        assert_eq!(j.connectors.len(), 3);
    }

    #[test]
    fn auto_junction_appears_and_can_be_suppressed() {
        let e1 = endpoint("ep_a", "r1", Pt2D::new(0.0, 0.0), Vec2D::new(1.0, 0.0), 4.0);
        let e2 = endpoint("ep_b", "r2", Pt2D::new(6.0, 0.0), Vec2D::new(-1.0, 0.0), 4.0);
        let settings = Settings::resolve(&crate::raw::RawSettings::default());
        let junctions = build_junctions(&[e1.clone(), e2.clone()], &settings);
        assert_eq!(junctions.len(), 1);
        let j = &junctions[0];
        assert!(j.auto);
        assert!(j.id.starts_with("junc_"));
        assert_eq!(j.endpoint_ids.len(), 2);

        let mut raw = crate::raw::RawSettings::default();
        raw.junctions.suppressed_auto_junction_ids.push(j.id.clone());
        let settings = Settings::resolve(&raw);
        assert!(build_junctions(&[e1, e2], &settings).is_empty());
    }

    #[test]
    fn distant_endpoints_do_not_cluster() {
        let e1 = endpoint("ep_a", "r1", Pt2D::new(0.0, 0.0), Vec2D::new(1.0, 0.0), 2.0);
        let e2 = endpoint("ep_b", "r2", Pt2D::new(50.0, 0.0), Vec2D::new(-1.0, 0.0), 2.0);
        let settings = Settings::resolve(&crate::raw::RawSettings::default());
        assert!(build_junctions(&[e1, e2], &settings).is_empty());
    }
}
