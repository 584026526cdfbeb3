//! Helpers over plain vertex lists. A polygon here is an open ring: the last
//! point is NOT repeated, and well-formed output is counter-clockwise under
//! the shoelace convention.

use crate::{Line, Pt2D, EPSILON_LOOSE};

/// Shoelace area; positive for counter-clockwise rings.
pub fn signed_area(pts: &[Pt2D]) -> f64 {
    if pts.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..pts.len() {
        let a = pts[i];
        let b = pts[(i + 1) % pts.len()];
        sum += a.x * b.z - b.x * a.z;
    }
    sum / 2.0
}

pub fn polygon_area(pts: &[Pt2D]) -> f64 {
    signed_area(pts).abs()
}

pub fn is_ccw(pts: &[Pt2D]) -> bool {
    signed_area(pts) > 0.0
}

/// Reverses the ring if it winds clockwise.
pub fn ensure_ccw(mut pts: Vec<Pt2D>) -> Vec<Pt2D> {
    if signed_area(&pts) < 0.0 {
        pts.reverse();
    }
    pts
}

/// Collapses runs of near-coincident adjacent points, including the wrap from
/// last back to first.
pub fn approx_dedupe(pts: Vec<Pt2D>, threshold: f64) -> Vec<Pt2D> {
    let mut result: Vec<Pt2D> = Vec::new();
    for pt in pts {
        if result.last().map(|last| last.approx_eq(pt, threshold)) != Some(true) {
            result.push(pt);
        }
    }
    while result.len() >= 2 && result[0].approx_eq(*result.last().unwrap(), threshold) {
        result.pop();
    }
    result
}

/// Andrew's monotone chain. Returns the hull counter-clockwise, collinear
/// points dropped.
pub fn convex_hull(mut pts: Vec<Pt2D>) -> Vec<Pt2D> {
    pts.sort_by_key(|pt| pt.to_hashable());
    pts.dedup_by(|a, b| a.approx_eq(*b, EPSILON_LOOSE));
    if pts.len() < 3 {
        return pts;
    }

    let turns_right = |o: Pt2D, a: Pt2D, b: Pt2D| (a - o).cross(b - o) <= 0.0;

    let mut lower: Vec<Pt2D> = Vec::new();
    for pt in &pts {
        while lower.len() >= 2 && turns_right(lower[lower.len() - 2], lower[lower.len() - 1], *pt)
        {
            lower.pop();
        }
        lower.push(*pt);
    }
    let mut upper: Vec<Pt2D> = Vec::new();
    for pt in pts.iter().rev() {
        while upper.len() >= 2 && turns_right(upper[upper.len() - 2], upper[upper.len() - 1], *pt)
        {
            upper.pop();
        }
        upper.push(*pt);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Sutherland-Hodgman: clips `subject` against a convex, counter-clockwise
/// `clip` ring. The result can be empty.
pub fn clip_to_convex(subject: &[Pt2D], clip: &[Pt2D]) -> Vec<Pt2D> {
    let mut output: Vec<Pt2D> = subject.to_vec();
    for i in 0..clip.len() {
        if output.is_empty() {
            break;
        }
        let a = clip[i];
        let b = clip[(i + 1) % clip.len()];
        let edge = b - a;
        let inside = |pt: Pt2D| edge.cross(pt - a) >= 0.0;

        let input = std::mem::take(&mut output);
        for j in 0..input.len() {
            let cur = input[j];
            let next = input[(j + 1) % input.len()];
            let cur_in = inside(cur);
            let next_in = inside(next);
            if cur_in {
                output.push(cur);
            }
            if cur_in != next_in {
                // The edge from cur to next crosses the clip line.
                let d = next - cur;
                let denom = edge.cross(d);
                if denom.abs() > f64::EPSILON {
                    let t = edge.cross(a - cur) / denom;
                    output.push(cur + d * t.clamp(0.0, 1.0));
                }
            }
        }
    }
    output
}

/// Whether any two non-adjacent edges cross at a point that isn't just a
/// shared vertex (within tolerance).
pub fn self_intersects(pts: &[Pt2D]) -> bool {
    let n = pts.len();
    if n < 4 {
        return false;
    }
    for i in 0..n {
        let e1 = Line::new(pts[i], pts[(i + 1) % n]);
        for j in (i + 1)..n {
            // Skip the edge itself and both neighbors.
            if j == i || j == (i + 1) % n || (j + 1) % n == i {
                continue;
            }
            let e2 = Line::new(pts[j], pts[(j + 1) % n]);
            if let Some(hit) = e1.intersection(&e2) {
                let near_vertex = [e1.pt1(), e1.pt2(), e2.pt1(), e2.pt2()]
                    .iter()
                    .any(|v| v.approx_eq(hit, EPSILON_LOOSE));
                if !near_vertex {
                    return true;
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Pt2D> {
        vec![
            Pt2D::new(0.0, 0.0),
            Pt2D::new(2.0, 0.0),
            Pt2D::new(2.0, 2.0),
            Pt2D::new(0.0, 2.0),
        ]
    }

    #[test]
    fn shoelace_orientation() {
        assert!(is_ccw(&square()));
        let mut cw = square();
        cw.reverse();
        assert!(!is_ccw(&cw));
        assert_eq!(signed_area(&square()), 4.0);
    }

    #[test]
    fn clip_overlapping_squares() {
        let a = square();
        let b: Vec<Pt2D> = square()
            .into_iter()
            .map(|pt| pt.offset(1.0, 1.0))
            .collect();
        let clipped = clip_to_convex(&a, &b);
        assert!((polygon_area(&clipped) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn clip_disjoint_squares() {
        let a = square();
        let b: Vec<Pt2D> = square()
            .into_iter()
            .map(|pt| pt.offset(5.0, 5.0))
            .collect();
        assert!(clip_to_convex(&a, &b).is_empty());
    }

    #[test]
    fn hull_of_noisy_square() {
        let mut pts = square();
        pts.push(Pt2D::new(1.0, 1.0));
        let hull = convex_hull(pts);
        assert_eq!(hull.len(), 4);
        assert!(is_ccw(&hull));
    }

    #[test]
    fn bowtie_self_intersects() {
        let bowtie = vec![
            Pt2D::new(0.0, 0.0),
            Pt2D::new(2.0, 2.0),
            Pt2D::new(2.0, 0.0),
            Pt2D::new(0.0, 2.0),
        ];
        assert!(self_intersects(&bowtie));
        assert!(!self_intersects(&square()));
    }
}
