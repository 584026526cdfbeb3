use serde::{Deserialize, Serialize};

use crate::{approx_dedupe, ensure_ccw, Bounds, Pt2D, EPSILON_LOOSE};

/// A triangulated polygon, ready for a renderer to turn into a mesh. Groups
/// of three indices make up the triangles.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tessellation {
    points: Vec<Pt2D>,
    indices: Vec<u16>,
}

#[derive(Clone, Debug)]
pub struct Triangle {
    pub pt1: Pt2D,
    pub pt2: Pt2D,
    pub pt3: Pt2D,
}

impl Tessellation {
    /// Ear-clipping triangulation. Cleans the ring first (near-duplicate
    /// adjacent points removed, orientation normalized to counter-clockwise).
    /// None when fewer than 3 distinct points survive cleaning.
    pub fn from_points(orig_pts: &[Pt2D]) -> Option<Tessellation> {
        let points = ensure_ccw(approx_dedupe(orig_pts.to_vec(), EPSILON_LOOSE));
        if points.len() < 3 {
            debug!("Skipping degenerate polygon with {} points", points.len());
            return None;
        }
        let indices = downsize(ear_clip(&points));
        Some(Tessellation { points, indices })
    }

    /// Returns (points, indices) for rendering.
    pub fn consume(self) -> (Vec<Pt2D>, Vec<u16>) {
        (self.points, self.indices)
    }

    pub fn points(&self) -> &Vec<Pt2D> {
        &self.points
    }

    pub fn indices(&self) -> &Vec<u16> {
        &self.indices
    }

    pub fn triangles(&self) -> Vec<Triangle> {
        let mut triangles: Vec<Triangle> = Vec::new();
        for slice in self.indices.chunks_exact(3) {
            triangles.push(Triangle {
                pt1: self.points[slice[0] as usize],
                pt2: self.points[slice[1] as usize],
                pt3: self.points[slice[2] as usize],
            });
        }
        triangles
    }

    pub fn get_bounds(&self) -> Bounds {
        Bounds::from_pts(&self.points)
    }
}

/// The input ring must be counter-clockwise. Always emits exactly
/// `pts.len() - 2` triangles; when no ear can be found (residual numerical
/// noise, collinear runs), the remainder is fanned from its first vertex.
fn ear_clip(pts: &[Pt2D]) -> Vec<usize> {
    let mut remaining: Vec<usize> = (0..pts.len()).collect();
    let mut indices: Vec<usize> = Vec::new();

    while remaining.len() > 3 {
        let mut clipped = false;
        for i in 0..remaining.len() {
            let prev = remaining[(i + remaining.len() - 1) % remaining.len()];
            let cur = remaining[i];
            let next = remaining[(i + 1) % remaining.len()];
            if !is_convex(pts[prev], pts[cur], pts[next]) {
                continue;
            }
            if remaining.iter().any(|&j| {
                j != prev
                    && j != cur
                    && j != next
                    && pt_in_triangle(pts[j], pts[prev], pts[cur], pts[next])
            }) {
                continue;
            }
            indices.extend([prev, cur, next]);
            remaining.remove(i);
            clipped = true;
            break;
        }
        if !clipped {
            warn!(
                "Ear clipping stalled with {} vertices left; falling back to a fan",
                remaining.len()
            );
            for w in remaining.windows(2).skip(1) {
                indices.extend([remaining[0], w[0], w[1]]);
            }
            return indices;
        }
    }
    indices.extend(remaining);
    indices
}

fn is_convex(prev: Pt2D, cur: Pt2D, next: Pt2D) -> bool {
    (cur - prev).cross(next - cur) > f64::EPSILON
}

fn pt_in_triangle(pt: Pt2D, a: Pt2D, b: Pt2D, c: Pt2D) -> bool {
    let s1 = (b - a).cross(pt - a);
    let s2 = (c - b).cross(pt - b);
    let s3 = (a - c).cross(pt - c);
    // Boundary counts as inside: a vertex exactly on the candidate ear's edge
    // must block the clip, or the diagonal cuts through it.
    s1 >= -1e-12 && s2 >= -1e-12 && s3 >= -1e-12
}

fn downsize(input: Vec<usize>) -> Vec<u16> {
    let mut output = Vec::new();
    for x in input {
        if let Ok(x) = u16::try_from(x) {
            output.push(x);
        } else {
            panic!("{} can't fit in u16, some polygon is too huge", x);
        }
    }
    output
}
