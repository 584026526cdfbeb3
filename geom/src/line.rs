use crate::{Pt2D, EPSILON_DIST};

/// A line segment.
#[derive(Clone, Copy, Debug)]
pub struct Line(pub Pt2D, pub Pt2D);

impl Line {
    pub fn new(pt1: Pt2D, pt2: Pt2D) -> Line {
        Line(pt1, pt2)
    }

    pub fn pt1(&self) -> Pt2D {
        self.0
    }

    pub fn pt2(&self) -> Pt2D {
        self.1
    }

    pub fn length(&self) -> f64 {
        self.0.dist_to(self.1)
    }

    /// Where the two segments cross, if they do. Parallel and near-parallel
    /// segments never intersect, even when collinear and overlapping.
    pub fn intersection(&self, other: &Line) -> Option<Pt2D> {
        let d1 = self.1 - self.0;
        let d2 = other.1 - other.0;
        let denom = d1.cross(d2);
        if denom.abs() <= EPSILON_DIST {
            return None;
        }
        let w = other.0 - self.0;
        let t = w.cross(d2) / denom;
        let u = w.cross(d1) / denom;
        if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
            return None;
        }
        Some(self.0 + d1 * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_segments() {
        let a = Line::new(Pt2D::new(0.0, 0.0), Pt2D::new(2.0, 2.0));
        let b = Line::new(Pt2D::new(0.0, 2.0), Pt2D::new(2.0, 0.0));
        let hit = a.intersection(&b).unwrap();
        assert!(hit.approx_eq(Pt2D::new(1.0, 1.0), 1e-9));
    }

    #[test]
    fn disjoint_segments() {
        let a = Line::new(Pt2D::new(0.0, 0.0), Pt2D::new(1.0, 0.0));
        let b = Line::new(Pt2D::new(0.0, 1.0), Pt2D::new(1.0, 1.0));
        assert!(a.intersection(&b).is_none());
    }
}
