use serde::{Deserialize, Serialize};

use crate::Pt2D;

/// An axis-aligned bounding box on the XZ plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_z: f64,
}

impl Bounds {
    pub fn new() -> Bounds {
        Bounds {
            min_x: f64::MAX,
            min_z: f64::MAX,
            max_x: f64::MIN,
            max_z: f64::MIN,
        }
    }

    pub fn from_pts(pts: &[Pt2D]) -> Bounds {
        let mut b = Bounds::new();
        for pt in pts {
            b.update(*pt);
        }
        b
    }

    pub fn update(&mut self, pt: Pt2D) {
        self.min_x = self.min_x.min(pt.x);
        self.max_x = self.max_x.max(pt.x);
        self.min_z = self.min_z.min(pt.z);
        self.max_z = self.max_z.max(pt.z);
    }

    pub fn union(&mut self, other: Bounds) {
        self.update(Pt2D::new(other.min_x, other.min_z));
        self.update(Pt2D::new(other.max_x, other.max_z));
    }

    pub fn contains(&self, pt: Pt2D) -> bool {
        pt.x >= self.min_x && pt.x <= self.max_x && pt.z >= self.min_z && pt.z <= self.max_z
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_z <= other.max_z
            && self.max_z >= other.min_z
    }

    pub fn expanded(&self, pad: f64) -> Bounds {
        Bounds {
            min_x: self.min_x - pad,
            min_z: self.min_z - pad,
            max_x: self.max_x + pad,
            max_z: self.max_z + pad,
        }
    }

    pub fn center(&self) -> Pt2D {
        Pt2D::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_z + self.max_z) / 2.0,
        )
    }
}

impl Default for Bounds {
    fn default() -> Bounds {
        Bounds::new()
    }
}
