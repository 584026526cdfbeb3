use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::EPSILON_DIST;

/// A point in world space on the XZ ground plane, in meters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pt2D {
    pub x: f64,
    pub z: f64,
}

impl Pt2D {
    pub fn new(x: f64, z: f64) -> Pt2D {
        Pt2D { x, z }
    }

    pub fn dist_to(self, other: Pt2D) -> f64 {
        (other - self).length()
    }

    pub fn offset(self, dx: f64, dz: f64) -> Pt2D {
        Pt2D::new(self.x + dx, self.z + dz)
    }

    pub fn approx_eq(self, other: Pt2D, threshold: f64) -> bool {
        self.dist_to(other) <= threshold
    }

    /// The average of a non-empty point list.
    pub fn center(pts: &[Pt2D]) -> Pt2D {
        let n = pts.len() as f64;
        let (sx, sz) = pts
            .iter()
            .fold((0.0, 0.0), |(sx, sz), pt| (sx + pt.x, sz + pt.z));
        Pt2D::new(sx / n, sz / n)
    }

    pub fn to_hashable(self) -> HashablePt2D {
        HashablePt2D::new(self.x, self.z)
    }
}

impl fmt::Display for Pt2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pt2D({}, {})", self.x, self.z)
    }
}

impl Sub for Pt2D {
    type Output = Vec2D;

    fn sub(self, other: Pt2D) -> Vec2D {
        Vec2D::new(self.x - other.x, self.z - other.z)
    }
}

impl Add<Vec2D> for Pt2D {
    type Output = Pt2D;

    fn add(self, v: Vec2D) -> Pt2D {
        Pt2D::new(self.x + v.x, self.z + v.z)
    }
}

impl Sub<Vec2D> for Pt2D {
    type Output = Pt2D;

    fn sub(self, v: Vec2D) -> Pt2D {
        Pt2D::new(self.x - v.x, self.z - v.z)
    }
}

/// A displacement on the XZ plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vec2D {
    pub x: f64,
    pub z: f64,
}

impl Vec2D {
    pub const ZERO: Vec2D = Vec2D { x: 0.0, z: 0.0 };

    pub fn new(x: f64, z: f64) -> Vec2D {
        Vec2D { x, z }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    /// None when the vector is too short to carry a direction.
    pub fn normalized(self) -> Option<Vec2D> {
        let len = self.length();
        if len <= EPSILON_DIST {
            return None;
        }
        Some(Vec2D::new(self.x / len, self.z / len))
    }

    pub fn dot(self, other: Vec2D) -> f64 {
        self.x * other.x + self.z * other.z
    }

    /// The scalar cross product; positive when `other` points to the
    /// counter-clockwise side of `self`.
    pub fn cross(self, other: Vec2D) -> f64 {
        self.x * other.z - self.z * other.x
    }

    /// Rotated 90 degrees counter-clockwise. For a road direction, this points
    /// toward the forward-lane side.
    pub fn right(self) -> Vec2D {
        Vec2D::new(-self.z, self.x)
    }

    pub fn angle(self) -> f64 {
        self.z.atan2(self.x)
    }
}

impl Neg for Vec2D {
    type Output = Vec2D;

    fn neg(self) -> Vec2D {
        Vec2D::new(-self.x, -self.z)
    }
}

impl Mul<f64> for Vec2D {
    type Output = Vec2D;

    fn mul(self, scale: f64) -> Vec2D {
        Vec2D::new(self.x * scale, self.z * scale)
    }
}

impl Add for Vec2D {
    type Output = Vec2D;

    fn add(self, other: Vec2D) -> Vec2D {
        Vec2D::new(self.x + other.x, self.z + other.z)
    }
}

// This isn't opinionated about what the (x, z) represents -- just a point
// that can live in a map or set.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct HashablePt2D {
    x_nan: NotNan<f64>,
    z_nan: NotNan<f64>,
}

impl HashablePt2D {
    pub fn new(x: f64, z: f64) -> HashablePt2D {
        HashablePt2D {
            x_nan: NotNan::new(x).unwrap(),
            z_nan: NotNan::new(z).unwrap(),
        }
    }

    pub fn to_pt2d(self) -> Pt2D {
        Pt2D::new(self.x_nan.into_inner(), self.z_nan.into_inner())
    }
}
