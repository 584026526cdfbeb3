//! 2D geometry on the XZ ground plane, shared by the road pipeline and its
//! consumers. Everything here is plain data: no spatial indexes, no caching,
//! no rendering types.

#[macro_use]
extern crate log;

mod bounds;
mod line;
mod polygon;
mod pt;
mod tessellation;

pub use crate::bounds::Bounds;
pub use crate::line::Line;
pub use crate::polygon::{
    approx_dedupe, clip_to_convex, convex_hull, ensure_ccw, is_ccw, polygon_area, self_intersects,
    signed_area,
};
pub use crate::pt::{HashablePt2D, Pt2D, Vec2D};
pub use crate::tessellation::{Tessellation, Triangle};

/// Below this, two points or a segment length count as coincident.
pub const EPSILON_DIST: f64 = 1e-9;

/// Tolerance for "touching" comparisons that have to survive a chain of
/// floating point offsets: interval adjacency, shared polygon vertices.
pub const EPSILON_LOOSE: f64 = 1e-6;
