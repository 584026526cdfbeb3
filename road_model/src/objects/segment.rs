use geom::{Bounds, Pt2D, Vec2D};
use serde::{Deserialize, Serialize};

/// One edge of a road: a straight run between two consecutive road points,
/// with its lane/asphalt offsets and the paved footprint.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    pub road_id: String,
    pub a_point_id: String,
    pub b_point_id: String,
    pub a: Pt2D,
    pub b: Pt2D,
    /// Unit direction from a to b.
    pub dir: Vec2D,
    /// Unit normal, `dir` rotated 90 degrees; points toward the forward-lane
    /// side.
    pub right: Vec2D,
    pub length: f64,
    pub lanes_f: u32,
    pub lanes_b: u32,
    pub right_lane_edge: f64,
    pub left_lane_edge: f64,
    pub right_asphalt_edge: f64,
    pub left_asphalt_edge: f64,
    pub obb: AsphaltObb,
}

impl Segment {
    /// World position at parameter t along [0, 1].
    pub fn pt_at(&self, t: f64) -> Pt2D {
        self.a + self.dir * (t * self.length)
    }

    /// The paved rectangle between two parameters, counter-clockwise.
    pub fn piece_corners(&self, t0: f64, t1: f64) -> Vec<Pt2D> {
        let a = self.pt_at(t0);
        let b = self.pt_at(t1);
        let left = self.right * self.left_asphalt_edge;
        let right = self.right * self.right_asphalt_edge;
        vec![a - left, b - left, b + right, a + right]
    }
}

/// The oriented rectangular footprint of paved surface for one segment,
/// before trimming.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsphaltObb {
    pub center: Pt2D,
    /// Unit vector along the segment.
    pub axis: Vec2D,
    pub half_length: f64,
    pub half_width_left: f64,
    pub half_width_right: f64,
    /// Counter-clockwise.
    pub corners: Vec<Pt2D>,
    pub aabb: Bounds,
}

impl AsphaltObb {
    pub fn new(
        a: Pt2D,
        b: Pt2D,
        axis: Vec2D,
        half_width_left: f64,
        half_width_right: f64,
    ) -> AsphaltObb {
        let half_length = a.dist_to(b) / 2.0;
        let center = Pt2D::new((a.x + b.x) / 2.0, (a.z + b.z) / 2.0);
        let corners = strip_corners(center, axis, half_length, half_width_left, half_width_right);
        let aabb = Bounds::from_pts(&corners);
        AsphaltObb {
            center,
            axis,
            half_length,
            half_width_left,
            half_width_right,
            corners,
            aabb,
        }
    }

    /// The footprint grown by `pad` in every direction; the overlap-test
    /// strip. Counter-clockwise.
    pub fn expanded(&self, pad: f64) -> Vec<Pt2D> {
        strip_corners(
            self.center,
            self.axis,
            self.half_length + pad,
            self.half_width_left + pad,
            self.half_width_right + pad,
        )
    }
}

fn strip_corners(
    center: Pt2D,
    axis: Vec2D,
    half_length: f64,
    half_width_left: f64,
    half_width_right: f64,
) -> Vec<Pt2D> {
    let along = axis * half_length;
    let left = axis.right() * half_width_left;
    let right = axis.right() * half_width_right;
    vec![
        center - along - left,
        center + along - left,
        center + along + right,
        center - along + right,
    ]
}
