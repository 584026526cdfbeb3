//! Triangulation of emitted polygons into vertex/index buffers. The renderer
//! collaborator consumes these; nothing here touches a graphics API.

use geom::{Pt2D, Tessellation};
use serde::{Deserialize, Serialize};

use crate::objects::primitive::Primitive;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshData {
    pub primitive_id: String,
    pub vertices: Vec<Pt2D>,
    /// Groups of three make up the triangles.
    pub indices: Vec<u16>,
}

/// One mesh per polygon primitive; polylines and point sets pass through
/// untriangulated. Degenerate polygons are silently skipped.
pub fn triangulate_polygons(primitives: &[Primitive]) -> Vec<MeshData> {
    primitives
        .iter()
        .filter_map(|prim| match prim {
            Primitive::Polygon(data) => Tessellation::from_points(&data.points).map(|tess| {
                let (vertices, indices) = tess.consume();
                MeshData {
                    primitive_id: data.id.clone(),
                    vertices,
                    indices,
                }
            }),
            _ => None,
        })
        .collect()
}
