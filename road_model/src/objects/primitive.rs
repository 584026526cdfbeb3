use geom::Pt2D;
use serde::{Deserialize, Serialize};

/// One renderable unit. The renderer groups these by `kind` and never sees
/// anything but flat point lists; all geometry decisions happen here.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Primitive {
    Polyline(PrimitiveData),
    Points(PrimitiveData),
    Polygon(PrimitiveData),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimitiveData {
    pub id: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub junction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_id: Option<String>,
    /// For polygons: counter-clockwise, at least 3 points, last not repeated.
    pub points: Vec<Pt2D>,
}

impl Primitive {
    pub fn data(&self) -> &PrimitiveData {
        match self {
            Primitive::Polyline(d) | Primitive::Points(d) | Primitive::Polygon(d) => d,
        }
    }

    pub fn id(&self) -> &str {
        &self.data().id
    }

    pub fn kind(&self) -> &str {
        &self.data().kind
    }
}
