//! A deterministic geometry-resolution pipeline for road networks. Roads come
//! in as polylines anchored to a tile grid with sub-tile offsets; out comes a
//! renderer-independent model: per-segment centerlines and lane/asphalt
//! edges, trimmed pavement pieces, junction surfaces with curved fillets, and
//! flat primitives a renderer can triangulate into meshes.
//!
//! The whole pipeline is one pure function, [`build_network`]: no shared
//! state between calls, no I/O, and identical input always produces
//! byte-identical output.

#[macro_use]
extern crate log;

mod ids;
mod make;
mod mesh;
mod objects;
mod raw;
mod settings;

pub use crate::ids::fnv1a_32;
pub use crate::make::build_network;
pub use crate::mesh::{triangulate_polygons, MeshData};
pub use crate::objects::endpoint::Endpoint;
pub use crate::objects::junction::{
    Connector, Corner, Junction, JunctionCandidates, JunctionSurface, SurfaceFallback, TatRecord,
};
pub use crate::objects::network::RoadNetwork;
pub use crate::objects::primitive::{Primitive, PrimitiveData};
pub use crate::objects::road::{Road, RoadPoint};
pub use crate::objects::segment::{AsphaltObb, Segment};
pub use crate::objects::trim::{Overlap, Piece, SegmentTrim, TrimInterval, TrimOutput};
pub use crate::raw::{
    RawFlags, RawJunctionDebug, RawJunctions, RawManualJunction, RawNetwork, RawOrigin, RawRoad,
    RawRoadPoint, RawSettings, RawTrim, RawTrimDebug,
};
pub use crate::settings::{
    Flags, JunctionDebug, JunctionSettings, ManualJunction, Settings, TrimDebug, TrimSettings,
    WorldOrigin,
};
