use serde::{Deserialize, Serialize};

use crate::objects::junction::{Junction, JunctionCandidates};
use crate::objects::primitive::Primitive;
use crate::objects::road::Road;
use crate::objects::segment::Segment;
use crate::objects::trim::TrimOutput;
use crate::settings::Settings;

/// The complete output snapshot of one pipeline invocation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadNetwork {
    pub settings: Settings,
    pub roads: Vec<Road>,
    pub segments: Vec<Segment>,
    pub primitives: Vec<Primitive>,
    pub trim: TrimOutput,
    pub junctions: Vec<Junction>,
    pub junction_candidates: JunctionCandidates,
}
