//! Runs the road pipeline without any UI: read a raw network as JSON, build,
//! write the result as JSON. The authoring and rendering collaborators use
//! this for golden-file inspection and for driving the pipeline from other
//! processes.

#[macro_use]
extern crate log;

use anyhow::{Context, Result};
use serde::Serialize;
use structopt::StructOpt;

use road_model::{build_network, triangulate_polygons, MeshData, RawNetwork, RoadNetwork};

#[derive(StructOpt)]
#[structopt(name = "headless", about = "Build road network geometry from JSON")]
enum Command {
    /// Reads a raw network JSON file, runs the pipeline, writes the built
    /// network as JSON
    Build {
        /// The path to a raw network JSON file
        #[structopt()]
        input: String,
        /// Where to write the built network; stdout when omitted
        #[structopt(long)]
        out: Option<String>,
        /// Also triangulate every polygon primitive and include the meshes
        #[structopt(long)]
        meshes: bool,
        /// Pretty-print the output
        #[structopt(long)]
        pretty: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildOutput {
    #[serde(flatten)]
    network: RoadNetwork,
    #[serde(skip_serializing_if = "Option::is_none")]
    meshes: Option<Vec<MeshData>>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Command::from_args() {
        Command::Build {
            input,
            out,
            meshes,
            pretty,
        } => build(input, out, meshes, pretty),
    }
}

fn build(input: String, out: Option<String>, meshes: bool, pretty: bool) -> Result<()> {
    let raw = std::fs::read_to_string(&input).with_context(|| format!("reading {}", input))?;
    let raw: RawNetwork =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", input))?;

    let network = build_network(&raw);
    info!(
        "Built {} segments, {} primitives, {} junctions",
        network.segments.len(),
        network.primitives.len(),
        network.junctions.len()
    );

    let output = BuildOutput {
        meshes: if meshes {
            Some(triangulate_polygons(&network.primitives))
        } else {
            None
        },
        network,
    };
    let json = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };

    match out {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("writing {}", path))?;
            info!("Wrote {}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
