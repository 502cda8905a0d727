use crate::config::Config;
use crate::ir::Diagram;
use crate::routing::{WireRoute, route_all};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Serializable snapshot of every routable wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDump {
    pub shape_count: usize,
    pub wire_count: usize,
    /// Wires left out because an endpoint didn't resolve.
    pub skipped: Vec<String>,
    pub routes: Vec<WireRoute>,
}

impl RouteDump {
    pub fn from_diagram(diagram: &Diagram, config: &Config) -> Self {
        let routes = route_all(diagram, config);
        let skipped = diagram
            .wires
            .iter()
            .filter(|wire| !routes.iter().any(|route| route.wire_id == wire.id))
            .map(|wire| wire.id.clone())
            .collect();
        Self {
            shape_count: diagram.shapes.len(),
            wire_count: diagram.wires.len(),
            skipped,
            routes,
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn write_route_dump(path: &Path, diagram: &Diagram, config: &Config) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = RouteDump::from_diagram(diagram, config);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
