pub(crate) mod analyze;
pub(crate) mod generate;
pub(crate) mod optimize;
pub(crate) mod simulate;

use std::path::Path;

use miette::{Context, IntoDiagnostic};

use loris_topo::{Topology, TopologySpec};

/// Load and build a topology from a JSON record on disk.
pub(crate) fn load_topology(path: &Path) -> miette::Result<Topology> {
    let text = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {}", path.display()))?;
    let spec: TopologySpec = serde_json::from_str(&text)
        .into_diagnostic()
        .wrap_err_with(|| format!("parsing {}", path.display()))?;
    Topology::build(spec).into_diagnostic()
}
