use miette::IntoDiagnostic;

use loris_topo::generators::{assign_adversary_params, barabasi_albert_graph, layered_graph};

use crate::cli::GenerateKind;

pub(crate) fn run(kind: GenerateKind) -> miette::Result<()> {
    let spec = match kind {
        GenerateKind::Layered {
            layers,
            edge_prob,
            bandwidth_min,
            bandwidth_max,
            compromised,
            seed,
        } => {
            let mut spec = layered_graph(&layers, edge_prob, (bandwidth_min, bandwidth_max), seed);
            if compromised > 0 {
                spec.node_params =
                    assign_adversary_params(&spec, compromised, (0.05, 0.25), (0.1, 0.5), seed);
            }
            spec
        }
        GenerateKind::Ba {
            nodes,
            core,
            attach,
            bandwidth_min,
            bandwidth_max,
            compromised,
            seed,
        } => {
            let mut spec =
                barabasi_albert_graph(nodes, core, attach, (bandwidth_min, bandwidth_max), seed);
            if compromised > 0 {
                spec.node_params =
                    assign_adversary_params(&spec, compromised, (0.05, 0.25), (0.1, 0.5), seed);
            }
            spec
        }
    };

    println!("{}", serde_json::to_string_pretty(&spec).into_diagnostic()?);
    Ok(())
}
