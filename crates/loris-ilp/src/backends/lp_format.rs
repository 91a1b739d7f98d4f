//! CPLEX LP-format serialisation shared by the external-process backends.

use std::fmt::Write as _;

use crate::problem::ProblemData;

/// Render the accumulated problem as an LP-format model. All variables are
/// non-negative integers; both CBC and Gurobi read this dialect.
pub(crate) fn render(data: &ProblemData) -> String {
    let mut out = String::new();
    out.push_str("\\ secrecy throughput maximisation\n");
    out.push_str("Maximize\n obj:");
    if data.objective.is_empty() {
        // LP format wants a non-empty objective row
        out.push_str(" 0 x_dummy");
    }
    for (i, &(var, coeff)) in data.objective.iter().enumerate() {
        let name = &data.var_names[var];
        if i > 0 {
            out.push_str(" +");
        }
        if coeff == 1 {
            let _ = write!(out, " {name}");
        } else {
            let _ = write!(out, " {coeff} {name}");
        }
    }
    out.push_str("\nSubject To\n");
    for constraint in &data.constraints {
        let _ = write!(out, " {}:", constraint.name);
        for (i, &(var, coeff)) in constraint.terms.iter().enumerate() {
            let name = &data.var_names[var];
            if i > 0 {
                out.push_str(" +");
            }
            if coeff == 1 {
                let _ = write!(out, " {name}");
            } else {
                let _ = write!(out, " {coeff} {name}");
            }
        }
        let _ = writeln!(out, " <= {}", constraint.bound);
    }
    out.push_str("General\n");
    for name in &data.var_names {
        let _ = writeln!(out, " {name}");
    }
    out.push_str("End\n");
    out
}
