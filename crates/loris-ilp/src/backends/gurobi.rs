//! Gurobi backend: drives `gurobi_cl` over LP and `.sol` files.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;
use tracing::debug;

use crate::backends::lp_format;
use crate::problem::{IlpBackend, ProblemData, Solution, SolverStatus, VarId};
use crate::SolverError;

/// External Gurobi solver via its command-line runner.
///
/// Writes the model in LP format, invokes
/// `gurobi_cl ResultFile=model.sol model.lp`, and parses the `.sol` file
/// (`name value` rows, objective in a comment header).
#[derive(Debug)]
pub struct GurobiBackend {
    data: ProblemData,
    command: String,
}

impl GurobiBackend {
    pub fn new() -> Self {
        Self::with_command("gurobi_cl")
    }

    pub fn with_command(command: &str) -> Self {
        Self {
            data: ProblemData::default(),
            command: command.to_string(),
        }
    }
}

impl Default for GurobiBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl IlpBackend for GurobiBackend {
    fn add_var(&mut self, name: &str) -> VarId {
        self.data.add_var(name)
    }

    fn add_constraint(&mut self, name: &str, terms: &[(VarId, u64)], bound: u64) {
        self.data.add_constraint(name, terms, bound);
    }

    fn set_objective(&mut self, terms: &[(VarId, u64)]) {
        self.data.objective = terms.to_vec();
    }

    fn solve(&mut self) -> Result<Solution, SolverError> {
        let scratch = TempDir::new()
            .map_err(|e| SolverError::BackendFailure(format!("scratch dir: {e}")))?;
        let model_path = scratch.path().join("model.lp");
        let solution_path = scratch.path().join("model.sol");
        std::fs::write(&model_path, lp_format::render(&self.data))
            .map_err(|e| SolverError::BackendFailure(format!("write model: {e}")))?;

        let output = Command::new(&self.command)
            .arg(format!("ResultFile={}", solution_path.display()))
            .arg(&model_path)
            .output()
            .map_err(|e| SolverError::BackendFailure(format!("{}: {e}", self.command)))?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(%stdout, "gurobi_cl finished");

        if stdout.contains("Model is infeasible") {
            return Ok(Solution::without_assignment(
                SolverStatus::Infeasible,
                self.data.num_vars(),
            ));
        }
        if stdout.contains("unbounded") {
            return Ok(Solution::without_assignment(
                SolverStatus::Unbounded,
                self.data.num_vars(),
            ));
        }
        if stdout.contains("Time limit reached") {
            return Ok(Solution::without_assignment(
                SolverStatus::Timeout,
                self.data.num_vars(),
            ));
        }
        if !output.status.success() {
            return Err(SolverError::BackendFailure(format!(
                "{} exited with {}",
                self.command, output.status
            )));
        }

        parse_sol_file(&solution_path, &self.data)
    }

    fn reset(&mut self) {
        self.data = ProblemData::default();
    }
}

/// Parse a Gurobi `.sol` file: `#`-comments, then `name value` rows.
fn parse_sol_file(path: &Path, data: &ProblemData) -> Result<Solution, SolverError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| SolverError::BackendFailure(format!("read solution: {e}")))?;

    let mut values = vec![0u64; data.num_vars()];
    for line in text.lines() {
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(name), Some(value)) = (fields.next(), fields.next()) else {
            continue;
        };
        let value: f64 = value
            .parse()
            .map_err(|_| SolverError::BackendFailure(format!("bad solution row: {line}")))?;
        if let Some(var) = data.var_names.iter().position(|n| n == name) {
            values[var] = value.round() as u64;
        }
    }

    let objective = data
        .objective
        .iter()
        .map(|&(var, coeff)| coeff * values[var])
        .sum();
    Ok(Solution {
        status: SolverStatus::Optimal,
        objective,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn parses_a_sol_file() {
        let mut data = ProblemData::default();
        let x0 = data.add_var("x0");
        let x1 = data.add_var("x1");
        data.objective = vec![(x0, 1), (x1, 1)];

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.sol");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"# Objective value = 3\nx0 2\nx1 1\n").unwrap();

        let solution = parse_sol_file(&path, &data).unwrap();
        assert_eq!(solution.status, SolverStatus::Optimal);
        assert_eq!(solution.objective, 3);
        assert_eq!(solution.values, vec![2, 1]);
    }

    #[test]
    fn missing_executable_is_a_backend_failure() {
        let mut backend = GurobiBackend::with_command("gurobi-definitely-not-installed");
        let x0 = backend.add_var("x0");
        backend.add_constraint("c0", &[(x0, 1)], 5);
        backend.set_objective(&[(x0, 1)]);
        assert!(matches!(
            backend.solve(),
            Err(SolverError::BackendFailure(_))
        ));
    }
}
