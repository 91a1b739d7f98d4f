//! CBC backend: drives the `cbc` executable over LP and solution files.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;
use tracing::debug;

use crate::backends::lp_format;
use crate::problem::{IlpBackend, ProblemData, Solution, SolverStatus, VarId};
use crate::SolverError;

/// External COIN-OR CBC solver.
///
/// Writes the model in LP format to a scratch directory, invokes
/// `cbc model.lp solve solution solution.txt`, and parses the solution file
/// back. The executable name is overridable for non-standard installs.
#[derive(Debug)]
pub struct CbcBackend {
    data: ProblemData,
    command: String,
}

impl CbcBackend {
    pub fn new() -> Self {
        Self::with_command("cbc")
    }

    pub fn with_command(command: &str) -> Self {
        Self {
            data: ProblemData::default(),
            command: command.to_string(),
        }
    }
}

impl Default for CbcBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl IlpBackend for CbcBackend {
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
        let solution_path = scratch.path().join("solution.txt");
        std::fs::write(&model_path, lp_format::render(&self.data))
            .map_err(|e| SolverError::BackendFailure(format!("write model: {e}")))?;

        let output = Command::new(&self.command)
            .arg(&model_path)
            .arg("solve")
            .arg("solution")
            .arg(&solution_path)
            .output()
            .map_err(|e| SolverError::BackendFailure(format!("{}: {e}", self.command)))?;
        if !output.status.success() {
            return Err(SolverError::BackendFailure(format!(
                "{} exited with {}",
                self.command, output.status
            )));
        }

        parse_solution(&solution_path, &self.data)
    }

    fn reset(&mut self) {
        self.data = ProblemData::default();
    }
}

/// Parse CBC's solution file.
///
/// The first line carries the status and objective
/// (`Optimal - objective value 3.00000000`); the remaining lines are
/// `index name value reduced-cost` rows for the nonzero variables.
fn parse_solution(path: &Path, data: &ProblemData) -> Result<Solution, SolverError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| SolverError::BackendFailure(format!("read solution: {e}")))?;
    let mut lines = text.lines();
    let header = lines
        .next()
        .ok_or_else(|| SolverError::BackendFailure("empty solution file".into()))?;
    debug!(header, "cbc finished");

    let lowered = header.to_ascii_lowercase();
    if lowered.contains("infeasible") {
        return Ok(Solution::without_assignment(
            SolverStatus::Infeasible,
            data.num_vars(),
        ));
    }
    if lowered.contains("unbounded") {
        return Ok(Solution::without_assignment(
            SolverStatus::Unbounded,
            data.num_vars(),
        ));
    }
    if lowered.contains("stopped") {
        return Ok(Solution::without_assignment(
            SolverStatus::Timeout,
            data.num_vars(),
        ));
    }
    if !lowered.starts_with("optimal") {
        return Err(SolverError::BackendFailure(format!(
            "unrecognised cbc status line: {header}"
        )));
    }

    let mut values = vec![0u64; data.num_vars()];
    for line in lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        // index, name, value, reduced cost
        if fields.len() < 3 {
            continue;
        }
        let name = fields[1];
        let value: f64 = fields[2]
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
    use std::path::PathBuf;

    fn toy_data() -> ProblemData {
        let mut data = ProblemData::default();
        let x0 = data.add_var("x0");
        let x1 = data.add_var("x1");
        data.add_constraint("c0", &[(x0, 3), (x1, 1)], 10);
        data.objective = vec![(x0, 1), (x1, 1)];
        data
    }

    fn write_solution(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("solution.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn parses_an_optimal_solution() {
        let (_dir, path) = write_solution(
            "Optimal - objective value 10.00000000\n\
             0 x0 0 0\n\
             1 x1 10 0\n",
        );
        let solution = parse_solution(&path, &toy_data()).unwrap();
        assert_eq!(solution.status, SolverStatus::Optimal);
        assert_eq!(solution.objective, 10);
        assert_eq!(solution.values, vec![0, 10]);
    }

    #[test]
    fn parses_an_infeasible_header() {
        let (_dir, path) = write_solution("Infeasible - objective value 0\n");
        let solution = parse_solution(&path, &toy_data()).unwrap();
        assert_eq!(solution.status, SolverStatus::Infeasible);
    }

    #[test]
    fn rejects_garbage_headers() {
        let (_dir, path) = write_solution("something unexpected\n");
        assert!(matches!(
            parse_solution(&path, &toy_data()),
            Err(SolverError::BackendFailure(_))
        ));
    }

    #[test]
    fn missing_executable_is_a_backend_failure() {
        let mut backend = CbcBackend::with_command("cbc-definitely-not-installed");
        let x0 = backend.add_var("x0");
        backend.add_constraint("c0", &[(x0, 1)], 5);
        backend.set_objective(&[(x0, 1)]);
        assert!(matches!(
            backend.solve(),
            Err(SolverError::BackendFailure(_))
        ));
    }
}
