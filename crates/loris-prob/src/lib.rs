pub mod binomial;
pub mod threshold;

pub use binomial::{binomial_pmf, sum_pmf, Pmf, DEFAULT_RENORM_EPSILON};
pub use threshold::{tail_ge, tail_ge_log, tail_lt, threshold_interval, ThresholdInterval};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ProbError {
    #[error("share counts and probabilities differ in length: {counts} vs {probs}")]
    LengthMismatch { counts: usize, probs: usize },
    #[error("probability out of range: {0}")]
    InvalidProbability(f64),
}
