//! Run-level errors.
//!
//! Constraint violations never appear here — conflicts, allow-set
//! breaches, and ordering issues are reported through the fitness score.
//! Only conditions that stop a run from producing a schedule are errors.

use std::error::Error;
use std::fmt;

use crate::capacity::CapacityDeficit;

/// Why a run produced no schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The cancellation token was set; partial results were discarded.
    Cancelled,
    /// Capacity preflight found deficits and the config promotes them
    /// to a hard failure.
    Infeasible(Vec<CapacityDeficit>),
    /// The run parameters are unusable.
    InvalidConfig(String),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "run cancelled"),
            Self::Infeasible(deficits) => write!(
                f,
                "infeasible: {} group type(s) short of capacity",
                deficits.len()
            ),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl Error for SolveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(SolveError::Cancelled.to_string(), "run cancelled");
        assert!(SolveError::InvalidConfig("population_size must be at least 2".into())
            .to_string()
            .contains("population_size"));

        let err = SolveError::Infeasible(vec![CapacityDeficit {
            group_type: 1,
            required: 2,
            capacity: 1,
            deficit: 1,
        }]);
        assert!(err.to_string().contains("1 group type"));
    }
}
