//! Error types shared by every selection stage.
//!
//! Validation failures are reported eagerly at the top of each operation so
//! the generational loop controller can decide whether to re-run an earlier
//! stage (e.g. ranking) or abort the generation.

use std::fmt;

/// Ranking annotation that a stage expected but did not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingField {
    /// `pareto_rank`, written by non-dominated sorting.
    ParetoRank,
    /// `crowding_distance`, written by crowding-distance assignment.
    CrowdingDistance,
}

impl fmt::Display for RankingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankingField::ParetoRank => f.write_str("pareto_rank"),
            RankingField::CrowdingDistance => f.write_str("crowding_distance"),
        }
    }
}

/// Errors returned by selection operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectionError {
    /// The operation needs at least one candidate to produce a result.
    #[error("{operation}: population must not be empty")]
    EmptyPopulation {
        /// Name of the operation that rejected the input.
        operation: &'static str,
    },

    /// A configuration option that this operation requires was not set.
    #[error("missing required option `{option}`")]
    MissingOption {
        /// Name of the option.
        option: &'static str,
    },

    /// A configuration option is out of its valid range.
    #[error("invalid option `{option}`: {reason}")]
    InvalidOption {
        /// Name of the option.
        option: &'static str,
        /// Human-readable description of the violated constraint.
        reason: String,
    },

    /// A candidate lacks ranking metadata required by this stage.
    #[error("candidate `{candidate_id}` is missing {field}; run ranking first")]
    MissingRanking {
        /// Id of the first offending candidate.
        candidate_id: String,
        /// Which annotation is absent.
        field: RankingField,
    },
}

impl SelectionError {
    pub(crate) fn invalid(option: &'static str, reason: impl Into<String>) -> Self {
        SelectionError::InvalidOption {
            option,
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SelectionError>;
