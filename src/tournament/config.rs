//! Tournament selection configuration.

use crate::error::{Result, SelectionError};

/// Comparator deciding tournament winners.
///
/// # Examples
///
/// ```
/// use gepa_select::tournament::{TournamentConfig, TournamentStrategy};
///
/// // Fixed-size Pareto tournaments (default)
/// let config = TournamentConfig::new(10);
/// assert_eq!(config.strategy, TournamentStrategy::Pareto);
///
/// // Tournament size follows population diversity
/// let config = TournamentConfig::new(10)
///     .with_strategy(TournamentStrategy::Adaptive)
///     .with_tournament_size_bounds(2, 6);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TournamentStrategy {
    /// Lower Pareto rank wins; crowding distance breaks ties.
    #[default]
    Pareto,

    /// Larger crowding distance wins; Pareto rank breaks ties.
    Diversity,

    /// Pareto comparison with a tournament size interpolated from
    /// population diversity between `min_tournament_size` and
    /// `max_tournament_size`.
    Adaptive,
}

/// Configuration for [`TournamentSelector::select`](super::TournamentSelector::select).
///
/// # Selection pressure
///
/// Larger tournaments mean stronger pressure:
/// - 2: light pressure (good for diversity)
/// - 3–5: moderate pressure (typical default)
/// - >5: strong pressure (risk of premature convergence)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TournamentConfig {
    /// Number of winners to return.
    pub count: usize,

    /// Comparator strategy.
    pub strategy: TournamentStrategy,

    /// Candidates per tournament for the fixed strategies.
    pub tournament_size: usize,

    /// Smallest adaptive tournament (most converged population).
    pub min_tournament_size: usize,

    /// Largest adaptive tournament (most diverse population).
    pub max_tournament_size: usize,

    /// Diversity at or above which the adaptive size reaches its maximum.
    pub diversity_threshold: f64,
}

impl TournamentConfig {
    /// Creates a configuration returning `count` winners with defaults:
    /// Pareto strategy, tournament size 3, adaptive bounds 2..=5, diversity
    /// threshold 0.5.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            strategy: TournamentStrategy::default(),
            tournament_size: 3,
            min_tournament_size: 2,
            max_tournament_size: 5,
            diversity_threshold: 0.5,
        }
    }

    /// Sets the comparator strategy.
    pub fn with_strategy(mut self, strategy: TournamentStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the fixed tournament size.
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    /// Sets the adaptive tournament size bounds.
    pub fn with_tournament_size_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_tournament_size = min;
        self.max_tournament_size = max;
        self
    }

    /// Sets the adaptive diversity threshold.
    pub fn with_diversity_threshold(mut self, threshold: f64) -> Self {
        self.diversity_threshold = threshold;
        self
    }

    /// Validates the configuration against a population of `population_size`.
    pub fn validate(&self, population_size: usize) -> Result<()> {
        if self.count == 0 {
            return Err(SelectionError::invalid("count", "must be at least 1"));
        }
        match self.strategy {
            TournamentStrategy::Pareto | TournamentStrategy::Diversity => {
                if self.tournament_size < 2 || self.tournament_size > population_size {
                    return Err(SelectionError::invalid(
                        "tournament_size",
                        format!(
                            "must be within [2, {population_size}], got {}",
                            self.tournament_size
                        ),
                    ));
                }
            }
            TournamentStrategy::Adaptive => {
                if self.min_tournament_size < 2 {
                    return Err(SelectionError::invalid(
                        "min_tournament_size",
                        format!("must be at least 2, got {}", self.min_tournament_size),
                    ));
                }
                if self.min_tournament_size > self.max_tournament_size {
                    return Err(SelectionError::invalid(
                        "min_tournament_size",
                        format!(
                            "must not exceed max_tournament_size ({} > {})",
                            self.min_tournament_size, self.max_tournament_size
                        ),
                    ));
                }
                if self.max_tournament_size > population_size {
                    return Err(SelectionError::invalid(
                        "max_tournament_size",
                        format!(
                            "must not exceed population size ({} > {population_size})",
                            self.max_tournament_size
                        ),
                    ));
                }
                if !self.diversity_threshold.is_finite() || self.diversity_threshold < 0.0 {
                    return Err(SelectionError::invalid(
                        "diversity_threshold",
                        format!(
                            "must be a non-negative finite number, got {}",
                            self.diversity_threshold
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}
