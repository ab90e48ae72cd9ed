//! Elite selection configuration.

use crate::error::{Result, SelectionError};

/// Configuration shared by the [`EliteSelector`](super::EliteSelector)
/// operations.
///
/// `elite_count`, when set, takes precedence over `elite_ratio`. The
/// count-mode operations (`select_elites_preserve_frontier`,
/// `select_diverse_elites`) require it.
///
/// `elite_count = Some(0)` is rejected by [`validate`](Self::validate) in
/// every mode with [`SelectionError::InvalidOption`]; it is never raised to
/// `min_elites`. Leave `elite_count` unset to size by ratio instead.
///
/// # Defaults
///
/// ```
/// use gepa_select::elite::EliteConfig;
///
/// let config = EliteConfig::default();
/// assert_eq!(config.elite_ratio, 0.15);
/// assert_eq!(config.elite_count, None);
/// assert_eq!(config.min_elites, 1);
/// assert_eq!(config.similarity_threshold, 0.01);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use gepa_select::elite::EliteConfig;
///
/// let config = EliteConfig::default()
///     .with_elite_count(10)
///     .with_similarity_threshold(0.05);
/// assert_eq!(config.elite_count, Some(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EliteConfig {
    /// Fraction of the population kept as elites (0.0–1.0) when
    /// `elite_count` is not set.
    pub elite_ratio: f64,

    /// Exact number of elites.
    pub elite_count: Option<usize>,

    /// Lower bound on the number of elites taken by `select_elites`, applied
    /// to either the ratio-derived or the explicit count.
    pub min_elites: usize,

    /// Minimum objective-space distance between two diverse elites.
    pub similarity_threshold: f64,
}

impl Default for EliteConfig {
    fn default() -> Self {
        Self {
            elite_ratio: 0.15,
            elite_count: None,
            min_elites: 1,
            similarity_threshold: 0.01,
        }
    }
}

impl EliteConfig {
    /// Sets the elite ratio, clamped to `[0, 1]`.
    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets an exact elite count.
    pub fn with_elite_count(mut self, count: usize) -> Self {
        self.elite_count = Some(count);
        self
    }

    /// Sets the minimum number of elites.
    pub fn with_min_elites(mut self, min: usize) -> Self {
        self.min_elites = min;
        self
    }

    /// Sets the near-duplicate distance threshold (negative becomes 0).
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold.max(0.0);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.elite_ratio) {
            return Err(SelectionError::invalid(
                "elite_ratio",
                format!("must be within [0, 1], got {}", self.elite_ratio),
            ));
        }
        if self.elite_count == Some(0) {
            return Err(SelectionError::invalid("elite_count", "must be at least 1"));
        }
        if !self.similarity_threshold.is_finite() || self.similarity_threshold < 0.0 {
            return Err(SelectionError::invalid(
                "similarity_threshold",
                format!(
                    "must be a non-negative finite number, got {}",
                    self.similarity_threshold
                ),
            ));
        }
        Ok(())
    }

    /// Returns `elite_count` or [`SelectionError::MissingOption`].
    pub fn require_elite_count(&self) -> Result<usize> {
        self.elite_count
            .ok_or(SelectionError::MissingOption {
                option: "elite_count",
            })
    }

    /// Number of elites to take from a population of `population_size`:
    /// `max(min_elites, elite_count or round(population_size * elite_ratio))`,
    /// capped at `population_size`.
    pub fn desired_count(&self, population_size: usize) -> usize {
        let base = self
            .elite_count
            .unwrap_or_else(|| (population_size as f64 * self.elite_ratio).round() as usize);
        base.max(self.min_elites).min(population_size)
    }
}
