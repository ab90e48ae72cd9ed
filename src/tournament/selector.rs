//! Tournament execution and comparators.

use super::config::{TournamentConfig, TournamentStrategy};
use crate::candidate::{require_ranking, Candidate};
use crate::error::{Result, SelectionError};
use rand::Rng;
use std::cmp::Ordering;

/// Stochastic parent selection by tournaments.
///
/// All randomness comes from the caller's generator, so a seeded generator
/// reproduces the same winners.
///
/// # Usage
///
/// ```
/// use gepa_select::random::create_rng;
/// use gepa_select::{Candidate, CrowdingDistanceSelector, TournamentConfig, TournamentSelector};
///
/// let pop: Vec<Candidate> = (0..5)
///     .map(|i| {
///         Candidate::new(format!("c{i}"), "")
///             .with_normalized_objective("acc", i as f64 / 4.0)
///             .with_normalized_objective("lat", 1.0 - i as f64 / 4.0)
///     })
///     .collect();
/// let ranked = CrowdingDistanceSelector::environmental_selection(&pop, 5);
///
/// let mut rng = create_rng(42);
/// let config = TournamentConfig::new(10).with_tournament_size(2);
/// let parents = TournamentSelector::select(&ranked, &config, &mut rng).unwrap();
/// assert_eq!(parents.len(), 10);
/// ```
pub struct TournamentSelector;

impl TournamentSelector {
    /// Returns exactly `config.count` winners, sampled independently with
    /// replacement. `count` may exceed the population size.
    ///
    /// Fails on an empty population, `count == 0`, missing ranking metadata,
    /// or a tournament size outside `[2, population_size]`.
    pub fn select<R: Rng>(
        population: &[Candidate],
        config: &TournamentConfig,
        rng: &mut R,
    ) -> Result<Vec<Candidate>> {
        let indices = Self::select_indices(population, config, rng)?;
        Ok(indices.into_iter().map(|i| population[i].clone()).collect())
    }

    /// Like [`select`](Self::select), but returns population indices.
    pub fn select_indices<R: Rng>(
        population: &[Candidate],
        config: &TournamentConfig,
        rng: &mut R,
    ) -> Result<Vec<usize>> {
        if population.is_empty() {
            return Err(SelectionError::EmptyPopulation {
                operation: "tournament selection",
            });
        }
        if config.count == 0 {
            return Err(SelectionError::invalid("count", "must be at least 1"));
        }
        require_ranking(population)?;
        config.validate(population.len())?;

        let size = Self::effective_tournament_size(population, config);
        let comparator: fn(&Candidate, &Candidate) -> bool = match config.strategy {
            TournamentStrategy::Pareto | TournamentStrategy::Adaptive => Self::pareto_compare,
            TournamentStrategy::Diversity => Self::diversity_compare,
        };

        log::debug!(
            "tournament selection: {} winners, strategy {:?}, size {size}",
            config.count,
            config.strategy
        );

        (0..config.count)
            .map(|_| Self::run_tournament(population, size, comparator, &mut *rng))
            .collect()
    }

    /// Draws `tournament_size` distinct candidates uniformly at random and
    /// returns the index of the winner.
    ///
    /// `beats(a, b)` must be a strict comparison: `true` iff `a` beats `b`.
    /// The first drawn candidate is the initial holder and keeps the title
    /// unless a later draw strictly beats it.
    pub fn run_tournament<R, F>(
        population: &[Candidate],
        tournament_size: usize,
        beats: F,
        rng: &mut R,
    ) -> Result<usize>
    where
        R: Rng,
        F: Fn(&Candidate, &Candidate) -> bool,
    {
        if population.is_empty() {
            return Err(SelectionError::EmptyPopulation {
                operation: "tournament",
            });
        }
        if tournament_size == 0 || tournament_size > population.len() {
            return Err(SelectionError::invalid(
                "tournament_size",
                format!(
                    "must be within [1, {}], got {tournament_size}",
                    population.len()
                ),
            ));
        }

        let drawn = rand::seq::index::sample(rng, population.len(), tournament_size);
        let mut contestants = drawn.iter();
        let mut best_idx = contestants
            .next()
            .ok_or(SelectionError::EmptyPopulation {
                operation: "tournament",
            })?;
        for idx in contestants {
            if beats(&population[idx], &population[best_idx]) {
                best_idx = idx;
            }
        }
        Ok(best_idx)
    }

    /// Crowded-comparison operator: lower rank wins, larger crowding
    /// distance breaks rank ties.
    ///
    /// Absent rank is the worst possible rank; absent distance reads as 0.0.
    /// Two boundary members of the same rank neither beat each other.
    pub fn pareto_compare(a: &Candidate, b: &Candidate) -> bool {
        match rank_or_worst(a).cmp(&rank_or_worst(b)) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => {
                a.crowding_or_zero().diversity_cmp(&b.crowding_or_zero()) == Ordering::Greater
            }
        }
    }

    /// Larger crowding distance wins; lower rank breaks distance ties.
    pub fn diversity_compare(a: &Candidate, b: &Candidate) -> bool {
        match a.crowding_or_zero().diversity_cmp(&b.crowding_or_zero()) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => rank_or_worst(a) < rank_or_worst(b),
        }
    }

    /// Normalized spread of the finite crowding distances, in `[0, 1]`.
    ///
    /// Absent distances read as 0.0 and boundary members are excluded. With
    /// fewer than two finite values, or a zero mean, diversity is 0.0.
    /// Otherwise it is the coefficient of variation (population standard
    /// deviation over mean) clamped to `[0, 1]`.
    pub fn population_diversity(population: &[Candidate]) -> f64 {
        let finite: Vec<f64> = population
            .iter()
            .filter_map(|c| c.crowding_or_zero().finite_value())
            .collect();
        if finite.len() < 2 {
            return 0.0;
        }

        let n = finite.len() as f64;
        let mean = finite.iter().sum::<f64>() / n;
        if mean <= 0.0 {
            return 0.0;
        }
        let variance = finite.iter().map(|d| (d - mean) * (d - mean)).sum::<f64>() / n;
        (variance.sqrt() / mean).clamp(0.0, 1.0)
    }

    /// Tournament size used by `select` for this population.
    ///
    /// Fixed strategies return `tournament_size`. The adaptive strategy
    /// interpolates linearly:
    ///
    /// `min + round(clamp(diversity / threshold, 0, 1) * (max - min))`
    ///
    /// so a converged population (diversity 0) gets the smallest tournament
    /// and diversity at or above the threshold gets the largest. A zero
    /// threshold always yields `max`.
    pub fn effective_tournament_size(population: &[Candidate], config: &TournamentConfig) -> usize {
        match config.strategy {
            TournamentStrategy::Pareto | TournamentStrategy::Diversity => config.tournament_size,
            TournamentStrategy::Adaptive => {
                let (min, max) = (config.min_tournament_size, config.max_tournament_size);
                let diversity = Self::population_diversity(population);
                let ratio = if config.diversity_threshold > 0.0 {
                    (diversity / config.diversity_threshold).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                let span = max.saturating_sub(min) as f64;
                let size = min + (ratio * span).round() as usize;
                log::trace!("adaptive tournament: diversity {diversity:.4} -> size {size}");
                size.clamp(min, max.max(min))
            }
        }
    }
}

fn rank_or_worst(c: &Candidate) -> usize {
    c.pareto_rank.unwrap_or(usize::MAX)
}

// ============================================================================
// Tests
// ============================================================================
