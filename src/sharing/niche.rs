//! Niche counting and shared-fitness computation.

use super::config::{AdaptiveSharingConfig, DiversityMetric, NicheRadiusStrategy, SharingConfig};
use crate::candidate::{
    euclidean_distance, mean_pairwise_distance, objective_distance, objective_keys, Candidate,
};
use crate::error::Result;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of [`FitnessSharing::adaptive_apply_sharing`].
///
/// Both variants carry the population and the diversity score that decided
/// the outcome, so callers can log it either way.
#[derive(Debug, Clone, PartialEq)]
pub enum SharingOutcome {
    /// Diversity was below the threshold; fitness has been shared.
    Applied {
        /// Population with shared fitness.
        population: Vec<Candidate>,
        /// Diversity score that triggered sharing.
        diversity: f64,
    },

    /// Diversity was sufficient; the population is returned unchanged.
    Skipped {
        /// Unmodified copy of the input population.
        population: Vec<Candidate>,
        /// Diversity score that suppressed sharing.
        diversity: f64,
    },
}

impl SharingOutcome {
    /// Returns `true` if sharing was applied.
    pub fn was_applied(&self) -> bool {
        matches!(self, SharingOutcome::Applied { .. })
    }

    /// Diversity score measured before deciding.
    pub fn diversity(&self) -> f64 {
        match self {
            SharingOutcome::Applied { diversity, .. } | SharingOutcome::Skipped { diversity, .. } => {
                *diversity
            }
        }
    }

    /// Borrowed view of the resulting population.
    pub fn population(&self) -> &[Candidate] {
        match self {
            SharingOutcome::Applied { population, .. }
            | SharingOutcome::Skipped { population, .. } => population,
        }
    }

    /// Consumes the outcome, returning the population.
    pub fn into_population(self) -> Vec<Candidate> {
        match self {
            SharingOutcome::Applied { population, .. }
            | SharingOutcome::Skipped { population, .. } => population,
        }
    }
}

/// Niche-based fitness sharing over normalized-objective space.
///
/// # Usage
///
/// ```
/// use gepa_select::{Candidate, FitnessSharing, SharingConfig};
///
/// let twins: Vec<Candidate> = ["a", "b"]
///     .iter()
///     .map(|id| {
///         Candidate::new(*id, "")
///             .with_fitness(10.0)
///             .with_normalized_objective("acc", 0.5)
///             .with_normalized_objective("lat", 0.5)
///     })
///     .collect();
///
/// let shared = FitnessSharing::apply_sharing(&twins, &SharingConfig::default()).unwrap();
/// assert_eq!(shared[0].fitness, Some(5.0));
/// assert_eq!(shared[0].metadata.raw_fitness, Some(10.0));
/// assert_eq!(shared[0].metadata.niche_count, Some(2.0));
/// ```
pub struct FitnessSharing;

impl FitnessSharing {
    /// Sharing function `sh(d) = max(0, 1 - (d / radius)^alpha)`.
    pub fn sharing_function(distance: f64, niche_radius: f64, sharing_alpha: f64) -> f64 {
        if distance >= niche_radius {
            return 0.0;
        }
        (1.0 - (distance / niche_radius).powf(sharing_alpha)).max(0.0)
    }

    /// Niche count of `candidate` within `population`.
    ///
    /// The candidate contributes exactly 1.0 for itself; every other member
    /// (any member with a different id) contributes `sh(d)`. The result is
    /// therefore at least 1.0, whether or not `candidate` is part of
    /// `population`.
    pub fn niche_count(
        candidate: &Candidate,
        population: &[Candidate],
        config: &SharingConfig,
    ) -> Result<f64> {
        config.validate()?;
        let neighbours: f64 = population
            .iter()
            .filter(|other| other.id != candidate.id)
            .map(|other| {
                Self::sharing_function(
                    objective_distance(candidate, other),
                    config.niche_radius,
                    config.sharing_alpha,
                )
            })
            .sum();
        Ok(1.0 + neighbours)
    }

    /// Divides each candidate's fitness by its niche count.
    ///
    /// Absent fitness reads as 0.0. With `preserve_raw_fitness`, the pre-sharing
    /// fitness and the niche count are recorded in `metadata`.
    pub fn apply_sharing(population: &[Candidate], config: &SharingConfig) -> Result<Vec<Candidate>> {
        config.validate()?;

        let counts = niche_counts(population, config);
        let shared: Vec<Candidate> = population
            .iter()
            .zip(&counts)
            .map(|(c, &count)| {
                let raw = c.fitness_or_zero();
                let mut out = c.clone().with_fitness(raw / count);
                if config.preserve_raw_fitness {
                    out.metadata.raw_fitness = Some(raw);
                    out.metadata.niche_count = Some(count);
                }
                log::trace!("sharing: {} raw={raw} niche={count}", c.id);
                out
            })
            .collect();

        log::debug!(
            "fitness sharing applied to {} candidates (radius {}, alpha {})",
            population.len(),
            config.niche_radius,
            config.sharing_alpha
        );
        Ok(shared)
    }

    /// Derives a niche radius from the population.
    ///
    /// # Example
    ///
    /// ```
    /// use gepa_select::{Candidate, FitnessSharing, NicheRadiusStrategy};
    ///
    /// let pop: Vec<Candidate> = (0..25).map(|i| Candidate::new(format!("c{i}"), "")).collect();
    /// let radius = FitnessSharing::calculate_niche_radius(
    ///     &pop,
    ///     &NicheRadiusStrategy::PopulationBased { base_radius: 1.0 },
    /// )
    /// .unwrap();
    /// assert!((radius - 0.2).abs() < 1e-12);
    /// ```
    pub fn calculate_niche_radius(
        population: &[Candidate],
        strategy: &NicheRadiusStrategy,
    ) -> Result<f64> {
        strategy.validate()?;
        let radius = match *strategy {
            NicheRadiusStrategy::Fixed { radius } => radius,
            NicheRadiusStrategy::PopulationBased { base_radius } => {
                base_radius / (population.len().max(1) as f64).sqrt()
            }
            NicheRadiusStrategy::ObjectiveRange { fraction } => {
                let m = objective_keys(population).len().max(1);
                fraction * (m as f64).sqrt()
            }
            NicheRadiusStrategy::Adaptive { floor, scale } => {
                (mean_pairwise_distance(population) * scale).max(floor)
            }
        };
        log::debug!("niche radius {radius:.4} from {strategy:?}");
        Ok(radius)
    }

    /// Diversity of `population` under `metric`.
    ///
    /// - [`DiversityMetric::Crowding`]: mean of the finite crowding distances
    ///   (absent reads as 0.0, boundary members are excluded); 0.0 when none
    ///   are finite.
    /// - [`DiversityMetric::PairwiseDistance`]: mean pairwise distance divided
    ///   by `sqrt(objective_count)`, clamped to `[0, 1]`.
    pub fn population_diversity(population: &[Candidate], metric: DiversityMetric) -> f64 {
        match metric {
            DiversityMetric::Crowding => {
                let finite: Vec<f64> = population
                    .iter()
                    .filter_map(|c| c.crowding_or_zero().finite_value())
                    .collect();
                if finite.is_empty() {
                    0.0
                } else {
                    finite.iter().sum::<f64>() / finite.len() as f64
                }
            }
            DiversityMetric::PairwiseDistance => {
                let m = objective_keys(population).len();
                if m == 0 {
                    return 0.0;
                }
                (mean_pairwise_distance(population) / (m as f64).sqrt()).clamp(0.0, 1.0)
            }
        }
    }

    /// Applies sharing only when diversity is below the threshold.
    ///
    /// Returns [`SharingOutcome::Skipped`] with an unchanged copy of the
    /// population otherwise.
    pub fn adaptive_apply_sharing(
        population: &[Candidate],
        config: &AdaptiveSharingConfig,
    ) -> Result<SharingOutcome> {
        config.validate()?;

        let diversity = Self::population_diversity(population, config.diversity_metric);
        if diversity < config.diversity_threshold {
            log::debug!(
                "adaptive sharing: diversity {diversity:.4} < {:.4}, applying",
                config.diversity_threshold
            );
            Ok(SharingOutcome::Applied {
                population: Self::apply_sharing(population, &config.sharing)?,
                diversity,
            })
        } else {
            log::debug!(
                "adaptive sharing: diversity {diversity:.4} >= {:.4}, skipped",
                config.diversity_threshold
            );
            Ok(SharingOutcome::Skipped {
                population: population.to_vec(),
                diversity,
            })
        }
    }
}

/// Niche count for every member, excluding each member's own index.
///
/// Each count is independent; with the `parallel` feature they are computed
/// with rayon and collected in index order.
fn niche_counts(population: &[Candidate], config: &SharingConfig) -> Vec<f64> {
    let keys = objective_keys(population);
    let vectors: Vec<Vec<f64>> = population.iter().map(|c| c.objective_vector(&keys)).collect();

    let count = |i: usize| {
        let neighbours: f64 = vectors
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, v)| {
                let d = euclidean_distance(&vectors[i], v);
                FitnessSharing::sharing_function(d, config.niche_radius, config.sharing_alpha)
            })
            .sum();
        1.0 + neighbours
    };

    #[cfg(feature = "parallel")]
    {
        (0..population.len()).into_par_iter().map(count).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..population.len()).map(count).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CrowdingDistance;
    use crate::error::SelectionError;

    fn point(id: &str, acc: f64, lat: f64) -> Candidate {
        Candidate::new(id, "p")
            .with_normalized_objective("acc", acc)
            .with_normalized_objective("lat", lat)
    }

    // ---- Sharing function ----

    #[test]
    fn test_sharing_function_shape() {
        assert_eq!(FitnessSharing::sharing_function(0.0, 0.1, 1.0), 1.0);
        assert!((FitnessSharing::sharing_function(0.05, 0.1, 1.0) - 0.5).abs() < 1e-12);
        assert!((FitnessSharing::sharing_function(0.05, 0.1, 2.0) - 0.75).abs() < 1e-12);
        assert_eq!(FitnessSharing::sharing_function(0.1, 0.1, 1.0), 0.0);
        assert_eq!(FitnessSharing::sharing_function(3.0, 0.1, 1.0), 0.0);
    }

    // ---- Niche count ----

    #[test]
    fn test_niche_count_single_member() {
        let a = point("a", 0.3, 0.3);
        let count = FitnessSharing::niche_count(&a, &[a.clone()], &SharingConfig::default()).unwrap();
        assert_eq!(count, 1.0);
    }

    #[test]
    fn test_niche_count_outside_population() {
        let a = point("a", 0.3, 0.3);
        let others = vec![point("far", 0.9, 0.9)];
        let count = FitnessSharing::niche_count(&a, &others, &SharingConfig::default()).unwrap();
        assert_eq!(count, 1.0);
    }

    #[test]
    fn test_niche_count_identical_points() {
        let pop: Vec<Candidate> = (0..5).map(|i| point(&format!("c{i}"), 0.4, 0.6)).collect();
        let count =
            FitnessSharing::niche_count(&pop[2], &pop, &SharingConfig::default()).unwrap();
        assert!((count - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_niche_count_partial_overlap() {
        let a = point("a", 0.5, 0.5);
        let b = point("b", 0.55, 0.5); // d = 0.05, sh = 0.5
        let count =
            FitnessSharing::niche_count(&a, &[a.clone(), b], &SharingConfig::default()).unwrap();
        assert!((count - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_niche_count_rejects_bad_config() {
        let a = point("a", 0.5, 0.5);
        let config = SharingConfig::default().with_niche_radius(0.0);
        assert!(matches!(
            FitnessSharing::niche_count(&a, &[], &config),
            Err(SelectionError::InvalidOption { .. })
        ));
    }

    // ---- Apply sharing ----

    #[test]
    fn test_apply_sharing_identical_pair() {
        let pop = vec![
            point("a", 0.5, 0.5).with_fitness(10.0),
            point("b", 0.5, 0.5).with_fitness(10.0),
        ];
        let out = FitnessSharing::apply_sharing(&pop, &SharingConfig::default()).unwrap();
        for c in &out {
            assert_eq!(c.fitness, Some(5.0));
            assert_eq!(c.metadata.niche_count, Some(2.0));
            assert_eq!(c.metadata.raw_fitness, Some(10.0));
        }
        // input untouched
        assert_eq!(pop[0].fitness, Some(10.0));
        assert_eq!(pop[0].metadata.niche_count, None);
    }

    #[test]
    fn test_apply_sharing_crowded_lose_to_isolated() {
        let pop = vec![
            point("c1", 0.2, 0.2).with_fitness(1.0),
            point("c2", 0.21, 0.2).with_fitness(1.0),
            point("c3", 0.2, 0.21).with_fitness(1.0),
            point("iso", 0.9, 0.9).with_fitness(1.0),
        ];
        let out = FitnessSharing::apply_sharing(&pop, &SharingConfig::default()).unwrap();
        let isolated = out[3].fitness.unwrap();
        assert_eq!(isolated, 1.0);
        for c in &out[..3] {
            assert!(c.fitness.unwrap() < isolated, "{} not discounted", c.id);
        }
    }

    #[test]
    fn test_apply_sharing_absent_fitness_is_zero() {
        let pop = vec![point("a", 0.5, 0.5)];
        let out = FitnessSharing::apply_sharing(&pop, &SharingConfig::default()).unwrap();
        assert_eq!(out[0].fitness, Some(0.0));
        assert_eq!(out[0].metadata.raw_fitness, Some(0.0));
    }

    #[test]
    fn test_apply_sharing_without_preserve() {
        let pop = vec![point("a", 0.5, 0.5).with_fitness(4.0)];
        let config = SharingConfig::default().with_preserve_raw_fitness(false);
        let out = FitnessSharing::apply_sharing(&pop, &config).unwrap();
        assert_eq!(out[0].fitness, Some(4.0));
        assert_eq!(out[0].metadata.raw_fitness, None);
        assert_eq!(out[0].metadata.niche_count, None);
    }

    #[test]
    fn test_apply_sharing_empty() {
        let out = FitnessSharing::apply_sharing(&[], &SharingConfig::default()).unwrap();
        assert!(out.is_empty());
    }

    // ---- Niche radius ----

    #[test]
    fn test_radius_fixed() {
        let r = FitnessSharing::calculate_niche_radius(&[], &NicheRadiusStrategy::fixed()).unwrap();
        assert_eq!(r, 0.1);
    }

    #[test]
    fn test_radius_population_based_shrinks() {
        let small: Vec<Candidate> = (0..4).map(|i| point(&format!("s{i}"), 0.1, 0.1)).collect();
        let large: Vec<Candidate> = (0..100).map(|i| point(&format!("l{i}"), 0.1, 0.1)).collect();
        let strategy = NicheRadiusStrategy::population_based();
        let r_small = FitnessSharing::calculate_niche_radius(&small, &strategy).unwrap();
        let r_large = FitnessSharing::calculate_niche_radius(&large, &strategy).unwrap();
        assert!((r_small - 0.5).abs() < 1e-12);
        assert!((r_large - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_radius_objective_range() {
        let pop = vec![Candidate::new("a", "")
            .with_normalized_objective("x", 0.1)
            .with_normalized_objective("y", 0.1)
            .with_normalized_objective("z", 0.1)
            .with_normalized_objective("w", 0.1)];
        let r = FitnessSharing::calculate_niche_radius(&pop, &NicheRadiusStrategy::objective_range())
            .unwrap();
        assert!((r - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_radius_adaptive_floor() {
        let pop = vec![point("a", 0.5, 0.5), point("b", 0.51, 0.5)];
        let r = FitnessSharing::calculate_niche_radius(&pop, &NicheRadiusStrategy::adaptive()).unwrap();
        assert_eq!(r, 0.1);
    }

    #[test]
    fn test_radius_adaptive_scales_spacing() {
        let pop = vec![point("a", 0.0, 0.0), point("b", 0.6, 0.8)];
        let r = FitnessSharing::calculate_niche_radius(&pop, &NicheRadiusStrategy::adaptive()).unwrap();
        assert!((r - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_radius_rejects_invalid_strategy() {
        let strategy = NicheRadiusStrategy::ObjectiveRange { fraction: 0.0 };
        assert!(FitnessSharing::calculate_niche_radius(&[], &strategy).is_err());
    }

    // ---- Diversity and adaptive sharing ----

    #[test]
    fn test_crowding_diversity_ignores_boundary() {
        let pop = vec![
            point("a", 0.1, 0.9).with_crowding_distance(CrowdingDistance::Boundary),
            point("b", 0.4, 0.6).with_crowding_distance(CrowdingDistance::Finite(0.2)),
            point("c", 0.6, 0.4).with_crowding_distance(CrowdingDistance::Finite(0.4)),
            point("d", 0.9, 0.1).with_crowding_distance(CrowdingDistance::Boundary),
        ];
        let d = FitnessSharing::population_diversity(&pop, DiversityMetric::Crowding);
        assert!((d - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_crowding_diversity_all_boundary() {
        let pop = vec![
            point("a", 0.1, 0.9).with_crowding_distance(CrowdingDistance::Boundary),
            point("b", 0.9, 0.1).with_crowding_distance(CrowdingDistance::Boundary),
        ];
        assert_eq!(
            FitnessSharing::population_diversity(&pop, DiversityMetric::Crowding),
            0.0
        );
    }

    #[test]
    fn test_pairwise_diversity_normalized() {
        let pop = vec![point("a", 0.0, 0.0), point("b", 1.0, 1.0)];
        let d = FitnessSharing::population_diversity(&pop, DiversityMetric::PairwiseDistance);
        assert!((d - 1.0).abs() < 1e-12);
        assert_eq!(
            FitnessSharing::population_diversity(&pop[..1], DiversityMetric::PairwiseDistance),
            0.0
        );
    }

    #[test]
    fn test_adaptive_applies_when_converged() {
        let pop = vec![
            point("a", 0.5, 0.5).with_fitness(10.0),
            point("b", 0.5, 0.5).with_fitness(10.0),
        ];
        let config = AdaptiveSharingConfig::default()
            .with_diversity_metric(DiversityMetric::PairwiseDistance)
            .with_diversity_threshold(0.2);
        let outcome = FitnessSharing::adaptive_apply_sharing(&pop, &config).unwrap();
        assert!(outcome.was_applied());
        assert_eq!(outcome.diversity(), 0.0);
        assert_eq!(outcome.population()[0].fitness, Some(5.0));
    }

    #[test]
    fn test_adaptive_skips_when_diverse() {
        let pop = vec![
            point("a", 0.0, 1.0).with_fitness(10.0),
            point("b", 1.0, 0.0).with_fitness(10.0),
        ];
        let config = AdaptiveSharingConfig::default()
            .with_diversity_metric(DiversityMetric::PairwiseDistance)
            .with_diversity_threshold(0.2);
        let outcome = FitnessSharing::adaptive_apply_sharing(&pop, &config).unwrap();
        assert!(!outcome.was_applied());
        assert!(matches!(outcome, SharingOutcome::Skipped { .. }));
        assert_eq!(outcome.into_population(), pop);
    }

    #[test]
    fn test_adaptive_rejects_invalid_config() {
        let config = AdaptiveSharingConfig::default().with_diversity_threshold(f64::NAN);
        assert!(FitnessSharing::adaptive_apply_sharing(&[], &config).is_err());
    }
}
