//! Elite extraction strategies.

use super::config::EliteConfig;
use crate::candidate::{objective_distance, require_ranking, Candidate};
use crate::error::Result;
use crate::pareto::DominanceComparator;
use std::cmp::Ordering;

/// Rank ascending, then crowding distance descending (boundary first).
///
/// Only called after [`require_ranking`], so both fields are present.
fn elite_order(a: &Candidate, b: &Candidate) -> Ordering {
    a.pareto_rank
        .cmp(&b.pareto_rank)
        .then_with(|| b.crowding_or_zero().diversity_cmp(&a.crowding_or_zero()))
}

/// Sorted copy of `population` under [`elite_order`]; ties keep input order.
fn ranked(population: &[Candidate]) -> Vec<Candidate> {
    let mut sorted = population.to_vec();
    sorted.sort_by(elite_order);
    sorted
}

/// Deterministic elite selection.
///
/// Every operation except [`select_pareto_front_1`](Self::select_pareto_front_1)
/// requires candidates to carry both `pareto_rank` and `crowding_distance`
/// and fails with [`SelectionError::MissingRanking`](crate::SelectionError::MissingRanking)
/// naming the first candidate that does not.
///
/// # Usage
///
/// ```
/// use gepa_select::{Candidate, CrowdingDistanceSelector, EliteConfig, EliteSelector};
///
/// let pop: Vec<Candidate> = (0..20)
///     .map(|i| {
///         let x = (i % 10) as f64 / 10.0;
///         let y = if i < 10 { 1.0 - x } else { 0.5 - x / 2.0 };
///         Candidate::new(format!("c{i}"), "")
///             .with_normalized_objective("acc", x)
///             .with_normalized_objective("lat", y)
///     })
///     .collect();
///
/// let ranked = CrowdingDistanceSelector::environmental_selection(&pop, pop.len());
/// let elites = EliteSelector::select_elites(&ranked, &EliteConfig::default()).unwrap();
/// assert_eq!(elites.len(), 3); // round(20 * 0.15)
/// assert!(elites.iter().all(|c| c.pareto_rank == Some(1)));
/// ```
pub struct EliteSelector;

impl EliteSelector {
    /// Top-K candidates by (rank ascending, crowding distance descending).
    ///
    /// K is [`EliteConfig::desired_count`]. An empty population yields an
    /// empty result.
    pub fn select_elites(population: &[Candidate], config: &EliteConfig) -> Result<Vec<Candidate>> {
        config.validate()?;
        require_ranking(population)?;

        let count = config.desired_count(population.len());
        let mut elites = ranked(population);
        elites.truncate(count);

        log::debug!("selected {} elites from {} candidates", elites.len(), population.len());
        Ok(elites)
    }

    /// Rank-1 members of `population`.
    ///
    /// Uses the existing `pareto_rank` annotations when every candidate has
    /// one; otherwise ranks are re-derived by non-dominated sorting.
    pub fn select_pareto_front_1(population: &[Candidate]) -> Vec<Candidate> {
        if population.iter().all(|c| c.pareto_rank.is_some()) {
            return population
                .iter()
                .filter(|c| c.pareto_rank == Some(1))
                .cloned()
                .collect();
        }

        log::debug!("front 1 requested on unranked population; sorting");
        DominanceComparator::fast_non_dominated_sort(population)
            .into_fronts()
            .into_iter()
            .next()
            .unwrap_or_default()
    }

    /// Exactly `elite_count` elites (or the whole population if smaller),
    /// always containing all of front 1 when it fits.
    ///
    /// - `|front 1| > elite_count`: front 1 trimmed by crowding distance
    /// - otherwise: front 1 whole, remaining slots filled from later fronts
    ///   by ascending rank, then descending crowding distance
    pub fn select_elites_preserve_frontier(
        population: &[Candidate],
        config: &EliteConfig,
    ) -> Result<Vec<Candidate>> {
        config.validate()?;
        let elite_count = config.require_elite_count()?;
        require_ranking(population)?;

        let sorted = ranked(population);
        let front_1 = sorted
            .iter()
            .take_while(|c| c.pareto_rank == Some(1))
            .count();

        let mut elites = sorted;
        elites.truncate(elite_count);

        if front_1 > elite_count {
            log::debug!("front 1 ({front_1}) exceeds elite_count {elite_count}; trimmed by crowding");
        } else {
            log::debug!(
                "front 1 ({front_1}) preserved; {} slots filled from later fronts",
                elites.len() - front_1
            );
        }
        Ok(elites)
    }

    /// Up to `elite_count` elites, skipping near-duplicates.
    ///
    /// Candidates are scanned by (rank ascending, crowding distance
    /// descending, generation descending). A candidate is accepted only if
    /// its objective-space distance to every already-accepted elite exceeds
    /// `similarity_threshold`. The result may hold fewer than `elite_count`
    /// candidates when the population lacks enough distinct points.
    pub fn select_diverse_elites(
        population: &[Candidate],
        config: &EliteConfig,
    ) -> Result<Vec<Candidate>> {
        config.validate()?;
        let elite_count = config.require_elite_count()?;
        require_ranking(population)?;

        let mut ordered = population.to_vec();
        ordered.sort_by(|a, b| elite_order(a, b).then_with(|| b.generation.cmp(&a.generation)));

        let mut elites: Vec<Candidate> = Vec::with_capacity(elite_count.min(population.len()));
        for candidate in ordered {
            if elites.len() >= elite_count {
                break;
            }
            let distinct = elites
                .iter()
                .all(|e| objective_distance(e, &candidate) > config.similarity_threshold);
            if distinct {
                elites.push(candidate);
            } else {
                log::trace!("skipping near-duplicate elite {}", candidate.id);
            }
        }

        if elites.len() < elite_count {
            log::debug!(
                "only {} distinct elites available (requested {elite_count})",
                elites.len()
            );
        }
        Ok(elites)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CrowdingDistance;
    use crate::error::{RankingField, SelectionError};

    fn ranked_point(id: &str, acc: f64, lat: f64, rank: usize, dist: CrowdingDistance) -> Candidate {
        Candidate::new(id, "p")
            .with_normalized_objective("acc", acc)
            .with_normalized_objective("lat", lat)
            .with_pareto_rank(rank)
            .with_crowding_distance(dist)
    }

    fn fin(v: f64) -> CrowdingDistance {
        CrowdingDistance::Finite(v)
    }

    fn ids(pop: &[Candidate]) -> Vec<&str> {
        pop.iter().map(|c| c.id.as_str()).collect()
    }

    fn sample() -> Vec<Candidate> {
        vec![
            ranked_point("r2-wide", 0.4, 0.3, 2, CrowdingDistance::Boundary),
            ranked_point("r1-mid", 0.5, 0.5, 1, fin(0.8)),
            ranked_point("r3", 0.1, 0.1, 3, CrowdingDistance::Boundary),
            ranked_point("r1-edge", 0.9, 0.1, 1, CrowdingDistance::Boundary),
            ranked_point("r1-crowded", 0.52, 0.48, 1, fin(0.1)),
            ranked_point("r2-narrow", 0.3, 0.35, 2, fin(0.2)),
        ]
    }

    // ---- select_elites ----

    #[test]
    fn test_select_elites_order() {
        let config = EliteConfig::default().with_elite_count(4);
        let elites = EliteSelector::select_elites(&sample(), &config).unwrap();
        assert_eq!(ids(&elites), vec!["r1-edge", "r1-mid", "r1-crowded", "r2-wide"]);
    }

    #[test]
    fn test_select_elites_ratio_with_min() {
        // round(6 * 0.15) = 1
        let elites = EliteSelector::select_elites(&sample(), &EliteConfig::default()).unwrap();
        assert_eq!(ids(&elites), vec!["r1-edge"]);

        let config = EliteConfig::default().with_min_elites(3);
        let elites = EliteSelector::select_elites(&sample(), &config).unwrap();
        assert_eq!(elites.len(), 3);
    }

    #[test]
    fn test_select_elites_capped_at_population() {
        let config = EliteConfig::default().with_elite_count(50);
        let elites = EliteSelector::select_elites(&sample(), &config).unwrap();
        assert_eq!(elites.len(), 6);
        assert_eq!(elites.last().unwrap().id, "r3");
    }

    #[test]
    fn test_select_elites_missing_distance() {
        let mut pop = sample();
        pop.push(Candidate::new("naked", "").with_pareto_rank(1));
        let err = EliteSelector::select_elites(&pop, &EliteConfig::default()).unwrap_err();
        assert_eq!(
            err,
            SelectionError::MissingRanking {
                candidate_id: "naked".into(),
                field: RankingField::CrowdingDistance,
            }
        );
    }

    #[test]
    fn test_select_elites_empty() {
        let elites = EliteSelector::select_elites(&[], &EliteConfig::default()).unwrap();
        assert!(elites.is_empty());
    }

    // ---- select_pareto_front_1 ----

    #[test]
    fn test_front_1_from_annotations() {
        let front = EliteSelector::select_pareto_front_1(&sample());
        assert_eq!(ids(&front), vec!["r1-mid", "r1-edge", "r1-crowded"]);
    }

    #[test]
    fn test_front_1_rederived() {
        let pop = vec![
            Candidate::new("a", "").with_normalized_objective("acc", 0.9),
            Candidate::new("b", "").with_normalized_objective("acc", 0.2),
            Candidate::new("c", "").with_normalized_objective("acc", 0.9),
        ];
        let front = EliteSelector::select_pareto_front_1(&pop);
        assert_eq!(ids(&front), vec!["a", "c"]);
        assert!(front.iter().all(|c| c.pareto_rank == Some(1)));
        assert!(EliteSelector::select_pareto_front_1(&[]).is_empty());
    }

    #[test]
    fn test_zero_elite_count_rejected_in_every_mode() {
        let config = EliteConfig::default().with_elite_count(0);
        let rejected = |r: Result<Vec<Candidate>>| {
            matches!(
                r,
                Err(SelectionError::InvalidOption {
                    option: "elite_count",
                    ..
                })
            )
        };
        // min_elites = 1 does not rescue an explicit zero
        assert!(rejected(EliteSelector::select_elites(&sample(), &config)));
        assert!(rejected(EliteSelector::select_elites_preserve_frontier(&sample(), &config)));
        assert!(rejected(EliteSelector::select_diverse_elites(&sample(), &config)));
    }

    // ---- select_elites_preserve_frontier ----

    #[test]
    fn test_preserve_frontier_requires_count() {
        let err = EliteSelector::select_elites_preserve_frontier(&sample(), &EliteConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            SelectionError::MissingOption {
                option: "elite_count"
            }
        );
    }

    #[test]
    fn test_preserve_frontier_fills_from_later_fronts() {
        let config = EliteConfig::default().with_elite_count(5);
        let elites = EliteSelector::select_elites_preserve_frontier(&sample(), &config).unwrap();
        assert_eq!(
            ids(&elites),
            vec!["r1-edge", "r1-mid", "r1-crowded", "r2-wide", "r2-narrow"]
        );
    }

    #[test]
    fn test_preserve_frontier_trims_front_1() {
        let config = EliteConfig::default().with_elite_count(2);
        let elites = EliteSelector::select_elites_preserve_frontier(&sample(), &config).unwrap();
        assert_eq!(ids(&elites), vec!["r1-edge", "r1-mid"]);
    }

    #[test]
    fn test_preserve_frontier_population_smaller() {
        let config = EliteConfig::default().with_elite_count(10);
        let elites = EliteSelector::select_elites_preserve_frontier(&sample(), &config).unwrap();
        assert_eq!(elites.len(), 6);
    }

    // ---- select_diverse_elites ----

    #[test]
    fn test_diverse_elites_skip_near_duplicates() {
        let pop = vec![
            ranked_point("a", 0.5, 0.5, 1, CrowdingDistance::Boundary),
            ranked_point("a-dup", 0.5, 0.505, 1, fin(0.9)),
            ranked_point("b", 0.2, 0.8, 1, fin(0.5)),
            ranked_point("c", 0.1, 0.1, 2, CrowdingDistance::Boundary),
        ];
        let config = EliteConfig::default().with_elite_count(3);
        let elites = EliteSelector::select_diverse_elites(&pop, &config).unwrap();
        assert_eq!(ids(&elites), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_diverse_elites_may_return_fewer() {
        let pop: Vec<Candidate> = (0..5)
            .map(|i| ranked_point(&format!("c{i}"), 0.5, 0.5, 1, fin(0.0)))
            .collect();
        let config = EliteConfig::default().with_elite_count(3);
        let elites = EliteSelector::select_diverse_elites(&pop, &config).unwrap();
        assert_eq!(elites.len(), 1);
    }

    #[test]
    fn test_diverse_elites_prefer_newer_generation_on_tie() {
        let pop = vec![
            ranked_point("old", 0.5, 0.5, 1, fin(0.3)).with_generation(1),
            ranked_point("new", 0.5, 0.5, 1, fin(0.3)).with_generation(4),
        ];
        let config = EliteConfig::default().with_elite_count(2);
        let elites = EliteSelector::select_diverse_elites(&pop, &config).unwrap();
        assert_eq!(ids(&elites), vec!["new"]);
    }

    #[test]
    fn test_diverse_elites_requires_count() {
        assert!(matches!(
            EliteSelector::select_diverse_elites(&sample(), &EliteConfig::default()),
            Err(SelectionError::MissingOption { .. })
        ));
    }
}
