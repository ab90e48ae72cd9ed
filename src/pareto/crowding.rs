//! Crowding distance and environmental selection.

use super::dominance::DominanceComparator;
use crate::candidate::{objective_keys, Candidate, CrowdingDistance};
use crate::error::{RankingField, Result, SelectionError};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Crowding distance assignment for diversity preservation.
///
/// Computes the crowding distance for each solution, measuring how
/// spread out the solutions are in objective space. Higher distance
/// means the solution is more isolated (more diverse).
///
/// Boundary solutions (min/max for any objective) receive
/// [`CrowdingDistance::Boundary`]. Fronts of at most two solutions are
/// entirely boundary.
///
/// # Algorithm (Deb et al., 2002)
///
/// For each objective:
/// 1. Sort solutions by objective value (ties by index)
/// 2. Assign the boundary sentinel to every solution at the minimum or
///    maximum (tied extremes included)
/// 3. For interior solutions, add `(next - prev) / range`
///
/// An objective whose range is zero carries no information about spread:
/// it marks no boundary and contributes nothing.
///
/// # Complexity
///
/// O(m * n * log n) where m = number of objectives, n = number of solutions
///
/// # Example
///
/// ```
/// use gepa_select::pareto::crowding_distance;
///
/// let objectives = vec![
///     vec![0.9, 0.1],
///     vec![0.5, 0.5],
///     vec![0.1, 0.9],
/// ];
///
/// let distances = crowding_distance(&objectives);
/// assert!(distances[0].is_boundary());
/// assert!(distances[2].is_boundary());
/// assert!(distances[1].as_f64() > 0.0);
/// ```
pub fn crowding_distance(objectives: &[Vec<f64>]) -> Vec<CrowdingDistance> {
    let n = objectives.len();
    if n <= 2 {
        return vec![CrowdingDistance::Boundary; n];
    }

    let m = objectives[0].len();
    let mut distances = vec![CrowdingDistance::Finite(0.0); n];

    #[allow(clippy::needless_range_loop)] // obj_idx is a column index into 2D data
    for obj_idx in 0..m {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.sort_by(|&a, &b| {
            objectives[a][obj_idx]
                .total_cmp(&objectives[b][obj_idx])
                .then(a.cmp(&b))
        });

        let min_val = objectives[indices[0]][obj_idx];
        let max_val = objectives[indices[n - 1]][obj_idx];
        let range = max_val - min_val;
        if range <= 0.0 || !range.is_finite() {
            continue;
        }

        let extremal = |v: f64| v == min_val || v == max_val;
        for &idx in &indices {
            if extremal(objectives[idx][obj_idx]) {
                distances[idx] = CrowdingDistance::Boundary;
            }
        }

        for i in 1..(n - 1) {
            let idx = indices[i];
            if extremal(objectives[idx][obj_idx]) {
                continue;
            }
            let prev = objectives[indices[i - 1]][obj_idx];
            let next = objectives[indices[i + 1]][obj_idx];
            distances[idx] = distances[idx].accumulate((next - prev) / range);
        }
    }

    distances
}

/// Annotates one front with crowding distances.
///
/// Members are laid out by id before computing so the result depends only on
/// the set of members, not on their input order. The output keeps input order.
fn annotate_front(front: &[Candidate]) -> Vec<Candidate> {
    let keys = objective_keys(front);
    let mut order: Vec<usize> = (0..front.len()).collect();
    order.sort_by(|&a, &b| front[a].id.cmp(&front[b].id));

    let vectors: Vec<Vec<f64>> = order
        .iter()
        .map(|&i| front[i].objective_vector(&keys))
        .collect();
    let distances = crowding_distance(&vectors);

    let mut by_input = vec![CrowdingDistance::Finite(0.0); front.len()];
    for (slot, &i) in order.iter().enumerate() {
        by_input[i] = distances[slot];
    }

    front
        .iter()
        .zip(by_input)
        .map(|(c, d)| c.clone().with_crowding_distance(d))
        .collect()
}

/// Orders by crowding distance descending (boundary first), then id.
fn by_diversity(a: &Candidate, b: &Candidate) -> Ordering {
    b.crowding_or_zero()
        .diversity_cmp(&a.crowding_or_zero())
        .then_with(|| a.id.cmp(&b.id))
}

/// Crowding-distance assignment and NSGA-II environmental selection.
///
/// # Usage
///
/// ```
/// use gepa_select::{Candidate, CrowdingDistanceSelector};
///
/// let pop: Vec<Candidate> = (0..6)
///     .map(|i| {
///         let x = i as f64 / 5.0;
///         Candidate::new(format!("c{i}"), "")
///             .with_normalized_objective("acc", x)
///             .with_normalized_objective("lat", 1.0 - x)
///     })
///     .collect();
///
/// let survivors = CrowdingDistanceSelector::environmental_selection(&pop, 4);
/// assert_eq!(survivors.len(), 4);
/// assert!(survivors.iter().all(|c| c.pareto_rank == Some(1)));
/// ```
pub struct CrowdingDistanceSelector;

impl CrowdingDistanceSelector {
    /// Assigns crowding distances within each rank-front independently.
    ///
    /// Every candidate must already carry `pareto_rank`. The output keeps the
    /// input order.
    pub fn assign_crowding_distances(population: &[Candidate]) -> Result<Vec<Candidate>> {
        let mut fronts: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, c) in population.iter().enumerate() {
            let rank = c.pareto_rank.ok_or_else(|| SelectionError::MissingRanking {
                candidate_id: c.id.clone(),
                field: RankingField::ParetoRank,
            })?;
            fronts.entry(rank).or_default().push(i);
        }

        let groups: Vec<Vec<usize>> = fronts.into_values().collect();
        let annotate = |members: &Vec<usize>| {
            let front: Vec<Candidate> = members.iter().map(|&i| population[i].clone()).collect();
            annotate_front(&front)
        };

        #[cfg(feature = "parallel")]
        let annotated: Vec<Vec<Candidate>> = groups.par_iter().map(annotate).collect();
        #[cfg(not(feature = "parallel"))]
        let annotated: Vec<Vec<Candidate>> = groups.iter().map(annotate).collect();

        let mut slots: Vec<Option<Candidate>> = vec![None; population.len()];
        for (members, front) in groups.iter().zip(annotated) {
            for (&i, c) in members.iter().zip(front) {
                slots[i] = Some(c);
            }
        }
        Ok(slots.into_iter().flatten().collect())
    }

    /// Selects `target_size` survivors from a merged parent+offspring pool.
    ///
    /// Whole fronts are admitted in ascending rank order while they fit. The
    /// front that would overflow is sorted by crowding distance (boundary
    /// first, ties by id) and only its most diverse members are kept.
    /// Crowding distances on the output describe the surviving members of
    /// each front, so re-applying with the same `target_size` returns the
    /// same candidates with the same annotations.
    ///
    /// Output size is `min(target_size, combined.len())`. Survivors are
    /// ordered by rank, then crowding distance descending, then id.
    pub fn environmental_selection(combined: &[Candidate], target_size: usize) -> Vec<Candidate> {
        if combined.is_empty() || target_size == 0 {
            return Vec::new();
        }

        let fronts = DominanceComparator::fast_non_dominated_sort(combined);
        let mut survivors = Vec::with_capacity(target_size.min(combined.len()));

        for (rank, front) in fronts.iter() {
            let remaining = target_size - survivors.len();
            if remaining == 0 {
                break;
            }

            let mut annotated = annotate_front(front);
            if annotated.len() > remaining {
                annotated.sort_by(by_diversity);
                annotated.truncate(remaining);
                log::debug!(
                    "environmental selection: truncated front {rank} from {} to {remaining}",
                    front.len()
                );
                annotated = annotate_front(&annotated);
            }
            annotated.sort_by(by_diversity);
            survivors.extend(annotated);
        }

        log::debug!(
            "environmental selection: {} of {} candidates survive ({} fronts available)",
            survivors.len(),
            combined.len(),
            fronts.len()
        );
        survivors
    }

    /// Concatenates parents and offspring, then runs
    /// [`environmental_selection`](Self::environmental_selection).
    pub fn merge_and_select(
        parents: &[Candidate],
        offspring: &[Candidate],
        target_size: usize,
    ) -> Vec<Candidate> {
        let combined: Vec<Candidate> = parents.iter().chain(offspring).cloned().collect();
        Self::environmental_selection(&combined, target_size)
    }

    /// Candidates whose crowding distance is the boundary sentinel.
    pub fn identify_boundary_solutions(population: &[Candidate]) -> Vec<&Candidate> {
        population
            .iter()
            .filter(|c| c.crowding_distance.is_some_and(|d| d.is_boundary()))
            .collect()
    }

    /// Ids of [`identify_boundary_solutions`](Self::identify_boundary_solutions).
    pub fn boundary_ids(population: &[Candidate]) -> Vec<&str> {
        Self::identify_boundary_solutions(population)
            .into_iter()
            .map(|c| c.id.as_str())
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
