//! Pareto dominance and fast non-dominated sorting.

use crate::candidate::{objective_keys, Candidate};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of index-level non-dominated sorting.
///
/// Ranks are 1-based: `ranks[i] == 1` means solution `i` is on the Pareto
/// front. `fronts[0]` holds the rank-1 indices, `fronts[1]` rank 2, and so on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NondominatedSortResult {
    /// Pareto rank for each solution (1 = front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front, each front in ascending index order.
    pub fronts: Vec<Vec<usize>>,
}

/// Fast non-dominated sorting over objective vectors.
///
/// All objectives are **maximized**: higher values are better.
///
/// # Algorithm (Deb et al., 2002)
///
/// 1. For each solution, count how many others dominate it and record the
///    set it dominates
/// 2. Solutions with a count of zero form front 1
/// 3. For each member of the current front, decrement the count of every
///    solution it dominates; those reaching zero form the next front
///
/// # Complexity
///
/// O(m * n²) where m = number of objectives, n = number of solutions
///
/// An empty input yields an empty result.
///
/// # Example
///
/// ```
/// use gepa_select::pareto::non_dominated_sort;
///
/// let objectives = vec![
///     vec![0.9, 0.1],  // A
///     vec![0.5, 0.5],  // B
///     vec![0.1, 0.9],  // C
///     vec![0.4, 0.4],  // D, dominated by B
/// ];
///
/// let result = non_dominated_sort(&objectives);
/// assert_eq!(result.ranks, vec![1, 1, 1, 2]);
/// assert_eq!(result.fronts, vec![vec![0, 1, 2], vec![3]]);
/// ```
pub fn non_dominated_sort(objectives: &[Vec<f64>]) -> NondominatedSortResult {
    let n = objectives.len();
    if n == 0 {
        return NondominatedSortResult::default();
    }

    debug_assert!(
        objectives.iter().all(|o| o.len() == objectives[0].len()),
        "all objective vectors must have the same length"
    );

    let (dominates, mut domination_count): (Vec<Vec<usize>>, Vec<usize>) =
        dominance_rows(objectives).into_iter().unzip();

    let mut ranks = vec![0usize; n];
    let front_1: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();
    for &i in &front_1 {
        ranks[i] = 1;
    }

    let mut fronts = vec![front_1];
    loop {
        let current = &fronts[fronts.len() - 1];
        let mut next_front = Vec::new();

        for &i in current {
            for &j in &dominates[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    next_front.push(j);
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        next_front.sort_unstable();
        let rank = fronts.len() + 1;
        for &j in &next_front {
            ranks[j] = rank;
        }
        fronts.push(next_front);
    }

    NondominatedSortResult { ranks, fronts }
}

/// For every solution: the indices it dominates and how many dominate it.
///
/// Rows are independent, so the `parallel` feature computes them with rayon;
/// `collect` keeps index order either way.
fn dominance_rows(objectives: &[Vec<f64>]) -> Vec<(Vec<usize>, usize)> {
    let n = objectives.len();
    let row = |i: usize| {
        let mut dominated = Vec::new();
        let mut count = 0usize;
        for j in 0..n {
            if i == j {
                continue;
            }
            match dominance_cmp(&objectives[i], &objectives[j]) {
                Dominance::Left => dominated.push(j),
                Dominance::Right => count += 1,
                Dominance::Neither => {}
            }
        }
        (dominated, count)
    };

    #[cfg(feature = "parallel")]
    {
        (0..n).into_par_iter().map(row).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..n).map(row).collect()
    }
}

/// Dominance comparison result.
#[derive(Debug, PartialEq)]
enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other.
    Neither,
}

/// Compare two solutions for Pareto dominance (maximization).
fn dominance_cmp(a: &[f64], b: &[f64]) -> Dominance {
    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va > vb {
            a_better_in_some = true;
        } else if vb > va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// Candidates grouped by Pareto rank.
///
/// Every candidate carries its `pareto_rank`. Fronts are stored in ascending
/// rank order; within a front, candidates keep their input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParetoFronts {
    fronts: Vec<Vec<Candidate>>,
}

impl ParetoFronts {
    /// Number of fronts.
    pub fn len(&self) -> usize {
        self.fronts.len()
    }

    /// Returns `true` when there are no fronts (empty population).
    pub fn is_empty(&self) -> bool {
        self.fronts.is_empty()
    }

    /// Total number of candidates across all fronts.
    pub fn population_size(&self) -> usize {
        self.fronts.iter().map(Vec::len).sum()
    }

    /// Members of front `rank` (1-based).
    pub fn front(&self, rank: usize) -> Option<&[Candidate]> {
        rank.checked_sub(1)
            .and_then(|i| self.fronts.get(i))
            .map(Vec::as_slice)
    }

    /// Iterates `(rank, members)` in ascending rank order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Candidate])> {
        self.fronts
            .iter()
            .enumerate()
            .map(|(i, f)| (i + 1, f.as_slice()))
    }

    /// Consumes the result, returning fronts in ascending rank order.
    pub fn into_fronts(self) -> Vec<Vec<Candidate>> {
        self.fronts
    }

    /// Consumes the result, returning all candidates in ascending rank order.
    pub fn into_population(self) -> Vec<Candidate> {
        self.fronts.into_iter().flatten().collect()
    }
}

/// Pareto dominance over candidates' normalized objectives.
///
/// # Usage
///
/// ```
/// use gepa_select::{Candidate, DominanceComparator};
///
/// let a = Candidate::new("a", "").with_normalized_objective("acc", 0.9);
/// let b = Candidate::new("b", "").with_normalized_objective("acc", 0.5);
///
/// assert!(DominanceComparator::dominates(&a, &b));
/// assert!(!DominanceComparator::dominates(&b, &a));
///
/// let fronts = DominanceComparator::fast_non_dominated_sort(&[a, b]);
/// assert_eq!(fronts.len(), 2);
/// assert_eq!(fronts.front(1).unwrap()[0].id, "a");
/// ```
pub struct DominanceComparator;

impl DominanceComparator {
    /// Returns `true` iff `a` is at least as good as `b` on every objective
    /// and strictly better on at least one.
    ///
    /// The objective set is the union of both candidates' keys; a key missing
    /// on one side reads as `0.0`. Irreflexive and asymmetric.
    pub fn dominates(a: &Candidate, b: &Candidate) -> bool {
        let mut strictly_better = false;
        for key in a
            .normalized_objectives
            .keys()
            .chain(b.normalized_objectives.keys())
        {
            let (va, vb) = (a.normalized(key), b.normalized(key));
            if va < vb {
                return false;
            }
            if va > vb {
                strictly_better = true;
            }
        }
        strictly_better
    }

    /// Partitions `population` into ranked fronts.
    ///
    /// Each returned candidate is a copy with `pareto_rank` set; every other
    /// field is carried forward unchanged. Identical objective vectors never
    /// dominate each other, so an all-identical population is a single front.
    pub fn fast_non_dominated_sort(population: &[Candidate]) -> ParetoFronts {
        if population.is_empty() {
            return ParetoFronts::default();
        }

        let keys = objective_keys(population);
        let vectors: Vec<Vec<f64>> = population
            .iter()
            .map(|c| c.objective_vector(&keys))
            .collect();
        let sorted = non_dominated_sort(&vectors);

        let fronts: Vec<Vec<Candidate>> = sorted
            .fronts
            .iter()
            .enumerate()
            .map(|(i, front)| {
                front
                    .iter()
                    .map(|&idx| population[idx].clone().with_pareto_rank(i + 1))
                    .collect()
            })
            .collect();

        log::debug!(
            "non-dominated sort: {} candidates in {} fronts (front 1 size {})",
            population.len(),
            fronts.len(),
            fronts.first().map_or(0, Vec::len)
        );

        ParetoFronts { fronts }
    }
}

// ============================================================================
// Tests
// ============================================================================
