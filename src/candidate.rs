//! Candidate data model.
//!
//! A [`Candidate`] is one prompt variant under evaluation. Stages never
//! mutate candidates they receive: each stage takes `&[Candidate]` and returns
//! new values with its own annotation filled in.
//!
//! All comparisons read `normalized_objectives`, where **higher is better**.
//! Direction inversion (e.g. for latency or cost) is the normalizer's job.

use crate::error::{RankingField, Result, SelectionError};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::time::SystemTime;

/// Crowding distance of a candidate within its front.
///
/// Extremal members of a front carry [`Boundary`](CrowdingDistance::Boundary),
/// which compares greater than every finite value. Using a tagged variant
/// instead of `f64::INFINITY` keeps sums well-defined (boundary plus anything
/// stays boundary, never NaN) and serializes without relying on non-finite
/// JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", content = "value", rename_all = "snake_case")
)]
pub enum CrowdingDistance {
    /// Interior member: normalized perimeter of the neighbouring cuboid.
    Finite(f64),
    /// Extremal member on at least one objective axis.
    Boundary,
}

impl CrowdingDistance {
    /// Creates a finite distance. Negative and NaN inputs become `0.0`.
    pub fn finite(value: f64) -> Self {
        if value.is_nan() || value < 0.0 {
            CrowdingDistance::Finite(0.0)
        } else {
            CrowdingDistance::Finite(value)
        }
    }

    /// Returns `true` for the boundary sentinel.
    pub fn is_boundary(&self) -> bool {
        matches!(self, CrowdingDistance::Boundary)
    }

    /// Finite value, or `None` for the boundary sentinel.
    pub fn finite_value(&self) -> Option<f64> {
        match *self {
            CrowdingDistance::Finite(v) => Some(v),
            CrowdingDistance::Boundary => None,
        }
    }

    /// Numeric view: boundary maps to `f64::INFINITY`.
    pub fn as_f64(&self) -> f64 {
        match *self {
            CrowdingDistance::Finite(v) => v,
            CrowdingDistance::Boundary => f64::INFINITY,
        }
    }

    /// Adds a finite contribution. Boundary absorbs any addition.
    pub(crate) fn accumulate(self, delta: f64) -> Self {
        match self {
            CrowdingDistance::Finite(v) => CrowdingDistance::finite(v + delta),
            CrowdingDistance::Boundary => CrowdingDistance::Boundary,
        }
    }

    /// Total order used for diversity comparisons.
    ///
    /// Boundary equals boundary and beats every finite value; finite values
    /// compare with [`f64::total_cmp`].
    pub fn diversity_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CrowdingDistance::Boundary, CrowdingDistance::Boundary) => Ordering::Equal,
            (CrowdingDistance::Boundary, CrowdingDistance::Finite(_)) => Ordering::Greater,
            (CrowdingDistance::Finite(_), CrowdingDistance::Boundary) => Ordering::Less,
            (CrowdingDistance::Finite(a), CrowdingDistance::Finite(b)) => a.total_cmp(b),
        }
    }
}

impl PartialOrd for CrowdingDistance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.diversity_cmp(other))
    }
}

/// Auxiliary annotations written independently by later stages.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Annotations {
    /// Fitness before fitness sharing overwrote it.
    pub raw_fitness: Option<f64>,
    /// Niche count computed by fitness sharing.
    pub niche_count: Option<f64>,
}

/// A prompt variant carrying multi-objective scores and ranking annotations.
///
/// # Examples
///
/// ```
/// use gepa_select::Candidate;
///
/// let c = Candidate::new("c1", "Answer concisely.")
///     .with_generation(3)
///     .with_objective("accuracy", 0.82)
///     .with_normalized_objective("accuracy", 0.82)
///     .with_normalized_objective("latency", 0.4);
///
/// assert_eq!(c.normalized("accuracy"), 0.82);
/// assert_eq!(c.normalized("cost"), 0.0); // missing keys read as 0.0
/// assert!(c.pareto_rank.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    /// Stable unique identifier.
    pub id: String,
    /// Opaque payload; never interpreted by this crate.
    pub prompt: String,
    /// Evolutionary cycle that produced this candidate.
    pub generation: u32,
    /// Creation time.
    pub created_at: SystemTime,
    /// Scalar fitness; absent until computed, overwritten by fitness sharing.
    pub fitness: Option<f64>,
    /// Raw objective scores.
    pub objectives: BTreeMap<String, f64>,
    /// Objective scores normalized into `[0, 1]`, higher is better.
    pub normalized_objectives: BTreeMap<String, f64>,
    /// Pareto front index, 1 = best.
    pub pareto_rank: Option<usize>,
    /// Diversity within the candidate's front.
    pub crowding_distance: Option<CrowdingDistance>,
    /// Annotations written by later stages.
    pub metadata: Annotations,
}

impl Candidate {
    /// Creates an unevaluated candidate for generation 0.
    pub fn new(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            generation: 0,
            created_at: SystemTime::now(),
            fitness: None,
            objectives: BTreeMap::new(),
            normalized_objectives: BTreeMap::new(),
            pareto_rank: None,
            crowding_distance: None,
            metadata: Annotations::default(),
        }
    }

    /// Sets the generation.
    pub fn with_generation(mut self, generation: u32) -> Self {
        self.generation = generation;
        self
    }

    /// Sets the creation time.
    pub fn with_created_at(mut self, created_at: SystemTime) -> Self {
        self.created_at = created_at;
        self
    }

    /// Sets the scalar fitness.
    pub fn with_fitness(mut self, fitness: f64) -> Self {
        self.fitness = Some(fitness);
        self
    }

    /// Adds a raw objective score.
    pub fn with_objective(mut self, name: impl Into<String>, value: f64) -> Self {
        self.objectives.insert(name.into(), value);
        self
    }

    /// Adds a normalized objective score.
    pub fn with_normalized_objective(mut self, name: impl Into<String>, value: f64) -> Self {
        self.normalized_objectives.insert(name.into(), value);
        self
    }

    /// Sets the Pareto rank.
    pub fn with_pareto_rank(mut self, rank: usize) -> Self {
        self.pareto_rank = Some(rank);
        self
    }

    /// Sets the crowding distance.
    pub fn with_crowding_distance(mut self, distance: CrowdingDistance) -> Self {
        self.crowding_distance = Some(distance);
        self
    }

    /// Replaces the annotation record.
    pub fn with_metadata(mut self, metadata: Annotations) -> Self {
        self.metadata = metadata;
        self
    }

    /// Normalized score for `key`, or `0.0` when the key is missing.
    pub fn normalized(&self, key: &str) -> f64 {
        self.normalized_objectives.get(key).copied().unwrap_or(0.0)
    }

    /// Fitness, or `0.0` when absent.
    pub fn fitness_or_zero(&self) -> f64 {
        self.fitness.unwrap_or(0.0)
    }

    /// Crowding distance for comparisons; absent reads as `Finite(0.0)`.
    pub fn crowding_or_zero(&self) -> CrowdingDistance {
        self.crowding_distance.unwrap_or(CrowdingDistance::Finite(0.0))
    }

    /// Returns `(pareto_rank, crowding_distance)` or the first missing field.
    pub fn ranking(&self) -> Result<(usize, CrowdingDistance)> {
        let rank = self.pareto_rank.ok_or_else(|| SelectionError::MissingRanking {
            candidate_id: self.id.clone(),
            field: RankingField::ParetoRank,
        })?;
        let distance = self
            .crowding_distance
            .ok_or_else(|| SelectionError::MissingRanking {
                candidate_id: self.id.clone(),
                field: RankingField::CrowdingDistance,
            })?;
        Ok((rank, distance))
    }

    /// Normalized scores laid out along `keys`, missing keys as `0.0`.
    pub fn objective_vector(&self, keys: &[String]) -> Vec<f64> {
        keys.iter().map(|k| self.normalized(k)).collect()
    }
}

/// Fails with [`SelectionError::MissingRanking`] naming the first candidate
/// without both `pareto_rank` and `crowding_distance`.
pub fn require_ranking(population: &[Candidate]) -> Result<()> {
    population.iter().try_for_each(|c| c.ranking().map(|_| ()))
}

/// Sorted union of normalized objective keys across `population`.
pub fn objective_keys(population: &[Candidate]) -> Vec<String> {
    population
        .iter()
        .flat_map(|c| c.normalized_objectives.keys())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Euclidean distance between two candidates in normalized-objective space.
///
/// The axis set is the union of both key sets; missing keys read as `0.0`.
pub fn objective_distance(a: &Candidate, b: &Candidate) -> f64 {
    let keys: Vec<String> = a
        .normalized_objectives
        .keys()
        .chain(b.normalized_objectives.keys())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    euclidean_distance(&a.objective_vector(&keys), &b.objective_vector(&keys))
}

/// Euclidean distance between two objective vectors laid out on the same keys.
pub(crate) fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Mean Euclidean distance over all unordered pairs. `0.0` below two members.
pub(crate) fn mean_pairwise_distance(population: &[Candidate]) -> f64 {
    let n = population.len();
    if n < 2 {
        return 0.0;
    }
    let mut total = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            total += objective_distance(&population[i], &population[j]);
        }
    }
    total / (n * (n - 1) / 2) as f64
}
