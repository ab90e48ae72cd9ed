//! Pareto ranking and crowding-distance selection (NSGA-II utilities).
//!
//! # Components
//!
//! - [`DominanceComparator`]: pairwise dominance and fast non-dominated sorting
//! - [`CrowdingDistanceSelector`]: per-front crowding distance and
//!   environmental (generational) truncation
//!
//! Both components work on normalized objectives where **higher is better**.
//! The index-level functions [`non_dominated_sort`] and [`crowding_distance`]
//! operate on plain objective vectors for callers with their own layouts.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

mod crowding;
mod dominance;

pub use crowding::{crowding_distance, CrowdingDistanceSelector};
pub use dominance::{non_dominated_sort, DominanceComparator, NondominatedSortResult, ParetoFronts};
