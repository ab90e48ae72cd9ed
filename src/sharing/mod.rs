//! Niche-based fitness sharing.
//!
//! Fitness sharing discounts each candidate's fitness by how many neighbours
//! it has in normalized-objective space, so crowded regions stop attracting
//! all the selection pressure. It is independent of Pareto ranking and is
//! usually applied after it.
//!
//! # Key Types
//!
//! - [`FitnessSharing`]: niche counts, sharing, radius heuristics
//! - [`SharingConfig`]: radius, exponent, raw-fitness preservation
//! - [`NicheRadiusStrategy`]: fixed, population-based, objective-range, adaptive
//! - [`SharingOutcome`]: whether adaptive sharing applied or skipped
//!
//! # References
//!
//! - Goldberg & Richardson (1987), "Genetic Algorithms with Sharing for
//!   Multimodal Function Optimization"
//! - Deb & Goldberg (1989), "An Investigation of Niche and Species Formation
//!   in Genetic Function Optimization"

mod config;
mod niche;

pub use config::{
    AdaptiveSharingConfig, DiversityMetric, NicheRadiusStrategy, SharingConfig,
    DEFAULT_ADAPTIVE_FLOOR, DEFAULT_ADAPTIVE_SCALE, DEFAULT_BASE_RADIUS, DEFAULT_NICHE_RADIUS,
    DEFAULT_RANGE_FRACTION,
};
pub use niche::{FitnessSharing, SharingOutcome};
