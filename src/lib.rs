//! Multi-objective Genetic-Pareto (GEPA) selection core.
//!
//! Ranks and selects evolved prompt candidates across several, possibly
//! conflicting, objectives (accuracy, latency, cost, ...) without collapsing
//! them into a single score. The crate is the per-generation ranking and
//! selection layer of an evolutionary loop:
//!
//! - **Candidate**: the unit of selection with its scores and annotations
//! - **Pareto ranking**: [`DominanceComparator`] (dominance, fast
//!   non-dominated sort) and [`CrowdingDistanceSelector`] (crowding distance,
//!   environmental truncation)
//! - **Fitness sharing**: [`FitnessSharing`] discounts fitness in crowded
//!   niches
//! - **Elitism**: [`EliteSelector`] extracts the best candidates
//!   deterministically
//! - **Tournaments**: [`TournamentSelector`] draws the next parent pool
//!
//! # Pipeline
//!
//! ```
//! use gepa_select::random::create_rng;
//! use gepa_select::{
//!     Candidate, CrowdingDistanceSelector, EliteConfig, EliteSelector, FitnessSharing,
//!     SharingConfig, TournamentConfig, TournamentSelector,
//! };
//!
//! let population: Vec<Candidate> = (0..12)
//!     .map(|i| {
//!         let acc = (i % 4) as f64 / 3.0;
//!         let lat = (i / 4) as f64 / 2.0;
//!         Candidate::new(format!("p{i}"), format!("prompt {i}"))
//!             .with_fitness(acc)
//!             .with_normalized_objective("accuracy", acc)
//!             .with_normalized_objective("latency", lat)
//!     })
//!     .collect();
//!
//! let survivors = CrowdingDistanceSelector::environmental_selection(&population, 8);
//! let shared = FitnessSharing::apply_sharing(&survivors, &SharingConfig::default()).unwrap();
//! let elites = EliteSelector::select_elites(&shared, &EliteConfig::default()).unwrap();
//!
//! let mut rng = create_rng(42);
//! let parents =
//!     TournamentSelector::select(&shared, &TournamentConfig::new(8), &mut rng).unwrap();
//!
//! assert_eq!(survivors.len(), 8);
//! assert_eq!(elites.len(), 1);
//! assert_eq!(parents.len(), 8);
//! ```
//!
//! # Conventions
//!
//! - Normalized objectives are in `[0, 1]` and **higher is better**.
//! - Every stage borrows its input and returns new [`Candidate`] values.
//! - Absent fitness reads as 0.0, absent crowding distance as 0.0, and absent
//!   rank as the worst rank wherever a comparison needs a value.
//!
//! # Features
//!
//! - `parallel`: computes dominance rows, per-front crowding and niche counts
//!   with rayon; results are identical to the sequential path.
//! - `serde`: `Serialize`/`Deserialize` for the data model and configuration.

pub mod candidate;
pub mod elite;
pub mod error;
pub mod pareto;
pub mod random;
pub mod sharing;
pub mod tournament;

pub use candidate::{objective_distance, objective_keys, Annotations, Candidate, CrowdingDistance};
pub use elite::{EliteConfig, EliteSelector};
pub use error::{RankingField, Result, SelectionError};
pub use pareto::{CrowdingDistanceSelector, DominanceComparator, ParetoFronts};
pub use sharing::{
    AdaptiveSharingConfig, DiversityMetric, FitnessSharing, NicheRadiusStrategy, SharingConfig,
    SharingOutcome,
};
pub use tournament::{TournamentConfig, TournamentSelector, TournamentStrategy};
