//! Elitism: deterministic extraction of the best-known candidates.
//!
//! Elites are ranked by Pareto rank first and crowding distance second, so
//! the frontier is preferred and, within a front, isolated candidates are
//! preferred over crowded ones.
//!
//! - [`EliteSelector::select_elites`]: top-K by ratio or count
//! - [`EliteSelector::select_pareto_front_1`]: the non-dominated set
//! - [`EliteSelector::select_elites_preserve_frontier`]: front 1 first, then fill
//! - [`EliteSelector::select_diverse_elites`]: top-K with near-duplicates removed

mod config;
mod selector;

pub use config::EliteConfig;
pub use selector::EliteSelector;
