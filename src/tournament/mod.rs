//! Tournament selection over ranked populations.
//!
//! Parents for the next generation are drawn by repeated tournaments: a
//! handful of distinct candidates is sampled uniformly and the best under a
//! comparator wins. Tournament size controls selection pressure.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Deb et al. (2002), crowded-comparison operator in NSGA-II

mod config;
mod selector;

pub use config::{TournamentConfig, TournamentStrategy};
pub use selector::TournamentSelector;
