//! Fitness sharing configuration.

use crate::error::{Result, SelectionError};

/// Default niche radius for [`SharingConfig`] and [`NicheRadiusStrategy::Fixed`].
pub const DEFAULT_NICHE_RADIUS: f64 = 0.1;

/// Default base radius for [`NicheRadiusStrategy::PopulationBased`].
///
/// With 100 candidates this yields the same radius as the fixed default.
pub const DEFAULT_BASE_RADIUS: f64 = 1.0;

/// Default hypercube-diagonal fraction for [`NicheRadiusStrategy::ObjectiveRange`].
pub const DEFAULT_RANGE_FRACTION: f64 = 0.1;

/// Lower bound returned by [`NicheRadiusStrategy::Adaptive`].
pub const DEFAULT_ADAPTIVE_FLOOR: f64 = 0.1;

/// Multiplier applied to the mean pairwise distance by [`NicheRadiusStrategy::Adaptive`].
pub const DEFAULT_ADAPTIVE_SCALE: f64 = 0.5;

fn require_positive(option: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SelectionError::invalid(
            option,
            format!("must be a positive finite number, got {value}"),
        ))
    }
}

/// Parameters for [`FitnessSharing::apply_sharing`](super::FitnessSharing::apply_sharing).
///
/// # Defaults
///
/// ```
/// use gepa_select::sharing::SharingConfig;
///
/// let config = SharingConfig::default();
/// assert_eq!(config.niche_radius, 0.1);
/// assert_eq!(config.sharing_alpha, 1.0);
/// assert!(config.preserve_raw_fitness);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SharingConfig {
    /// Distance beyond which two candidates do not share fitness (σ_share).
    pub niche_radius: f64,

    /// Shape of the sharing function; 1.0 is triangular.
    pub sharing_alpha: f64,

    /// Store the pre-sharing fitness and niche count in `metadata`.
    pub preserve_raw_fitness: bool,
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            niche_radius: DEFAULT_NICHE_RADIUS,
            sharing_alpha: 1.0,
            preserve_raw_fitness: true,
        }
    }
}

impl SharingConfig {
    /// Sets the niche radius.
    pub fn with_niche_radius(mut self, radius: f64) -> Self {
        self.niche_radius = radius;
        self
    }

    /// Sets the sharing exponent.
    pub fn with_sharing_alpha(mut self, alpha: f64) -> Self {
        self.sharing_alpha = alpha;
        self
    }

    /// Enables or disables stashing raw fitness in metadata.
    pub fn with_preserve_raw_fitness(mut self, preserve: bool) -> Self {
        self.preserve_raw_fitness = preserve;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        require_positive("niche_radius", self.niche_radius)?;
        require_positive("sharing_alpha", self.sharing_alpha)
    }
}

/// How [`FitnessSharing::calculate_niche_radius`](super::FitnessSharing::calculate_niche_radius)
/// derives a radius from the population.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "strategy", rename_all = "snake_case")
)]
pub enum NicheRadiusStrategy {
    /// A caller-specified constant.
    Fixed {
        /// Radius returned as-is.
        radius: f64,
    },

    /// `base_radius / sqrt(population_size)`: denser populations get
    /// smaller niches.
    PopulationBased {
        /// Radius for a population of one.
        base_radius: f64,
    },

    /// `fraction * sqrt(objective_count)`, a fraction of the unit
    /// hypercube's diagonal.
    ObjectiveRange {
        /// Fraction of the diagonal.
        fraction: f64,
    },

    /// `scale * mean_pairwise_distance`, never below `floor`.
    Adaptive {
        /// Smallest radius returned.
        floor: f64,
        /// Multiplier on the mean pairwise distance.
        scale: f64,
    },
}

impl Default for NicheRadiusStrategy {
    fn default() -> Self {
        Self::fixed()
    }
}

impl NicheRadiusStrategy {
    /// Fixed strategy with the default radius.
    pub fn fixed() -> Self {
        Self::Fixed {
            radius: DEFAULT_NICHE_RADIUS,
        }
    }

    /// Population-based strategy with the default base radius.
    pub fn population_based() -> Self {
        Self::PopulationBased {
            base_radius: DEFAULT_BASE_RADIUS,
        }
    }

    /// Objective-range strategy with the default fraction.
    pub fn objective_range() -> Self {
        Self::ObjectiveRange {
            fraction: DEFAULT_RANGE_FRACTION,
        }
    }

    /// Adaptive strategy with the default floor and scale.
    pub fn adaptive() -> Self {
        Self::Adaptive {
            floor: DEFAULT_ADAPTIVE_FLOOR,
            scale: DEFAULT_ADAPTIVE_SCALE,
        }
    }

    /// Validates the strategy parameters.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Fixed { radius } => require_positive("radius", radius),
            Self::PopulationBased { base_radius } => require_positive("base_radius", base_radius),
            Self::ObjectiveRange { fraction } => require_positive("fraction", fraction),
            Self::Adaptive { floor, scale } => {
                require_positive("floor", floor)?;
                require_positive("scale", scale)
            }
        }
    }
}

/// Population diversity measure used to decide whether sharing is needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum DiversityMetric {
    /// Mean of the finite (non-boundary) crowding distances.
    #[default]
    Crowding,

    /// Mean pairwise objective-space distance divided by the unit
    /// hypercube diagonal, in `[0, 1]`.
    PairwiseDistance,
}

/// Parameters for [`FitnessSharing::adaptive_apply_sharing`](super::FitnessSharing::adaptive_apply_sharing).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdaptiveSharingConfig {
    /// Sharing is applied when diversity falls strictly below this value.
    pub diversity_threshold: f64,

    /// How diversity is measured.
    pub diversity_metric: DiversityMetric,

    /// Sharing parameters used when sharing is applied.
    pub sharing: SharingConfig,
}

impl Default for AdaptiveSharingConfig {
    fn default() -> Self {
        Self {
            diversity_threshold: 0.3,
            diversity_metric: DiversityMetric::default(),
            sharing: SharingConfig::default(),
        }
    }
}

impl AdaptiveSharingConfig {
    /// Sets the diversity threshold.
    pub fn with_diversity_threshold(mut self, threshold: f64) -> Self {
        self.diversity_threshold = threshold;
        self
    }

    /// Sets the diversity metric.
    pub fn with_diversity_metric(mut self, metric: DiversityMetric) -> Self {
        self.diversity_metric = metric;
        self
    }

    /// Sets the sharing parameters.
    pub fn with_sharing(mut self, sharing: SharingConfig) -> Self {
        self.sharing = sharing;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.diversity_threshold.is_finite() || self.diversity_threshold < 0.0 {
            return Err(SelectionError::invalid(
                "diversity_threshold",
                format!("must be a non-negative finite number, got {}", self.diversity_threshold),
            ));
        }
        self.sharing.validate()
    }
}
