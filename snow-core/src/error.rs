//! Error types for snow-core.

use thiserror::Error;

/// Configuration rejected by [`crate::config::Config::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Width or height is zero.
    #[error("lattice dimensions must be non-zero, got {width}x{height}")]
    EmptyLattice {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// Dimensions do not fit the signed coordinate space used by walkers.
    #[error("lattice dimensions {width}x{height} exceed the coordinate range")]
    LatticeTooLarge {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// Arm count is odd or smaller than two.
    #[error("arm count must be even and at least 2, got {0}")]
    InvalidArmCount(usize),

    /// Petal sweep is not a finite value in `[0, 1]`.
    #[error("petal sweep must lie in [0, 1], got {0}")]
    InvalidPetalSweep(f32),

    /// Seed-band probability is not a finite value in `[0, 1]`.
    #[error("seed probability must lie in [0, 1], got {0}")]
    InvalidSeedProbability(f64),

    /// No growth would ever run.
    #[error("steps per frame must be at least 1")]
    NoStepsPerFrame,
}
