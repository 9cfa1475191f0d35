use crate::error::ConfigError;

/// Fixed simulation parameters, chosen at startup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    /// Symmetric copies per crystallized point. Even, at least 2.
    pub arm_count: usize,
    pub steps_per_frame: usize,
    /// Last frame that still grows; the tick after it halts the run.
    pub max_frames: u32,
    /// Fraction of each angular sector walkers launch from.
    pub petal_sweep: f32,
    /// Chance that each seed-band column starts crystallized.
    pub seed_probability: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            arm_count: 12,
            steps_per_frame: 2,
            max_frames: 500,
            petal_sweep: 1.0,
            seed_probability: 0.25,
        }
    }
}

impl Config {
    /// Checks every parameter, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyLattice {
                width: self.width,
                height: self.height,
            });
        }
        if i32::try_from(self.width).is_err() || i32::try_from(self.height).is_err() {
            return Err(ConfigError::LatticeTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        if self.arm_count < 2 || self.arm_count % 2 != 0 {
            return Err(ConfigError::InvalidArmCount(self.arm_count));
        }
        if !(0.0..=1.0).contains(&self.petal_sweep) {
            return Err(ConfigError::InvalidPetalSweep(self.petal_sweep));
        }
        if !(0.0..=1.0).contains(&self.seed_probability) {
            return Err(ConfigError::InvalidSeedProbability(self.seed_probability));
        }
        if self.steps_per_frame == 0 {
            return Err(ConfigError::NoStepsPerFrame);
        }
        Ok(())
    }
}
