use rand::Rng;
use tracing::info;

use crate::color::ColorState;
use crate::config::Config;
use crate::error::ConfigError;
use crate::lattice::Lattice;
use crate::render::render_rgba;
use crate::scheduler::{GrowthScheduler, TickStatus, seed_band};

/// Everything one snowflake run needs: configuration, the lattice, the
/// frame scheduler, the random source and the shared tint.
///
/// The lattice is written only from [`Simulation::tick`]; the tint may be
/// changed from any thread through a clone of [`Simulation::color`].
pub struct Simulation<R> {
    cfg: Config,
    lattice: Lattice,
    scheduler: GrowthScheduler,
    rng: R,
    color: ColorState,
}

impl<R: Rng> Simulation<R> {
    /// Validates `cfg`, allocates the lattice and seeds it.
    pub fn new(cfg: Config, rng: R) -> Result<Self, ConfigError> {
        Self::with_color(cfg, rng, ColorState::default())
    }

    /// Like [`Simulation::new`], sharing an existing tint.
    ///
    /// ### Parameters
    /// - `cfg` - Run parameters; rejected if [`Config::validate`] fails.
    /// - `rng` - Random source for seeding and every later trial.
    /// - `color` - Tint read when rendering; clones stay connected.
    ///
    /// ### Returns
    /// A seeded simulation at frame 0, or the first configuration problem.
    pub fn with_color(cfg: Config, mut rng: R, color: ColorState) -> Result<Self, ConfigError> {
        cfg.validate()?;

        let mut lattice = Lattice::new(cfg.width, cfg.height);
        let seeded = seed_band(&mut lattice, cfg.seed_probability, &mut rng);
        info!(
            width = cfg.width,
            height = cfg.height,
            arms = cfg.arm_count,
            seeded,
            "lattice seeded"
        );

        Ok(Self {
            scheduler: GrowthScheduler::new(&cfg),
            cfg,
            lattice,
            rng,
            color,
        })
    }

    /// Advances one frame, see [`GrowthScheduler::tick`].
    pub fn tick(&mut self) -> TickStatus {
        self.scheduler.tick(&mut self.lattice, &mut self.rng)
    }

    /// Paints the lattice with the current tint into `rgba`.
    pub fn render_rgba(&self, rgba: &mut [u8]) {
        render_rgba(&self.lattice, self.color.rgb(), rgba);
    }

    /// Parameters this run was created with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Current crystal grid.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Shared tint; clone it to drive the color from another thread.
    pub fn color(&self) -> &ColorState {
        &self.color
    }

    /// Ticks counted so far, see [`GrowthScheduler::frame`].
    pub fn frame(&self) -> u32 {
        self.scheduler.frame()
    }

    /// Whether the frame budget is spent and growth has stopped.
    pub fn is_halted(&self) -> bool {
        self.scheduler.is_halted()
    }
}
