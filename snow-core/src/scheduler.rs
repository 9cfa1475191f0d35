//! Frame-driven scheduling of growth trials.
//!
//! The typical run looks like:
//! 1. [`seed_band`] crystallizes a random stretch of the midpoint row so
//!    walkers have something to stick to.
//! 2. [`GrowthScheduler::tick`] is called once per frame, runs a fixed
//!    number of [`grow_step`] trials and then counts the frame.
//! 3. Once the count passes `max_frames` the scheduler halts for good.

use glam::IVec2;
use rand::Rng;
use tracing::{debug, info};

use crate::config::Config;
use crate::growth::{StepOutcome, grow_step};
use crate::lattice::Lattice;

/// Result of one [`GrowthScheduler::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickStatus {
    Running,
    Stopped,
}

/// Columns of the seed band, `[w/2 + w/8, w - w/16)`.
pub fn seed_band_columns(width: usize) -> std::ops::Range<usize> {
    let start = width / 2 + width / 8;
    let end = width - width / 16;
    start..end.max(start)
}

/// Crystallizes each seed-band column on the midpoint row with
/// probability `probability`.
///
/// ### Parameters
/// - `lattice` - Freshly allocated grid to seed.
/// - `probability` - Chance that each column starts crystallized.
/// - `rng` - Random source; one draw per column.
///
/// ### Returns
/// The number of cells newly occupied.
///
/// ### Panics
/// Panics if `probability` is outside `[0, 1]`.
pub fn seed_band(lattice: &mut Lattice, probability: f64, rng: &mut impl Rng) -> usize {
    let row = (lattice.height() / 2) as i32;
    let mut seeded = 0;
    for x in seed_band_columns(lattice.width()) {
        if rng.random_bool(probability) && lattice.occupy(IVec2::new(x as i32, row)) {
            seeded += 1;
        }
    }
    seeded
}

/// Runs growth trials per frame and stops the simulation after a frame budget.
#[derive(Clone, Debug)]
pub struct GrowthScheduler {
    arm_count: usize,
    petal_sweep: f32,
    steps_per_frame: usize,
    max_frames: u32,
    frame: u32,
    halted: bool,
}

impl GrowthScheduler {
    /// Creates a scheduler at frame 0 using the growth parameters in `cfg`.
    pub fn new(cfg: &Config) -> Self {
        Self {
            arm_count: cfg.arm_count,
            petal_sweep: cfg.petal_sweep,
            steps_per_frame: cfg.steps_per_frame,
            max_frames: cfg.max_frames,
            frame: 0,
            halted: false,
        }
    }

    /// Number of ticks counted so far.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Frame budget; the tick that passes it halts the run.
    pub fn max_frames(&self) -> u32 {
        self.max_frames
    }

    /// Whether the frame budget has been exhausted.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Advances one frame.
    ///
    /// ### Parameters
    /// - `lattice` - Crystal grid the trials grow into.
    /// - `rng` - Random source shared by every trial of the run.
    ///
    /// ### Returns
    /// Every tick runs `steps_per_frame` trials and then counts the frame.
    /// Ticks `1..=max_frames` report [`TickStatus::Running`]; the tick that
    /// pushes the counter past `max_frames` still grows, then halts and
    /// reports [`TickStatus::Stopped`]. Once halted, ticks do nothing and
    /// keep returning [`TickStatus::Stopped`].
    pub fn tick(&mut self, lattice: &mut Lattice, rng: &mut impl Rng) -> TickStatus {
        if self.halted {
            return TickStatus::Stopped;
        }

        let mut contacts = 0usize;
        for _ in 0..self.steps_per_frame {
            if let StepOutcome::Crystallized { .. } =
                grow_step(lattice, self.arm_count, self.petal_sweep, rng)
            {
                contacts += 1;
            }
        }
        self.frame = self.frame.saturating_add(1);
        debug!(frame = self.frame, contacts, "frame grown");

        if self.frame > self.max_frames {
            self.halted = true;
            info!(
                frames = self.max_frames,
                occupied = lattice.occupied_count(),
                "frame budget exhausted, growth halted"
            );
            return TickStatus::Stopped;
        }

        TickStatus::Running
    }
}
