//! Single random-walk growth trials.
//!
//! A walker launches from a random polar position inside the first
//! angular sector and wanders on the 8-connected grid until it either
//! leaves the lattice or lands next to crystal. On contact its position
//! and every symmetric counterpart crystallize.

use std::f32::consts::TAU;

use glam::{IVec2, Vec2};
use rand::Rng;
use tracing::trace;

use crate::lattice::Lattice;
use crate::symmetry::reflect;
use crate::types::GridPoint;

/// Neighbors inspected for contact.
///
/// The last slot repeats `(0, -1)` where the `(1, 1)` diagonal would be,
/// so contact through the lower-right diagonal is never detected. Changing
/// it alters the grown pattern.
pub const CONTACT_OFFSETS: [IVec2; 8] = [
    IVec2::new(-1, -1),
    IVec2::new(0, -1),
    IVec2::new(1, -1),
    IVec2::new(-1, 0),
    IVec2::new(1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, 1),
    IVec2::new(0, -1),
];

/// Unit moves available to a walker.
pub const STEP_DIRECTIONS: [IVec2; 8] = [
    IVec2::new(-1, -1),
    IVec2::new(0, -1),
    IVec2::new(1, -1),
    IVec2::new(-1, 0),
    IVec2::new(1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, 1),
    IVec2::new(1, 1),
];

/// How a trial ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The walker touched crystal; `cells` counts newly occupied cells,
    /// which may be zero if every counterpart was already crystallized.
    Crystallized { cells: usize },
    /// The walker left the lattice without touching anything.
    Escaped,
}

/// Draws a launch angle inside the first sector of width `2π / arm_count`.
///
/// `petal_sweep` scales the sub-range around the sector's center line:
/// `1.0` spans the whole sector, `0.0` always returns the center line.
pub fn launch_angle(arm_count: usize, petal_sweep: f32, rng: &mut impl Rng) -> f32 {
    let half_sector = TAU / arm_count as f32 / 2.0;
    let u: f32 = rng.random_range(-1.0..=1.0);
    half_sector + u * half_sector * petal_sweep
}

/// Draws a launch point, in grid coordinates.
pub fn launch_point(
    lattice: &Lattice,
    arm_count: usize,
    petal_sweep: f32,
    rng: &mut impl Rng,
) -> GridPoint {
    let angle = launch_angle(arm_count, petal_sweep, rng);
    let max_radius = lattice.width().min(lattice.height()) as f32 / 2.0;
    let radius: f32 = rng.random_range(0.0..max_radius);
    lattice.to_grid(Vec2::from_angle(angle) * radius)
}

/// Whether any in-bounds contact neighbor of `p` is crystallized.
pub fn touches_crystal(lattice: &Lattice, p: GridPoint) -> bool {
    CONTACT_OFFSETS.iter().any(|&d| {
        let n = p + d;
        lattice.in_bounds(n) && lattice.is_occupied(n)
    })
}

/// Crystallizes `p` and all of its in-bounds symmetric counterparts.
///
/// ### Parameters
/// - `lattice` - The grid to mutate.
/// - `p` - Contact point, in grid coordinates.
/// - `arm_count` - Symmetry order used to place counterparts.
///
/// ### Returns
/// The number of cells that were newly occupied.
pub fn crystallize(lattice: &mut Lattice, p: GridPoint, arm_count: usize) -> usize {
    let targets: Vec<GridPoint> = reflect(lattice.to_centered(p), arm_count)
        .into_iter()
        .map(|v| lattice.to_grid(v))
        .filter(|&q| lattice.in_bounds(q))
        .collect();

    targets.into_iter().filter(|&q| lattice.occupy(q)).count()
}

/// Random-walks from `start` until contact or escape.
///
/// The bounds check runs before every contact check, so a walker that
/// starts outside the lattice escapes immediately.
///
/// ### Parameters
/// - `lattice` - The grid to walk on; mutated only on contact.
/// - `start` - Launch position, in grid coordinates.
/// - `arm_count` - Symmetry order passed to [`crystallize`].
/// - `rng` - Source for the step directions.
///
/// ### Returns
/// [`StepOutcome::Crystallized`] on contact, [`StepOutcome::Escaped`] once
/// the walker leaves the grid.
pub fn walk_from(
    lattice: &mut Lattice,
    start: GridPoint,
    arm_count: usize,
    rng: &mut impl Rng,
) -> StepOutcome {
    let mut p = start;
    let mut steps = 0usize;

    loop {
        if !lattice.in_bounds(p) {
            trace!(?start, steps, "walker escaped");
            return StepOutcome::Escaped;
        }

        if touches_crystal(lattice, p) {
            let cells = crystallize(lattice, p, arm_count);
            trace!(?start, at = ?p, steps, cells, "walker crystallized");
            return StepOutcome::Crystallized { cells };
        }

        p += STEP_DIRECTIONS[rng.random_range(0..STEP_DIRECTIONS.len())];
        steps += 1;
    }
}

/// Runs one full trial: launch, walk, and crystallize on contact.
pub fn grow_step(
    lattice: &mut Lattice,
    arm_count: usize,
    petal_sweep: f32,
    rng: &mut impl Rng,
) -> StepOutcome {
    let start = launch_point(lattice, arm_count, petal_sweep, rng);
    walk_from(lattice, start, arm_count, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn contact_offsets_repeat_up_and_skip_lower_right() {
        let up = IVec2::new(0, -1);
        assert_eq!(CONTACT_OFFSETS.iter().filter(|&&d| d == up).count(), 2);
        assert!(!CONTACT_OFFSETS.contains(&IVec2::new(1, 1)));
    }

    #[test]
    fn step_directions_cover_all_eight_neighbors() {
        for dy in -1..=1 {
            for dx in -1..=1 {
                let d = IVec2::new(dx, dy);
                assert_eq!(STEP_DIRECTIONS.contains(&d), d != IVec2::ZERO);
            }
        }
    }

    #[test]
    fn lower_right_diagonal_is_not_contact() {
        let mut lattice = Lattice::new(9, 9);
        lattice.occupy(IVec2::new(5, 5));
        assert!(!touches_crystal(&lattice, IVec2::new(4, 4)));
        // Upper-left diagonal is seen.
        assert!(touches_crystal(&lattice, IVec2::new(6, 6)));
        // Axis neighbors are seen.
        assert!(touches_crystal(&lattice, IVec2::new(4, 5)));
        assert!(touches_crystal(&lattice, IVec2::new(5, 4)));
    }

    #[test]
    fn touches_crystal_ignores_out_of_bounds_neighbors() {
        let lattice = Lattice::new(3, 3);
        // Corner cell has most of its neighborhood outside the grid.
        assert!(!touches_crystal(&lattice, IVec2::new(0, 0)));
        assert!(!touches_crystal(&lattice, IVec2::new(2, 2)));
    }

    #[test]
    fn launch_angle_with_zero_sweep_is_sector_center() {
        let mut rng = StdRng::seed_from_u64(7);
        let expected = TAU / 12.0 / 2.0;
        for _ in 0..32 {
            let a = launch_angle(12, 0.0, &mut rng);
            assert!((a - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn launch_angle_stays_inside_the_sector() {
        let mut rng = StdRng::seed_from_u64(11);
        let sector = TAU / 6.0;
        for _ in 0..1000 {
            let a = launch_angle(6, 1.0, &mut rng);
            assert!((0.0..=sector + 1e-6).contains(&a), "angle {a}");

            let narrow = launch_angle(6, 0.5, &mut rng);
            assert!(narrow >= sector * 0.25 - 1e-6 && narrow <= sector * 0.75 + 1e-6);
        }
    }

    #[test]
    fn launch_point_is_within_radius_of_center() {
        let lattice = Lattice::new(100, 60);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let p = launch_point(&lattice, 12, 1.0, &mut rng);
            let offset = lattice.to_centered(p);
            assert!(offset.length() <= 30.0 + 1.0, "{p:?}");
        }
    }

    #[test]
    fn crystallize_places_all_counterparts() {
        let mut lattice = Lattice::new(21, 21);
        let center = lattice.center();

        let cells = crystallize(&mut lattice, center + IVec2::new(5, 0), 4);

        // (5, 0) and its mirror coincide, as do the rotated pair.
        assert_eq!(cells, 2);
        assert!(lattice.is_occupied(center + IVec2::new(5, 0)));
        assert!(lattice.is_occupied(center + IVec2::new(-5, 0)));
    }

    #[test]
    fn crystallize_twice_adds_nothing_new() {
        let mut lattice = Lattice::new(31, 31);
        let p = lattice.center() + IVec2::new(7, 3);

        let first = crystallize(&mut lattice, p, 12);
        let occupied = lattice.occupied_count();

        assert_eq!(first, occupied);
        assert_eq!(crystallize(&mut lattice, p, 12), 0);
        assert_eq!(lattice.occupied_count(), occupied);
    }

    #[test]
    fn crystallize_skips_counterparts_off_the_grid() {
        // Wide but short: rotated copies of a far-right point fall outside.
        let mut lattice = Lattice::new(41, 5);
        let center = lattice.center();

        let cells = crystallize(&mut lattice, center + IVec2::new(15, 1), 12);

        assert!(cells >= 2);
        assert!(lattice.is_occupied(center + IVec2::new(15, 1)));
        assert!(lattice.is_occupied(center + IVec2::new(15, -1)));
        assert_eq!(lattice.occupied_count(), cells);
    }

    #[test]
    fn walk_from_outside_leaves_lattice_untouched() {
        let mut lattice = Lattice::new(10, 10);
        lattice.occupy(IVec2::new(5, 5));
        let before = lattice.clone();
        let mut rng = StdRng::seed_from_u64(1);

        for start in [
            IVec2::new(-1, 5),
            IVec2::new(10, 5),
            IVec2::new(5, -3),
            IVec2::new(5, 10),
        ] {
            assert_eq!(
                walk_from(&mut lattice, start, 12, &mut rng),
                StepOutcome::Escaped
            );
        }
        assert_eq!(lattice, before);
    }

    #[test]
    fn walk_next_to_crystal_sticks_immediately() {
        let mut lattice = Lattice::new(11, 11);
        let center = lattice.center();
        lattice.occupy(center);
        let mut rng = StdRng::seed_from_u64(5);

        let start = center + IVec2::new(1, 0);
        let outcome = walk_from(&mut lattice, start, 2, &mut rng);

        assert_eq!(outcome, StepOutcome::Crystallized { cells: 1 });
        assert!(lattice.is_occupied(start));
    }

    #[test]
    fn walk_on_empty_lattice_always_escapes() {
        let mut lattice = Lattice::new(16, 16);
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            let outcome = grow_step(&mut lattice, 12, 1.0, &mut rng);
            assert_eq!(outcome, StepOutcome::Escaped);
        }
        assert_eq!(lattice.occupied_count(), 0);
    }

    #[test]
    fn grow_step_only_adds_cells() {
        let mut lattice = Lattice::new(40, 40);
        let center = lattice.center();
        for dx in 0..10 {
            lattice.occupy(center + IVec2::new(dx, 0));
        }
        let mut rng = StdRng::seed_from_u64(2024);

        for _ in 0..200 {
            let before = lattice.clone();
            grow_step(&mut lattice, 12, 1.0, &mut rng);
            for (was, now) in before.cells().iter().zip(lattice.cells()) {
                assert!(!*was || *now);
            }
        }
        assert!(lattice.occupied_count() > 10);
    }
}
