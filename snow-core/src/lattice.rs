use glam::{IVec2, Vec2};

use crate::types::{GridPoint, Offset};

/// Row-major occupancy grid. A cell is either empty or crystallized.
///
/// Cells only ever go from empty to crystallized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lattice {
    cells: Vec<bool>,
    w: usize,
    h: usize,
}

impl Lattice {
    /// Creates an empty `w x h` lattice.
    ///
    /// Dimensions are expected to be validated beforehand, see
    /// [`crate::config::Config::validate`].
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            cells: vec![false; w * h],
            w,
            h,
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.w
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.h
    }

    /// Occupancy flags in row-major order.
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Grid coordinates of the lattice midpoint.
    #[inline]
    pub fn center(&self) -> GridPoint {
        IVec2::new((self.w / 2) as i32, (self.h / 2) as i32)
    }

    /// The single bounds predicate shared by growth, symmetry placement
    /// and rendering.
    #[inline]
    pub fn in_bounds(&self, p: GridPoint) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.w && (p.y as usize) < self.h
    }

    #[inline]
    fn idx(&self, p: GridPoint) -> usize {
        assert!(
            self.in_bounds(p),
            "lattice access out of bounds: ({}, {}) on {}x{}",
            p.x,
            p.y,
            self.w,
            self.h
        );
        p.y as usize * self.w + p.x as usize
    }

    /// Returns whether `p` is crystallized.
    ///
    /// ### Panics
    /// Panics if `p` is out of bounds; callers check [`Lattice::in_bounds`] first.
    #[inline]
    pub fn is_occupied(&self, p: GridPoint) -> bool {
        self.cells[self.idx(p)]
    }

    /// Crystallizes `p`. Returns `true` if the cell was empty before.
    ///
    /// ### Panics
    /// Panics if `p` is out of bounds.
    #[inline]
    pub fn occupy(&mut self, p: GridPoint) -> bool {
        let i = self.idx(p);
        let was_empty = !self.cells[i];
        self.cells[i] = true;
        was_empty
    }

    /// Number of crystallized cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Grid point -> midpoint-relative offset.
    #[inline]
    pub fn to_centered(&self, p: GridPoint) -> Offset {
        (p - self.center()).as_vec2()
    }

    /// Midpoint-relative offset -> nearest grid point.
    #[inline]
    pub fn to_grid(&self, v: Offset) -> GridPoint {
        Vec2::new(v.x.round(), v.y.round()).as_ivec2() + self.center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_lattice_is_empty() {
        let lattice = Lattice::new(4, 3);
        assert_eq!(lattice.cells().len(), 12);
        assert_eq!(lattice.occupied_count(), 0);
    }

    #[test]
    fn in_bounds_rejects_every_edge() {
        let lattice = Lattice::new(10, 8);

        // Interior.
        assert!(lattice.in_bounds(IVec2::new(5, 4)));

        // Corners that are still inside.
        assert!(lattice.in_bounds(IVec2::new(0, 0)));
        assert!(lattice.in_bounds(IVec2::new(9, 7)));

        // x < 0
        assert!(!lattice.in_bounds(IVec2::new(-1, 4)));
        // x >= width
        assert!(!lattice.in_bounds(IVec2::new(10, 4)));
        // y < 0
        assert!(!lattice.in_bounds(IVec2::new(5, -1)));
        // y >= height
        assert!(!lattice.in_bounds(IVec2::new(5, 8)));
    }

    #[test]
    fn in_bounds_matches_definition_exhaustively() {
        let (w, h) = (6i32, 5i32);
        let lattice = Lattice::new(w as usize, h as usize);
        for y in -2..h + 2 {
            for x in -2..w + 2 {
                let expected = !(x < 0 || x >= w || y < 0 || y >= h);
                assert_eq!(lattice.in_bounds(IVec2::new(x, y)), expected, "({x}, {y})");
            }
        }
    }

    #[test]
    fn occupy_is_idempotent() {
        let mut lattice = Lattice::new(5, 5);
        let p = IVec2::new(2, 3);

        assert!(!lattice.is_occupied(p));
        assert!(lattice.occupy(p));
        assert!(lattice.is_occupied(p));
        assert!(!lattice.occupy(p));
        assert!(lattice.is_occupied(p));
        assert_eq!(lattice.occupied_count(), 1);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn is_occupied_out_of_bounds_panics() {
        let lattice = Lattice::new(5, 5);
        lattice.is_occupied(IVec2::new(5, 0));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn occupy_negative_coordinate_panics() {
        let mut lattice = Lattice::new(5, 5);
        lattice.occupy(IVec2::new(0, -1));
    }

    #[test]
    fn centered_and_grid_coordinates_differ_by_half_extent() {
        let lattice = Lattice::new(600, 400);
        assert_eq!(lattice.center(), IVec2::new(300, 200));
        assert_eq!(lattice.to_centered(IVec2::new(300, 200)), Vec2::ZERO);
        assert_eq!(lattice.to_centered(IVec2::new(0, 0)), Vec2::new(-300.0, -200.0));
        assert_eq!(lattice.to_grid(Vec2::new(10.0, -5.0)), IVec2::new(310, 195));
    }

    #[test]
    fn to_grid_rounds_to_nearest_cell() {
        let lattice = Lattice::new(10, 10);
        assert_eq!(lattice.to_grid(Vec2::new(0.4, -0.4)), IVec2::new(5, 5));
        assert_eq!(lattice.to_grid(Vec2::new(0.6, -0.6)), IVec2::new(6, 4));
    }

    proptest! {
        #[test]
        fn prop_occupancy_never_shrinks(
            ops in prop::collection::vec((0i32..16, 0i32..12), 1..64),
        ) {
            let mut lattice = Lattice::new(16, 12);
            let mut before = lattice.cells().to_vec();

            for (x, y) in ops {
                lattice.occupy(IVec2::new(x, y));
                let after = lattice.cells();
                for (was, now) in before.iter().zip(after) {
                    prop_assert!(!*was || *now);
                }
                before = after.to_vec();
            }
        }
    }
}
