use glam::{IVec2, Vec2};

/// A cell address on the [`crate::lattice::Lattice`].
///
/// `(0, 0)` is the top-left cell; valid points satisfy
/// `0 <= x < width` and `0 <= y < height`.
pub type GridPoint = IVec2;

/// A point relative to the lattice midpoint, used for symmetry math.
///
/// Converted to and from [`GridPoint`] by translating with
/// `(width / 2, height / 2)`.
pub type Offset = Vec2;
