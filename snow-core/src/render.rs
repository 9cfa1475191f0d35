use crate::lattice::Lattice;

/// Color of empty cells.
pub const BACKGROUND: [u8; 4] = [0, 0, 0, 255];

/// Paints `lattice` into an RGBA8 buffer, row-major.
///
/// Crystallized cells take `rgb` at full opacity, empty cells are
/// [`BACKGROUND`].
///
/// ### Panics
/// Panics if `rgba.len() != width * height * 4`.
pub fn render_rgba(lattice: &Lattice, rgb: [u8; 3], rgba: &mut [u8]) {
    assert_eq!(
        rgba.len(),
        lattice.width() * lattice.height() * 4,
        "pixel buffer does not match lattice size"
    );

    let crystal = [rgb[0], rgb[1], rgb[2], 255];
    for (&occupied, out) in lattice.cells().iter().zip(rgba.chunks_exact_mut(4)) {
        out.copy_from_slice(if occupied { &crystal } else { &BACKGROUND });
    }
}

/// Allocating variant of [`render_rgba`].
pub fn render_rgba_vec(lattice: &Lattice, rgb: [u8; 3]) -> Vec<u8> {
    let mut rgba = vec![0u8; lattice.width() * lattice.height() * 4];
    render_rgba(lattice, rgb, &mut rgba);
    rgba
}
