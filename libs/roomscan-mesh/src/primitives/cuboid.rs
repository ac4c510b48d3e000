//! # Box Primitive
//!
//! Generates the rectangular prism used to give detected planes volume in
//! the exported mesh.

use crate::error::{GeometryError, GeometryResult};
use crate::mesh::Mesh;
use glam::DVec3;

/// Corner `i` takes the max coordinate on X when bit 0 is set, on Y for
/// bit 1 and on Z for bit 2.
const BOX_FACES: [[u32; 3]; 12] = [
    [0, 1, 5], [0, 5, 4], // -Y
    [2, 6, 7], [2, 7, 3], // +Y
    [0, 2, 3], [0, 3, 1], // -Z
    [4, 5, 7], [4, 7, 6], // +Z
    [0, 4, 6], [0, 6, 2], // -X
    [1, 3, 7], [1, 7, 5], // +X
];

/// Builds an axis-aligned slab of `size`, centred on the origin when
/// `center` is set and spanning `0..size` otherwise.
///
/// The result has 8 corners, 12 outward-wound triangles and normals.
///
/// # Example
///
/// ```rust
/// use roomscan_mesh::primitives::create_box;
/// use glam::DVec3;
///
/// // A 2 m x 3 m floor plane, 1 cm thick
/// let mesh = create_box(DVec3::new(2.0, 0.01, 3.0), true).unwrap();
/// assert_eq!(mesh.vertex_count(), 8);
/// assert_eq!(mesh.triangle_count(), 12);
/// ```
pub fn create_box(size: DVec3, center: bool) -> GeometryResult<Mesh> {
    if !size.is_finite() || size.min_element() <= 0.0 {
        return Err(GeometryError::degenerate(format!(
            "slab extents must be finite and positive, got {size:?}"
        )));
    }

    let low = if center { -size * 0.5 } else { DVec3::ZERO };
    let high = low + size;

    let mut mesh = Mesh::with_capacity(8, BOX_FACES.len());
    for corner in 0..8u32 {
        let pick = |bit: u32, lo: f64, hi: f64| if corner & bit == 0 { lo } else { hi };
        mesh.add_vertex(DVec3::new(
            pick(1, low.x, high.x),
            pick(2, low.y, high.y),
            pick(4, low.z, high.z),
        ));
    }
    for [a, b, c] in BOX_FACES {
        mesh.add_triangle(a, b, c);
    }

    mesh.compute_normals();
    Ok(mesh)
}
