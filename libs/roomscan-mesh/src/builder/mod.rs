//! # Geometry Builder
//!
//! Converts the flat buffers a host reports for a detected mesh into a
//! validated [`Mesh`] with per-vertex normals.
//!
//! ## Validation Order
//!
//! 1. Buffer lengths (stride 3 for both vertices and indices)
//! 2. Size limits
//! 3. Every index `< vertex_count`, checked before any vertex is read
//! 4. Finite coordinates

#[cfg(test)]
mod tests;

use config::constants::{MAX_TRIANGLES, MAX_VERTICES};
use glam::DVec3;

use crate::error::{GeometryError, GeometryResult};
use crate::mesh::Mesh;

/// Builds mesh geometry from raw vertex and triangle index buffers.
///
/// # Arguments
///
/// * `vertices` - Flat `[x, y, z, x, y, z, ...]` positions in session units
/// * `indices` - Flat triangle list, three indices per triangle
///
/// # Returns
///
/// A mesh whose normals are always present and have one entry per vertex.
///
/// # Errors
///
/// Any out-of-range index fails the whole call with
/// [`GeometryError::IndexOutOfRange`]; nothing is read through it.
///
/// # Example
///
/// ```rust
/// use roomscan_mesh::{build_geometry, GeometryError};
///
/// let quad = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0];
/// let mesh = build_geometry(&quad, &[0, 2, 1, 0, 3, 2]).unwrap();
/// assert_eq!(mesh.triangle_count(), 2);
///
/// let err = build_geometry(&quad, &[0, 1, 4]).unwrap_err();
/// assert!(matches!(err, GeometryError::IndexOutOfRange { index: 4, .. }));
/// ```
pub fn build_geometry(vertices: &[f32], indices: &[u32]) -> GeometryResult<Mesh> {
    if vertices.len() % 3 != 0 {
        return Err(GeometryError::VertexStride {
            len: vertices.len(),
        });
    }
    if indices.len() % 3 != 0 {
        return Err(GeometryError::IndexStride { len: indices.len() });
    }

    let vertex_count = vertices.len() / 3;
    let triangle_count = indices.len() / 3;

    if vertex_count > MAX_VERTICES {
        return Err(GeometryError::TooManyVertices {
            count: vertex_count,
            max: MAX_VERTICES,
        });
    }
    if triangle_count > MAX_TRIANGLES {
        return Err(GeometryError::TooManyTriangles {
            count: triangle_count,
            max: MAX_TRIANGLES,
        });
    }

    if let Some((position, &index)) = indices
        .iter()
        .enumerate()
        .find(|&(_, &index)| index as usize >= vertex_count)
    {
        return Err(GeometryError::IndexOutOfRange {
            position,
            index,
            vertex_count,
        });
    }

    let mut mesh = Mesh::with_capacity(vertex_count, triangle_count);

    for (vertex, xyz) in vertices.chunks_exact(3).enumerate() {
        if !xyz.iter().all(|c| c.is_finite()) {
            return Err(GeometryError::NonFiniteVertex { vertex });
        }
        mesh.add_vertex(DVec3::new(xyz[0] as f64, xyz[1] as f64, xyz[2] as f64));
    }

    for tri in indices.chunks_exact(3) {
        mesh.add_triangle(tri[0], tri[1], tri[2]);
    }

    mesh.compute_normals();
    Ok(mesh)
}
