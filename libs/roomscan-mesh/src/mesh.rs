//! # Surface Mesh
//!
//! Indexed triangle geometry of one captured surface, in the surface's own
//! coordinate frame until a pose is applied.

use config::constants::EPSILON;
use glam::{DMat4, DVec3};

/// Indexed triangle mesh with optional per-vertex normals.
///
/// Host buffers arrive as f32; positions are widened to f64 on the way in so
/// pose transforms and normal accumulation do not lose precision.
///
/// # Example
///
/// ```rust
/// use roomscan_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// let a = mesh.add_vertex(DVec3::ZERO);
/// let b = mesh.add_vertex(DVec3::X);
/// let c = mesh.add_vertex(DVec3::Z);
/// mesh.add_triangle(a, c, b);
/// mesh.compute_normals();
/// assert_eq!(mesh.normals().map(|n| n[0]), Some(DVec3::Y));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    positions: Vec<DVec3>,
    faces: Vec<[u32; 3]>,
    /// One entry per position once computed.
    normals: Option<Vec<DVec3>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty mesh with room for `vertices` positions and `triangles` faces.
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(triangles),
            normals: None,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Appends a position and returns its index. Clears stale normals.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        self.normals = None;
        self.positions.push(position);
        (self.positions.len() - 1) as u32
    }

    /// Appends a face.
    ///
    /// Indices are trusted: `build_geometry` range-checks host input before
    /// any face is added.
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.faces.push([a, b, c]);
    }

    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.positions
    }

    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.faces
    }

    pub fn normals(&self) -> Option<&[DVec3]> {
        self.normals.as_deref()
    }

    /// Computes area-weighted vertex normals.
    ///
    /// Every face adds its raw cross product, whose length is twice its
    /// area, to each of its corners; sums are then normalized. A vertex
    /// touched only by zero-area faces, or by none, gets a zero normal.
    pub fn compute_normals(&mut self) {
        let mut sums = vec![DVec3::ZERO; self.positions.len()];

        for &[a, b, c] in &self.faces {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let origin = self.positions[a];
            let weighted = (self.positions[b] - origin).cross(self.positions[c] - origin);
            sums[a] += weighted;
            sums[b] += weighted;
            sums[c] += weighted;
        }

        for sum in &mut sums {
            let length = sum.length();
            *sum = if length > EPSILON {
                *sum / length
            } else {
                DVec3::ZERO
            };
        }

        self.normals = Some(sums);
    }

    /// Axis-aligned `(min, max)` corners; both zero for an empty mesh.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        let Some((first, rest)) = self.positions.split_first() else {
            return (DVec3::ZERO, DVec3::ZERO);
        };
        rest.iter()
            .fold((*first, *first), |(lo, hi), p| (lo.min(*p), hi.max(*p)))
    }

    /// Copy of this mesh with `matrix` applied.
    ///
    /// Normals go through the inverse transpose and are renormalized; zero
    /// normals stay zero.
    pub fn transformed(&self, matrix: &DMat4) -> Mesh {
        let positions = self
            .positions
            .iter()
            .map(|p| matrix.transform_point3(*p))
            .collect();

        let normals = self.normals.as_ref().map(|normals| {
            let normal_matrix = matrix.inverse().transpose();
            normals
                .iter()
                .map(|n| normal_matrix.transform_vector3(*n).normalize_or_zero())
                .collect()
        });

        Mesh {
            positions,
            faces: self.faces.clone(),
            normals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn floor_triangle() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::ZERO);
        mesh.add_vertex(DVec3::X);
        mesh.add_vertex(DVec3::Z);
        mesh.add_triangle(0, 2, 1);
        mesh
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.normals().is_none());
        assert_eq!(mesh.bounding_box(), (DVec3::ZERO, DVec3::ZERO));
    }

    #[test]
    fn test_floor_triangle_faces_up() {
        let mut mesh = floor_triangle();
        mesh.compute_normals();
        for n in mesh.normals().unwrap() {
            assert_relative_eq!(n.y, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_adding_vertex_clears_normals() {
        let mut mesh = floor_triangle();
        mesh.compute_normals();
        mesh.add_vertex(DVec3::ONE);
        assert!(mesh.normals().is_none());
    }

    /// A wall and a small floor patch share a corner; the wall is 100x larger.
    #[test]
    fn test_larger_face_dominates_shared_corner() {
        let mut mesh = Mesh::new();
        let corner = mesh.add_vertex(DVec3::ZERO);
        let fx = mesh.add_vertex(DVec3::X);
        let fz = mesh.add_vertex(DVec3::Z);
        let wx = mesh.add_vertex(DVec3::new(10.0, 0.0, 0.0));
        let wy = mesh.add_vertex(DVec3::new(0.0, 10.0, 0.0));
        mesh.add_triangle(corner, fz, fx); // floor, +Y
        mesh.add_triangle(corner, wx, wy); // wall, +Z
        mesh.compute_normals();

        let n = mesh.normals().unwrap()[corner as usize];
        assert!(n.z > n.y * 10.0, "wall should dominate: {n:?}");
        assert_relative_eq!(n.length(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unused_vertex_has_zero_normal() {
        let mut mesh = floor_triangle();
        mesh.add_vertex(DVec3::splat(4.0));
        mesh.compute_normals();
        assert_eq!(mesh.normals().unwrap()[3], DVec3::ZERO);
    }

    #[test]
    fn test_bounding_box_spans_extremes() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::new(2.0, -1.0, 0.5));
        mesh.add_vertex(DVec3::new(-3.0, 4.0, 0.0));
        assert_eq!(
            mesh.bounding_box(),
            (DVec3::new(-3.0, -1.0, 0.0), DVec3::new(2.0, 4.0, 0.5))
        );
    }

    #[test]
    fn test_transformed_applies_pose_and_rotates_normals() {
        let mut mesh = floor_triangle();
        mesh.compute_normals();

        // Quarter turn about X tips the floor up into a wall
        let matrix = DMat4::from_rotation_translation(
            glam::DQuat::from_rotation_x(std::f64::consts::FRAC_PI_2),
            DVec3::new(1.0, 2.0, 3.0),
        );
        let wall = mesh.transformed(&matrix);

        assert_relative_eq!(wall.vertices()[0].x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(wall.vertices()[0].y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(wall.vertices()[0].z, 3.0, epsilon = 1e-12);
        assert_relative_eq!(wall.normals().unwrap()[0].z, 1.0, epsilon = 1e-12);
        assert_eq!(wall.triangles(), mesh.triangles());
        assert_eq!(mesh.vertices()[0], DVec3::ZERO);
    }
}
