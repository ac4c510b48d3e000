//! # Room Scan Mesh
//!
//! Geometry for surfaces captured from an AR session.
//! Turns raw host buffers into validated triangle meshes with normals.
//!
//! ## Architecture
//!
//! ```text
//! host buffers (f32 vertices, u32 indices) → build_geometry → Mesh
//! plane extent + pose                      → create_box     → Mesh
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use roomscan_mesh::build_geometry;
//!
//! let vertices = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];
//! let mesh = build_geometry(&vertices, &[0, 2, 1]).unwrap();
//! assert_eq!(mesh.vertex_count(), 3);
//! assert_eq!(mesh.normals().map(|n| n.len()), Some(3));
//! ```

pub mod builder;
pub mod error;
pub mod mesh;
pub mod primitives;
pub mod surface;
pub mod transform;

pub use builder::build_geometry;
pub use error::{GeometryError, GeometryResult};
pub use mesh::Mesh;
pub use primitives::create_box;
pub use surface::{plane_bounds, plane_dimensions, DetectedSurface, PlaneDimensions, SurfaceId, SurfaceKind};
pub use transform::Transform;
