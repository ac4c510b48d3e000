//! # Geometry Errors
//!
//! Error types for building geometry from host buffers.
//!
//! ## Error Policy
//!
//! - Malformed buffers are rejected before any element is read
//! - Errors carry the offending position and value for debugging

use thiserror::Error;

/// Errors that can occur while building surface geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Vertex buffer length is not a multiple of three.
    #[error("Vertex buffer length {len} is not a multiple of 3")]
    VertexStride { len: usize },

    /// Index buffer length is not a multiple of three.
    #[error("Index buffer length {len} is not a multiple of 3")]
    IndexStride { len: usize },

    /// A triangle references a vertex that does not exist.
    #[error("Index {index} at position {position} is out of range (vertex count {vertex_count})")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertex_count: usize,
    },

    /// A vertex coordinate is NaN or infinite.
    #[error("Vertex {vertex} has a non-finite coordinate")]
    NonFiniteVertex { vertex: usize },

    /// Degenerate geometry, such as a box with a non-positive side.
    #[error("Degenerate geometry: {message}")]
    Degenerate { message: String },

    /// Too many vertices
    #[error("Too many vertices: {count} (max: {max})")]
    TooManyVertices { count: usize, max: usize },

    /// Too many triangles
    #[error("Too many triangles: {count} (max: {max})")]
    TooManyTriangles { count: usize, max: usize },
}

impl GeometryError {
    /// Creates a degenerate geometry error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::Degenerate {
            message: message.into(),
        }
    }
}

/// Result type alias for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;
