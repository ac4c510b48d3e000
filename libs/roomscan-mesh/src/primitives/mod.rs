//! # Primitives
//!
//! Mesh generation for the stand-in shapes used at export time.

pub mod cuboid;

pub use cuboid::create_box;
