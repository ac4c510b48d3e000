//! Shared fixtures for the capture integration tests.

#![allow(dead_code)]

use glam::DVec3;
use roomscan_capture::replay::{RecordedFrame, RecordedHit, RecordedMesh, RecordedPlane};
use roomscan_mesh::{SurfaceId, Transform};
use tracing_subscriber::EnvFilter;

/// Routes pipeline logs through the test harness; `RUST_LOG` selects levels.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Unit quad on the floor: 4 vertices, 2 triangles.
pub fn quad_mesh(id: Option<u64>) -> RecordedMesh {
    RecordedMesh {
        id: id.map(SurfaceId),
        pose: Some(Transform::from_position(DVec3::new(0.0, 0.0, -1.0))),
        vertices: vec![
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0,
        ],
        indices: vec![0, 2, 1, 0, 3, 2],
    }
}

/// 2 x 3 rectangle in plane space.
pub fn floor_plane(id: Option<u64>) -> RecordedPlane {
    RecordedPlane {
        id: id.map(SurfaceId),
        pose: Some(Transform::from_position(DVec3::new(0.0, -1.5, 0.0))),
        polygon: vec![
            DVec3::new(-1.0, 0.0, -1.5),
            DVec3::new(1.0, 0.0, -1.5),
            DVec3::new(1.0, 0.0, 1.5),
            DVec3::new(-1.0, 0.0, 1.5),
        ],
    }
}

pub fn hit(position: DVec3) -> RecordedHit {
    RecordedHit {
        pose: Some(Transform::from_position(position)),
    }
}

pub fn frame_with(meshes: Vec<RecordedMesh>, planes: Vec<RecordedPlane>) -> RecordedFrame {
    RecordedFrame {
        meshes,
        planes,
        hits: Vec::new(),
    }
}

pub fn empty_frames(count: usize) -> Vec<RecordedFrame> {
    vec![RecordedFrame::empty(); count]
}

/// Counts `v` and `f` lines of OBJ text.
pub fn obj_counts(text: &str) -> (usize, usize) {
    let vertices = text.lines().filter(|l| l.starts_with("v ")).count();
    let faces = text.lines().filter(|l| l.starts_with("f ")).count();
    (vertices, faces)
}
