//! # Geometry Builder Tests

use super::*;
use approx::assert_relative_eq;

/// Unit square in the XZ plane, wound so both triangles face +Y.
fn floor_quad() -> (Vec<f32>, Vec<u32>) {
    let vertices = vec![
        0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, //
        1.0, 0.0, 1.0, //
        0.0, 0.0, 1.0,
    ];
    let indices = vec![0, 2, 1, 0, 3, 2];
    (vertices, indices)
}

#[test]
fn test_build_quad_counts() {
    let (vertices, indices) = floor_quad();
    let mesh = build_geometry(&vertices, &indices).unwrap();
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.triangle_count(), 2);
    assert_eq!(mesh.normals().unwrap().len(), 4);
}

#[test]
fn test_build_quad_normals_face_up() {
    let (vertices, indices) = floor_quad();
    let mesh = build_geometry(&vertices, &indices).unwrap();
    for n in mesh.normals().unwrap() {
        assert_relative_eq!(n.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(n.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(n.z, 0.0, epsilon = 1e-12);
    }
}

#[test]
fn test_build_empty_buffers() {
    let mesh = build_geometry(&[], &[]).unwrap();
    assert!(mesh.is_empty());
    assert_eq!(mesh.normals().unwrap().len(), 0);
}

#[test]
fn test_build_vertices_without_triangles() {
    let mesh = build_geometry(&[1.0, 2.0, 3.0], &[]).unwrap();
    assert_eq!(mesh.vertex_count(), 1);
    assert_eq!(mesh.normals().unwrap(), &[DVec3::ZERO]);
}

#[test]
fn test_rejects_out_of_range_index() {
    let (vertices, _) = floor_quad();
    let err = build_geometry(&vertices, &[0, 1, 2, 0, 2, 4]).unwrap_err();
    assert_eq!(
        err,
        GeometryError::IndexOutOfRange {
            position: 5,
            index: 4,
            vertex_count: 4,
        }
    );
}

#[test]
fn test_rejects_huge_index() {
    let (vertices, _) = floor_quad();
    let err = build_geometry(&vertices, &[0, 1, u32::MAX]).unwrap_err();
    assert!(matches!(err, GeometryError::IndexOutOfRange { .. }));
}

#[test]
fn test_rejects_partial_vertex() {
    let err = build_geometry(&[0.0, 1.0], &[]).unwrap_err();
    assert_eq!(err, GeometryError::VertexStride { len: 2 });
}

#[test]
fn test_rejects_partial_triangle() {
    let (vertices, _) = floor_quad();
    let err = build_geometry(&vertices, &[0, 1]).unwrap_err();
    assert_eq!(err, GeometryError::IndexStride { len: 2 });
}

#[test]
fn test_rejects_nan_coordinate() {
    let err = build_geometry(&[0.0, 0.0, 0.0, f32::NAN, 0.0, 0.0], &[]).unwrap_err();
    assert_eq!(err, GeometryError::NonFiniteVertex { vertex: 1 });
}
