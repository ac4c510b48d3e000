use glam::{DQuat, DVec2, DVec3};
use roomscan_export::{export, ExportFormat, ExportOptions};
use roomscan_mesh::{build_geometry, DetectedSurface, SurfaceId, Transform};

fn scene() -> Vec<DetectedSurface> {
    let quad = [
        0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0,
    ];
    let geometry = build_geometry(&quad, &[0, 2, 1, 0, 3, 2]).unwrap();
    vec![
        DetectedSurface::Mesh {
            id: Some(SurfaceId(1)),
            geometry: geometry.clone(),
            pose: Transform::new(DVec3::new(0.3, 0.0, -1.2), DQuat::from_rotation_y(0.4)),
        },
        DetectedSurface::plane(
            Some(SurfaceId(2)),
            vec![
                DVec2::new(-1.0, -1.5),
                DVec2::new(1.0, -1.5),
                DVec2::new(1.0, 1.5),
                DVec2::new(-1.0, 1.5),
            ],
            Transform::from_position(DVec3::new(0.0, -1.4, 0.0)),
        ),
        DetectedSurface::HitPoint {
            pose: Transform::from_position(DVec3::new(0.1, -1.4, -0.8)),
        },
        DetectedSurface::Mesh {
            id: None,
            geometry,
            pose: Transform::IDENTITY,
        },
    ]
}

/// Counts `v` and `f` lines the way an OBJ reader would.
fn parse_counts(text: &str) -> (usize, usize) {
    let mut vertices = 0;
    let mut faces = 0;
    for line in text.lines() {
        match line.split_whitespace().next() {
            Some("v") => vertices += 1,
            Some("f") => faces += 1,
            _ => {}
        }
    }
    (vertices, faces)
}

#[test]
fn exporting_twice_is_byte_identical() {
    let surfaces = scene();
    for format in [ExportFormat::Obj, ExportFormat::Json] {
        let options = ExportOptions {
            format,
            ..ExportOptions::default()
        };
        let first = export(&surfaces, &options).unwrap();
        let second = export(&surfaces, &options).unwrap();
        assert_eq!(first, second, "{format} export is not deterministic");
    }
}

#[test]
fn export_does_not_touch_the_surfaces() {
    let surfaces = scene();
    let before = surfaces.clone();
    export(&surfaces, &ExportOptions::default()).unwrap();
    assert_eq!(surfaces, before);
}

#[test]
fn obj_counts_match_the_scene() {
    let surfaces = scene();
    let artifact = export(&surfaces, &ExportOptions::default()).unwrap();
    let (vertices, faces) = parse_counts(artifact.as_text().unwrap());

    // Two quads (4 vertices, 2 triangles each) and one plane box (8, 12)
    assert_eq!(vertices, 4 + 8 + 4);
    assert_eq!(faces, 2 + 12 + 2);
}

#[test]
fn obj_face_indices_stay_in_range() {
    let artifact = export(&scene(), &ExportOptions::default()).unwrap();
    let text = artifact.as_text().unwrap();
    let (vertices, _) = parse_counts(text);

    for line in text.lines().filter(|l| l.starts_with("f ")) {
        for corner in line.split_whitespace().skip(1) {
            let index: usize = corner.split('/').next().unwrap().parse().unwrap();
            assert!((1..=vertices).contains(&index), "bad index in {line}");
        }
    }
}

#[test]
fn obj_objects_follow_buffer_order() {
    let artifact = export(&scene(), &ExportOptions::default()).unwrap();
    let objects: Vec<_> = artifact
        .as_text()
        .unwrap()
        .lines()
        .filter_map(|l| l.strip_prefix("o "))
        .map(str::to_string)
        .collect();
    assert_eq!(objects, ["mesh_0", "plane_1", "mesh_3"]);
}

#[test]
fn json_lists_planes_and_hit_points_in_order() {
    let options = ExportOptions {
        format: ExportFormat::Json,
        ..ExportOptions::default()
    };
    let artifact = export(&scene(), &options).unwrap();
    assert_eq!(artifact.filename, "scene.json");
    assert_eq!(artifact.mime_type, "application/json");

    let value: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["kind"], "plane");
    assert_eq!(records[0]["dimensions"]["width"], 2.0);
    assert_eq!(records[0]["dimensions"]["height"], 3.0);
    assert_eq!(records[1]["kind"], "hit_point");
}
