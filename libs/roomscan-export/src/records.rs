//! # Structured Records
//!
//! JSON list with one record per captured plane or hit point, in buffer
//! order. Meshes are not part of this format.

use roomscan_mesh::{DetectedSurface, PlaneDimensions, SurfaceId, SurfaceKind};
use serde::{Deserialize, Serialize};

use crate::error::ExportResult;

/// One exported plane or hit point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRecord {
    pub kind: SurfaceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SurfaceId>,
    /// `[x, y, z]`
    pub position: [f64; 3],
    /// Quaternion `[x, y, z, w]`
    pub rotation: [f64; 4],
    /// Present for planes, `null` for hit points.
    pub dimensions: Option<PlaneDimensions>,
}

/// Builds the record list for a scene.
pub fn to_records(surfaces: &[DetectedSurface]) -> Vec<SurfaceRecord> {
    surfaces
        .iter()
        .filter_map(|surface| {
            let dimensions = match surface {
                DetectedSurface::Plane { dimensions, .. } => Some(*dimensions),
                DetectedSurface::HitPoint { .. } => None,
                DetectedSurface::Mesh { .. } => return None,
            };
            let pose = surface.pose();
            Some(SurfaceRecord {
                kind: surface.kind(),
                id: surface.id(),
                position: pose.position_array(),
                rotation: pose.rotation_array(),
                dimensions,
            })
        })
        .collect()
}

/// Writes the record list as pretty-printed JSON with a trailing newline.
pub fn write_records(surfaces: &[DetectedSurface]) -> ExportResult<String> {
    let mut text = serde_json::to_string_pretty(&to_records(surfaces))?;
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DVec2, DVec3};
    use roomscan_mesh::{build_geometry, Transform};

    fn scene() -> Vec<DetectedSurface> {
        vec![
            DetectedSurface::plane(
                Some(SurfaceId(4)),
                vec![DVec2::ZERO, DVec2::new(2.0, 3.0)],
                Transform::from_position(DVec3::new(0.0, -1.0, 0.0)),
            ),
            DetectedSurface::Mesh {
                id: None,
                geometry: build_geometry(&[], &[]).unwrap(),
                pose: Transform::IDENTITY,
            },
            DetectedSurface::HitPoint {
                pose: Transform::from_position(DVec3::new(0.5, 0.0, -2.0)),
            },
        ]
    }

    #[test]
    fn test_meshes_are_skipped_and_order_kept() {
        let records = to_records(&scene());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, SurfaceKind::Plane);
        assert_eq!(records[1].kind, SurfaceKind::HitPoint);
    }

    #[test]
    fn test_record_fields() {
        let records = to_records(&scene());
        assert_eq!(records[0].id, Some(SurfaceId(4)));
        assert_eq!(records[0].position, [0.0, -1.0, 0.0]);
        assert_eq!(records[0].rotation, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(
            records[0].dimensions,
            Some(PlaneDimensions { width: 2.0, height: 3.0 })
        );
        assert_eq!(records[1].dimensions, None);
    }

    #[test]
    fn test_json_round_trips_through_serde() {
        let text = write_records(&scene()).unwrap();
        let parsed: Vec<SurfaceRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, to_records(&scene()));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["kind"], "plane");
        assert_eq!(value[1]["kind"], "hit_point");
        assert!(value[1]["dimensions"].is_null());
        assert!(value[1].get("id").is_none());
    }
}
