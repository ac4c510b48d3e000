//! # Detected Surfaces
//!
//! The closed set of things a capture session can record: meshes, planes
//! and hit-test points, each with its pose in the session reference space.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::mesh::Mesh;
use crate::transform::Transform;

/// Stable identifier a host may attach to a physical surface so it can be
/// recognised when reported again on a later frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discriminant of [`DetectedSurface`], used in logs, errors and exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    Mesh,
    Plane,
    HitPoint,
}

impl SurfaceKind {
    /// Lowercase name used in OBJ object names and JSON records.
    pub fn as_str(self) -> &'static str {
        match self {
            SurfaceKind::Mesh => "mesh",
            SurfaceKind::Plane => "plane",
            SurfaceKind::HitPoint => "hit_point",
        }
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis-aligned extent of a plane polygon in its own horizontal plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaneDimensions {
    /// Extent along the plane's local x axis.
    pub width: f64,
    /// Extent along the plane's local z axis.
    pub height: f64,
}

impl PlaneDimensions {
    /// Returns true when both extents are positive.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Returns the `(min, max)` corners of a plane polygon's axis-aligned
/// bounds, or `None` for an empty polygon.
pub fn plane_bounds(polygon: &[DVec2]) -> Option<(DVec2, DVec2)> {
    let (first, rest) = polygon.split_first()?;
    Some(
        rest.iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p))),
    )
}

/// Computes plane dimensions with a single min/max pass over the polygon.
///
/// Polygon points are `(x, z)` pairs in plane-local space: `width` is the
/// x extent and `height` the z extent. An empty polygon has zero extent.
///
/// # Example
///
/// ```rust
/// use roomscan_mesh::surface::plane_dimensions;
/// use glam::DVec2;
///
/// let rect = [
///     DVec2::new(-1.0, -1.5),
///     DVec2::new(1.0, -1.5),
///     DVec2::new(1.0, 1.5),
///     DVec2::new(-1.0, 1.5),
/// ];
/// let dims = plane_dimensions(&rect);
/// assert_eq!((dims.width, dims.height), (2.0, 3.0));
/// ```
pub fn plane_dimensions(polygon: &[DVec2]) -> PlaneDimensions {
    match plane_bounds(polygon) {
        Some((min, max)) => PlaneDimensions {
            width: max.x - min.x,
            height: max.y - min.y,
        },
        None => PlaneDimensions::default(),
    }
}

/// A surface captured from one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectedSurface {
    /// Detected mesh with validated geometry in object space.
    Mesh {
        id: Option<SurfaceId>,
        geometry: Mesh,
        pose: Transform,
    },
    /// Detected plane; `polygon` holds plane-local `(x, z)` points.
    Plane {
        id: Option<SurfaceId>,
        polygon: Vec<DVec2>,
        pose: Transform,
        dimensions: PlaneDimensions,
    },
    /// Point where a hit-test ray met real-world geometry.
    HitPoint { pose: Transform },
}

impl DetectedSurface {
    /// Creates a plane surface, deriving its dimensions from the polygon.
    pub fn plane(id: Option<SurfaceId>, polygon: Vec<DVec2>, pose: Transform) -> Self {
        let dimensions = plane_dimensions(&polygon);
        DetectedSurface::Plane {
            id,
            polygon,
            pose,
            dimensions,
        }
    }

    /// Returns the variant discriminant.
    pub fn kind(&self) -> SurfaceKind {
        match self {
            DetectedSurface::Mesh { .. } => SurfaceKind::Mesh,
            DetectedSurface::Plane { .. } => SurfaceKind::Plane,
            DetectedSurface::HitPoint { .. } => SurfaceKind::HitPoint,
        }
    }

    /// Returns the host-provided surface id, if any.
    pub fn id(&self) -> Option<SurfaceId> {
        match self {
            DetectedSurface::Mesh { id, .. } | DetectedSurface::Plane { id, .. } => *id,
            DetectedSurface::HitPoint { .. } => None,
        }
    }

    /// Returns the pose in the session reference space.
    pub fn pose(&self) -> &Transform {
        match self {
            DetectedSurface::Mesh { pose, .. }
            | DetectedSurface::Plane { pose, .. }
            | DetectedSurface::HitPoint { pose } => pose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangle_at_origin() {
        let rect = [
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 3.0),
            DVec2::new(0.0, 3.0),
        ];
        let dims = plane_dimensions(&rect);
        assert_relative_eq!(dims.width, 2.0, epsilon = 1e-6);
        assert_relative_eq!(dims.height, 3.0, epsilon = 1e-6);
        assert!(dims.has_area());
    }

    #[test]
    fn test_irregular_polygon_uses_extremes() {
        let polygon = [
            DVec2::new(0.2, -0.4),
            DVec2::new(1.7, 0.1),
            DVec2::new(0.9, 2.6),
            DVec2::new(-0.3, 1.2),
            DVec2::new(0.5, 0.5),
        ];
        let dims = plane_dimensions(&polygon);
        assert_relative_eq!(dims.width, 2.0, epsilon = 1e-12);
        assert_relative_eq!(dims.height, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bounds_of_offset_polygon() {
        let polygon = [DVec2::new(1.0, 2.0), DVec2::new(3.0, 5.0), DVec2::new(2.0, 4.0)];
        let (min, max) = plane_bounds(&polygon).unwrap();
        assert_eq!(min, DVec2::new(1.0, 2.0));
        assert_eq!(max, DVec2::new(3.0, 5.0));
        assert!(plane_bounds(&[]).is_none());
    }

    #[test]
    fn test_empty_polygon_has_no_area() {
        let dims = plane_dimensions(&[]);
        assert_eq!(dims, PlaneDimensions::default());
        assert!(!dims.has_area());
    }

    #[test]
    fn test_plane_constructor_and_accessors() {
        let pose = Transform::from_position(glam::DVec3::Y);
        let surface = DetectedSurface::plane(
            Some(SurfaceId(7)),
            vec![DVec2::ZERO, DVec2::new(1.0, 0.5)],
            pose,
        );
        assert_eq!(surface.kind(), SurfaceKind::Plane);
        assert_eq!(surface.id(), Some(SurfaceId(7)));
        assert_eq!(surface.pose(), &pose);
        match surface {
            DetectedSurface::Plane { dimensions, .. } => {
                assert_eq!(dimensions, PlaneDimensions { width: 1.0, height: 0.5 });
            }
            other => panic!("expected plane, got {other:?}"),
        }
    }

    #[test]
    fn test_hit_point_has_no_id() {
        let surface = DetectedSurface::HitPoint {
            pose: Transform::IDENTITY,
        };
        assert_eq!(surface.id(), None);
        assert_eq!(surface.kind().to_string(), "hit_point");
    }
}
