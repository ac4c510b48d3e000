//! # Pose Transform
//!
//! Rigid transform (position + orientation) for a detected surface relative
//! to the session's reference space.

use glam::{DMat4, DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// Position and orientation of an object in a reference space.
///
/// # Example
///
/// ```rust
/// use roomscan_mesh::Transform;
/// use glam::DVec3;
///
/// let pose = Transform::from_position(DVec3::new(1.0, 0.0, -2.0));
/// assert_eq!(pose.apply(DVec3::ZERO), DVec3::new(1.0, 0.0, -2.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTransform")]
pub struct Transform {
    /// Translation in session length units.
    pub position: DVec3,
    /// Orientation quaternion (x, y, z, w).
    pub orientation: DQuat,
}

/// Wire shape of a pose; decoding goes through [`Transform::new`].
#[derive(Deserialize)]
struct RawTransform {
    position: DVec3,
    orientation: DQuat,
}

impl From<RawTransform> for Transform {
    fn from(raw: RawTransform) -> Self {
        Transform::new(raw.position, raw.orientation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The identity pose.
    pub const IDENTITY: Self = Self {
        position: DVec3::ZERO,
        orientation: DQuat::IDENTITY,
    };

    /// Creates a pose from a position and orientation.
    ///
    /// The orientation is renormalized; hosts round-trip quaternions through
    /// f32 and drift slightly off unit length.
    pub fn new(position: DVec3, orientation: DQuat) -> Self {
        let orientation = if orientation.length_squared() > 0.0 {
            orientation.normalize()
        } else {
            DQuat::IDENTITY
        };
        Self {
            position,
            orientation,
        }
    }

    /// Creates an unrotated pose at `position`.
    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            orientation: DQuat::IDENTITY,
        }
    }

    /// Returns the pose as a 4x4 matrix.
    pub fn to_matrix(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.orientation, self.position)
    }

    /// Maps a point from object space into the reference space.
    pub fn apply(&self, point: DVec3) -> DVec3 {
        self.orientation * point + self.position
    }

    /// Position as `[x, y, z]`.
    pub fn position_array(&self) -> [f64; 3] {
        self.position.to_array()
    }

    /// Orientation as `[x, y, z, w]`.
    pub fn rotation_array(&self) -> [f64; 4] {
        self.orientation.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_matrix_matches_apply() {
        let pose = Transform::new(
            DVec3::new(0.5, 1.5, -1.0),
            DQuat::from_rotation_y(0.7),
        );
        let p = DVec3::new(2.0, -1.0, 3.0);
        let a = pose.apply(p);
        let b = pose.to_matrix().transform_point3(p);
        assert_relative_eq!(a.x, b.x, epsilon = 1e-12);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-12);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-12);
    }

    #[test]
    fn test_new_normalizes_orientation() {
        let pose = Transform::new(DVec3::ZERO, DQuat::from_xyzw(0.0, 0.0, 0.0, 2.0));
        assert_relative_eq!(pose.orientation.w, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_new_replaces_zero_quaternion() {
        let pose = Transform::new(DVec3::ZERO, DQuat::from_xyzw(0.0, 0.0, 0.0, 0.0));
        assert_eq!(pose.orientation, DQuat::IDENTITY);
    }

    #[test]
    fn test_decoding_normalizes_orientation() {
        let pose: Transform = serde_json::from_str(
            r#"{ "position": [0, 0, 0], "orientation": [0, 0.8, 0, 0.8] }"#,
        )
        .unwrap();
        assert_relative_eq!(pose.orientation.length(), 1.0, epsilon = 1e-12);

        let p = pose.apply(DVec3::X);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_arrays() {
        let pose = Transform::from_position(DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(pose.position_array(), [1.0, 2.0, 3.0]);
        assert_eq!(pose.rotation_array(), [0.0, 0.0, 0.0, 1.0]);
    }
}
