//! Camera pose.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Camera position plus the point it looks at, in scene units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    /// Camera position.
    pub position: Vector3<f64>,
    /// Look-at target.
    pub look_at: Vector3<f64>,
}

impl CameraPose {
    /// Creates a pose from raw coordinates.
    #[must_use]
    pub fn new(position: [f64; 3], look_at: [f64; 3]) -> Self {
        Self {
            position: Vector3::from(position),
            look_at: Vector3::from(look_at),
        }
    }

    /// Distance between this pose's position and `point`.
    #[must_use]
    pub fn distance_to(&self, point: &Vector3<f64>) -> f64 {
        (point - self.position).norm()
    }
}

impl Default for CameraPose {
    /// The home scene's opening shot: high above the ecliptic, looking at the
    /// origin.
    fn default() -> Self {
        Self::new([0.0, 50.0, 150.0], [0.0, 0.0, 0.0])
    }
}

/// Where a scripted camera move should end: the position to approach and
/// the focus point to keep looking at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraTarget {
    /// Destination position.
    pub position: Vector3<f64>,
    /// Point the camera looks at while moving.
    pub focus: Vector3<f64>,
}

impl CameraTarget {
    /// Creates a target from raw coordinates.
    #[must_use]
    pub fn new(position: [f64; 3], focus: [f64; 3]) -> Self {
        Self {
            position: Vector3::from(position),
            focus: Vector3::from(focus),
        }
    }

    /// A target that looks at the scene origin.
    #[must_use]
    pub fn looking_at_origin(position: [f64; 3]) -> Self {
        Self::new(position, [0.0; 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_measures_euclidean_distance() {
        let pose = CameraPose::new([0.0, 0.0, 0.0], [0.0, 0.0, 0.0]);

        let distance = pose.distance_to(&Vector3::new(0.0, 3.0, 4.0));

        assert!((distance - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_pose_is_opening_shot() {
        let pose = CameraPose::default();

        assert_eq!(pose.position, Vector3::new(0.0, 50.0, 150.0));
        assert_eq!(pose.look_at, Vector3::zeros());
    }
}
