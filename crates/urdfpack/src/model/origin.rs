//! Frame offsets.

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Pose of a child frame relative to its parent, as written in `<origin>`.
///
/// `rpy` is applied as fixed-axis rotations: roll about X, then pitch about
/// Y, then yaw about Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    /// Translation in meters.
    pub xyz: Vector3<f64>,
    /// Roll, pitch and yaw in radians.
    pub rpy: Vector3<f64>,
}

impl Default for Origin {
    fn default() -> Self {
        Self {
            xyz: Vector3::zeros(),
            rpy: Vector3::zeros(),
        }
    }
}

impl Origin {
    /// Create an origin from a translation and roll-pitch-yaw.
    #[must_use]
    pub fn new(xyz: Vector3<f64>, rpy: Vector3<f64>) -> Self {
        Self { xyz, rpy }
    }

    /// Create a pure translation.
    #[must_use]
    pub fn from_xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            xyz: Vector3::new(x, y, z),
            rpy: Vector3::zeros(),
        }
    }

    /// Set the roll-pitch-yaw of this origin.
    #[must_use]
    pub fn with_rpy(mut self, roll: f64, pitch: f64, yaw: f64) -> Self {
        self.rpy = Vector3::new(roll, pitch, yaw);
        self
    }

    /// True when both translation and rotation are zero.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.xyz == Vector3::zeros() && self.rpy == Vector3::zeros()
    }

    /// The rotation part as a unit quaternion.
    #[must_use]
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        // nalgebra's euler angles are the same extrinsic XYZ convention.
        UnitQuaternion::from_euler_angles(self.rpy.x, self.rpy.y, self.rpy.z)
    }

    /// The full rigid transform.
    #[must_use]
    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(Translation3::from(self.xyz), self.rotation())
    }
}
