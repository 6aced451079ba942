//! Joints connecting a parent link to a child link.

use std::fmt;
use std::str::FromStr;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::origin::Origin;

/// Kind of relative motion a joint allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointType {
    /// Rotation about the axis within `[lower, upper]`.
    Revolute,
    /// Unbounded rotation about the axis.
    Continuous,
    /// Translation along the axis within `[lower, upper]`.
    Prismatic,
    /// Rigid attachment, no motion.
    Fixed,
    /// Free motion in all six degrees of freedom.
    Floating,
    /// Motion in the plane perpendicular to the axis.
    Planar,
}

impl JointType {
    /// Every joint type, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Revolute,
        Self::Continuous,
        Self::Prismatic,
        Self::Fixed,
        Self::Floating,
        Self::Planar,
    ];

    /// The `type` attribute value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Revolute => "revolute",
            Self::Continuous => "continuous",
            Self::Prismatic => "prismatic",
            Self::Fixed => "fixed",
            Self::Floating => "floating",
            Self::Planar => "planar",
        }
    }

    /// Degrees of freedom the joint adds.
    #[must_use]
    pub fn dof(self) -> usize {
        match self {
            Self::Fixed => 0,
            Self::Revolute | Self::Continuous | Self::Prismatic => 1,
            Self::Planar => 3,
            Self::Floating => 6,
        }
    }

    /// Whether a `<limit>` is mandatory.
    #[must_use]
    pub fn requires_limit(self) -> bool {
        matches!(self, Self::Revolute | Self::Prismatic)
    }

    /// Whether an `<axis>` is mandatory.
    #[must_use]
    pub fn requires_axis(self) -> bool {
        matches!(self, Self::Revolute | Self::Continuous | Self::Prismatic)
    }
}

impl fmt::Display for JointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JointType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Bounds from a `<limit>` element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    /// Lower position bound (rad or m).
    pub lower: f64,
    /// Upper position bound (rad or m).
    pub upper: f64,
    /// Maximum effort (N·m or N).
    pub effort: f64,
    /// Maximum velocity (rad/s or m/s).
    pub velocity: f64,
}

impl Limit {
    /// Create a limit from its four values.
    #[must_use]
    pub fn new(lower: f64, upper: f64, effort: f64, velocity: f64) -> Self {
        Self {
            lower,
            upper,
            effort,
            velocity,
        }
    }

    /// Width of the position range.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether `position` lies inside the bounds.
    #[must_use]
    pub fn contains(&self, position: f64) -> bool {
        (self.lower..=self.upper).contains(&position)
    }
}

/// Damping and friction from a `<dynamics>` element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dynamics {
    /// Viscous damping.
    pub damping: f64,
    /// Coulomb friction.
    pub friction: f64,
}

/// A connector between two links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    /// Unique joint name.
    pub name: String,
    /// Kind of motion.
    pub joint_type: JointType,
    /// Name of the parent link.
    pub parent: String,
    /// Name of the child link.
    pub child: String,
    /// Child frame relative to the parent frame.
    pub origin: Origin,
    /// Motion axis in the joint frame, as declared.
    pub axis: Option<Vector3<f64>>,
    /// Motion bounds, as declared.
    pub limit: Option<Limit>,
    /// Damping and friction, as declared.
    pub dynamics: Option<Dynamics>,
}

impl Joint {
    /// Create a joint with an identity origin and nothing else declared.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        joint_type: JointType,
        parent: impl Into<String>,
        child: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            joint_type,
            parent: parent.into(),
            child: child.into(),
            origin: Origin::default(),
            axis: None,
            limit: None,
            dynamics: None,
        }
    }

    /// Shorthand for a fixed joint.
    #[must_use]
    pub fn fixed(
        name: impl Into<String>,
        parent: impl Into<String>,
        child: impl Into<String>,
    ) -> Self {
        Self::new(name, JointType::Fixed, parent, child)
    }

    /// Shorthand for a revolute joint with its axis and limit.
    #[must_use]
    pub fn revolute(
        name: impl Into<String>,
        parent: impl Into<String>,
        child: impl Into<String>,
        axis: Vector3<f64>,
        limit: Limit,
    ) -> Self {
        Self::new(name, JointType::Revolute, parent, child)
            .with_axis(axis)
            .with_limit(limit)
    }

    /// Set the origin.
    #[must_use]
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Set the axis.
    #[must_use]
    pub fn with_axis(mut self, axis: Vector3<f64>) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Set the limit.
    #[must_use]
    pub fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the dynamics.
    #[must_use]
    pub fn with_dynamics(mut self, dynamics: Dynamics) -> Self {
        self.dynamics = Some(dynamics);
        self
    }

    /// The declared axis as a unit vector.
    ///
    /// Falls back to +Z when no axis is declared or the declared one has
    /// zero length.
    #[must_use]
    pub fn unit_axis(&self) -> Vector3<f64> {
        self.axis
            .and_then(|a| a.try_normalize(1e-10))
            .unwrap_or_else(Vector3::z)
    }
}
