//! Links and the elements they carry.
//!
//! A link is a rigid body. In a description it may carry a visual shape, a
//! collision shape and inertial properties, each at most once.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use super::origin::Origin;

/// Shape primitive from a `<geometry>` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "shape")]
pub enum Geometry {
    /// Axis-aligned box centered on its frame.
    Box {
        /// Edge lengths along x, y and z in meters.
        size: Vector3<f64>,
    },
    /// Cylinder centered on its frame, extruded along z.
    Cylinder {
        /// Radius in meters.
        radius: f64,
        /// Length along z in meters.
        length: f64,
    },
    /// Sphere centered on its frame.
    Sphere {
        /// Radius in meters.
        radius: f64,
    },
    /// External mesh file.
    Mesh {
        /// Path or package URI of the mesh.
        filename: String,
        /// Optional per-axis scale.
        scale: Option<Vector3<f64>>,
    },
}

impl Geometry {
    /// Create a box geometry.
    #[must_use]
    pub fn box_shape(x: f64, y: f64, z: f64) -> Self {
        Self::Box {
            size: Vector3::new(x, y, z),
        }
    }

    /// Create a cylinder geometry.
    #[must_use]
    pub fn cylinder(radius: f64, length: f64) -> Self {
        Self::Cylinder { radius, length }
    }

    /// Create a sphere geometry.
    #[must_use]
    pub fn sphere(radius: f64) -> Self {
        Self::Sphere { radius }
    }

    /// The element name used in the description.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Box { .. } => "box",
            Self::Cylinder { .. } => "cylinder",
            Self::Sphere { .. } => "sphere",
            Self::Mesh { .. } => "mesh",
        }
    }
}

/// An RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Alpha.
    pub a: f64,
}

impl Color {
    /// Create a color from its four components.
    #[must_use]
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Components in `r g b a` order.
    #[must_use]
    pub fn to_array(self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// True when every component lies in `[0, 1]`.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        self.to_array().iter().all(|c| (0.0..=1.0).contains(c))
    }
}

/// A `<material>`, either a full definition or a reference by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material name.
    pub name: String,
    /// Inline color, if defined here.
    pub color: Option<Color>,
    /// Inline texture filename, if defined here.
    pub texture: Option<String>,
}

impl Material {
    /// A bare reference to a material defined at robot level.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
            texture: None,
        }
    }

    /// A material with an inline color.
    #[must_use]
    pub fn with_color(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color: Some(color),
            texture: None,
        }
    }

    /// True when this material only names another one.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.color.is_none() && self.texture.is_none()
    }
}

/// The `<visual>` of a link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visual {
    /// Optional name.
    pub name: Option<String>,
    /// Offset of the shape in the link frame.
    pub origin: Origin,
    /// The shape.
    pub geometry: Geometry,
    /// Optional material.
    pub material: Option<Material>,
}

impl Visual {
    /// Create an unnamed visual at the link origin with no material.
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            name: None,
            origin: Origin::default(),
            geometry,
            material: None,
        }
    }

    /// Offset the shape.
    #[must_use]
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Attach a material.
    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }
}

/// The `<collision>` of a link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collision {
    /// Optional name.
    pub name: Option<String>,
    /// Offset of the shape in the link frame.
    pub origin: Origin,
    /// The shape.
    pub geometry: Geometry,
}

/// Upper triangle of a symmetric inertia tensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Inertia {
    pub ixx: f64,
    pub ixy: f64,
    pub ixz: f64,
    pub iyy: f64,
    pub iyz: f64,
    pub izz: f64,
}

impl Inertia {
    /// A diagonal tensor.
    #[must_use]
    pub fn diagonal(ixx: f64, iyy: f64, izz: f64) -> Self {
        Self {
            ixx,
            iyy,
            izz,
            ..Self::default()
        }
    }

    /// The full 3x3 matrix.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.ixx, self.ixy, self.ixz, self.ixy, self.iyy, self.iyz, self.ixz, self.iyz,
            self.izz,
        )
    }

    pub(crate) fn values(&self) -> [f64; 6] {
        [self.ixx, self.ixy, self.ixz, self.iyy, self.iyz, self.izz]
    }
}

/// The `<inertial>` of a link.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Inertial {
    /// Center of mass frame in the link frame.
    pub origin: Origin,
    /// Mass in kilograms.
    pub mass: f64,
    /// Inertia about the center of mass frame.
    pub inertia: Inertia,
}

/// A rigid body in the kinematic tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Unique link name.
    pub name: String,
    /// Visual shape, if any.
    pub visual: Option<Visual>,
    /// Collision shape, if any.
    pub collision: Option<Collision>,
    /// Mass properties, if any.
    pub inertial: Option<Inertial>,
}

impl Link {
    /// Create a bare link.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visual: None,
            collision: None,
            inertial: None,
        }
    }

    /// Set the visual element.
    #[must_use]
    pub fn with_visual(mut self, visual: Visual) -> Self {
        self.visual = Some(visual);
        self
    }

    /// Set the collision element.
    #[must_use]
    pub fn with_collision(mut self, collision: Collision) -> Self {
        self.collision = Some(collision);
        self
    }

    /// Set the inertial element.
    #[must_use]
    pub fn with_inertial(mut self, inertial: Inertial) -> Self {
        self.inertial = Some(inertial);
        self
    }

    /// True when the link carries nothing but its name.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visual.is_none() && self.collision.is_none() && self.inertial.is_none()
    }
}
