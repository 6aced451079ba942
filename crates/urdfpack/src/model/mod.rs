//! Typed in-memory robot description.
//!
//! A [`Robot`] is a flat list of named [`Link`]s and [`Joint`]s, in the order
//! they were declared. Links and joints refer to each other by name only;
//! the tree structure is derived and checked by [`crate::validation`].
//!
//! Models are plain data. Building one programmatically goes through the
//! `with_*` builder methods:
//!
//! ```
//! use nalgebra::Vector3;
//! use urdfpack::model::{Geometry, Joint, Limit, Link, Robot, Visual};
//!
//! let robot = Robot::new("arm")
//!     .with_link(Link::new("base").with_visual(Visual::new(Geometry::sphere(0.1))))
//!     .with_link(Link::new("tip"))
//!     .with_joint(Joint::revolute(
//!         "j0",
//!         "base",
//!         "tip",
//!         Vector3::z(),
//!         Limit::new(-1.0, 1.0, 5.0, 1.0),
//!     ));
//!
//! assert_eq!(robot.dof(), 1);
//! ```

mod joint;
mod link;
mod origin;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use joint::{Dynamics, Joint, JointType, Limit};
pub use link::{Collision, Color, Geometry, Inertia, Inertial, Link, Material, Visual};
pub use origin::Origin;

/// A complete robot description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Robot {
    /// Robot name.
    pub name: String,
    /// Materials defined at robot level, referenced by name from visuals.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<Material>,
    /// Links in declaration order.
    pub links: Vec<Link>,
    /// Joints in declaration order.
    pub joints: Vec<Joint>,
}

impl Robot {
    /// Create an empty robot.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            materials: Vec::new(),
            links: Vec::new(),
            joints: Vec::new(),
        }
    }

    /// Add a robot-level material.
    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.materials.push(material);
        self
    }

    /// Add a link.
    #[must_use]
    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// Add a joint.
    #[must_use]
    pub fn with_joint(mut self, joint: Joint) -> Self {
        self.joints.push(joint);
        self
    }

    /// Find a link by name.
    #[must_use]
    pub fn link(&self, name: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.name == name)
    }

    /// Find a joint by name.
    #[must_use]
    pub fn joint(&self, name: &str) -> Option<&Joint> {
        self.joints.iter().find(|j| j.name == name)
    }

    /// Find a robot-level material by name.
    #[must_use]
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// The color a visual renders with.
    ///
    /// An inline color wins; otherwise a reference is looked up among the
    /// robot-level materials.
    #[must_use]
    pub fn resolve_color(&self, visual: &Visual) -> Option<Color> {
        let material = visual.material.as_ref()?;
        material
            .color
            .or_else(|| self.material(&material.name).and_then(|m| m.color))
    }

    /// Total degrees of freedom over all joints.
    #[must_use]
    pub fn dof(&self) -> usize {
        self.joints.iter().map(|j| j.joint_type.dof()).sum()
    }

    /// Compare two robots as graphs keyed by name.
    ///
    /// Declaration order is ignored; every link, joint and material must
    /// match by name with identical attribute values. Duplicate names make
    /// the comparison fail.
    #[must_use]
    pub fn same_graph(&self, other: &Self) -> bool {
        self.name == other.name
            && same_by_name(&self.links, &other.links, |l| &l.name)
            && same_by_name(&self.joints, &other.joints, |j| &j.name)
            && same_by_name(&self.materials, &other.materials, |m| &m.name)
    }
}

fn same_by_name<T: PartialEq>(a: &[T], b: &[T], name: impl Fn(&T) -> &String) -> bool {
    let left: HashMap<&String, &T> = a.iter().map(|item| (name(item), item)).collect();
    let right: HashMap<&String, &T> = b.iter().map(|item| (name(item), item)).collect();
    if left.len() != a.len() || right.len() != b.len() {
        return false;
    }
    left == right
}
