//! Structural validation of a robot description.
//!
//! [`validate`] checks that the links and joints form a single tree, that
//! every joint declares what its type requires, and that numeric values are
//! in range. It stops at the first violation. On success it returns a
//! [`KinematicTree`] index over the robot.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt::Write as _;

use nalgebra::Vector3;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Color, Geometry, Joint, JointType, Link, Material, Origin, Robot};

/// Tree index produced by a successful [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KinematicTree {
    root: String,
    link_parent_joint: BTreeMap<String, String>,
    link_child_joints: BTreeMap<String, Vec<String>>,
    joint_parent_link: BTreeMap<String, String>,
    sorted_links: Vec<String>,
    depth: BTreeMap<String, usize>,
}

impl KinematicTree {
    /// The link with no parent joint.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The joint whose child is `link`, or `None` for the root.
    #[must_use]
    pub fn parent_joint(&self, link: &str) -> Option<&str> {
        self.link_parent_joint.get(link).map(String::as_str)
    }

    /// Joints whose parent is `link`, in declaration order.
    #[must_use]
    pub fn child_joints(&self, link: &str) -> &[String] {
        self.link_child_joints
            .get(link)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All links, root first; every parent precedes its children.
    #[must_use]
    pub fn sorted_links(&self) -> &[String] {
        &self.sorted_links
    }

    /// Number of joints between the root and `link`.
    #[must_use]
    pub fn depth(&self, link: &str) -> Option<usize> {
        self.depth.get(link).copied()
    }

    /// Links without child joints, in root-first order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&str> {
        self.sorted_links
            .iter()
            .filter(|l| self.child_joints(l).is_empty())
            .map(String::as_str)
            .collect()
    }

    /// Indented text rendering, one line per joint under its parent link.
    ///
    /// ```text
    /// base
    ///   shoulder [revolute] -> upper
    ///     elbow [revolute] -> lower
    /// ```
    #[must_use]
    pub fn render(&self, robot: &Robot) -> String {
        let mut out = format!("{}\n", self.root);
        self.render_children(robot, &self.root, 1, &mut out);
        out
    }

    fn render_children(&self, robot: &Robot, link: &str, level: usize, out: &mut String) {
        for name in self.child_joints(link) {
            let Some(joint) = robot.joint(name) else {
                continue;
            };
            let _ = writeln!(
                out,
                "{:width$}{} [{}] -> {}",
                "",
                joint.name,
                joint.joint_type,
                joint.child,
                width = level * 2
            );
            self.render_children(robot, &joint.child, level + 1, out);
        }
    }

    /// Joint names from the root down to `link`.
    ///
    /// Empty for the root, `None` for an unknown link.
    #[must_use]
    pub fn chain_to(&self, link: &str) -> Option<Vec<&str>> {
        self.depth.get(link)?;
        let mut chain = Vec::new();
        let mut current = link;
        while let Some(joint) = self.link_parent_joint.get(current) {
            chain.push(joint.as_str());
            current = self.joint_parent_link.get(joint)?;
        }
        chain.reverse();
        Some(chain)
    }
}

/// Validate a robot description.
///
/// Checks, in order:
/// - link, joint and material names are unique
/// - every joint references declared links
/// - no link has two parent joints, and exactly one link has none
/// - every link is reachable from the root
/// - each joint declares the axis and limit its type requires, and a fixed
///   joint declares neither
/// - numeric values are finite and in range
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate(robot: &Robot) -> Result<KinematicTree> {
    check_duplicates(robot)?;

    let link_names: HashSet<&str> = robot.links.iter().map(|l| l.name.as_str()).collect();

    let mut link_parent_joint: BTreeMap<String, String> = BTreeMap::new();
    let mut link_child_joints: BTreeMap<String, Vec<String>> = robot
        .links
        .iter()
        .map(|l| (l.name.clone(), Vec::new()))
        .collect();
    let mut joint_parent_link: BTreeMap<String, String> = BTreeMap::new();

    for joint in &robot.joints {
        if !link_names.contains(joint.parent.as_str()) {
            return Err(Error::undefined_link(&joint.parent, &joint.name));
        }
        if !link_names.contains(joint.child.as_str()) {
            return Err(Error::undefined_link(&joint.child, &joint.name));
        }
        if joint.parent == joint.child {
            return Err(Error::KinematicLoop(format!(
                "joint '{}' connects link '{}' to itself",
                joint.name, joint.parent
            )));
        }
        if let Some(existing) = link_parent_joint.get(&joint.child) {
            return Err(Error::KinematicLoop(format!(
                "link '{}' has multiple parent joints ('{existing}' and '{}')",
                joint.child, joint.name
            )));
        }

        link_parent_joint.insert(joint.child.clone(), joint.name.clone());
        joint_parent_link.insert(joint.name.clone(), joint.parent.clone());
        link_child_joints
            .entry(joint.parent.clone())
            .or_default()
            .push(joint.name.clone());
    }

    let roots: Vec<&str> = robot
        .links
        .iter()
        .filter(|l| !link_parent_joint.contains_key(&l.name))
        .map(|l| l.name.as_str())
        .collect();

    let root = match roots.as_slice() {
        [] => return Err(Error::NoRootLink),
        [root] => (*root).to_string(),
        _ => {
            return Err(Error::MultipleRootLinks(
                roots.iter().map(|s| (*s).to_string()).collect(),
            ))
        }
    };

    let (sorted_links, depth) = breadth_first(robot, &root, &link_child_joints)?;

    for joint in &robot.joints {
        check_joint(joint)?;
    }
    for material in &robot.materials {
        check_material(material, "robot")?;
    }
    for link in &robot.links {
        check_link(robot, link)?;
    }

    debug!(
        robot = %robot.name,
        root = %root,
        links = sorted_links.len(),
        joints = robot.joints.len(),
        "Validated kinematic tree"
    );

    Ok(KinematicTree {
        root,
        link_parent_joint,
        link_child_joints,
        joint_parent_link,
        sorted_links,
        depth,
    })
}

fn check_duplicates(robot: &Robot) -> Result<()> {
    let mut link_names = HashSet::new();
    for link in &robot.links {
        if !link_names.insert(&link.name) {
            return Err(Error::DuplicateLink(link.name.clone()));
        }
    }

    let mut joint_names = HashSet::new();
    for joint in &robot.joints {
        if !joint_names.insert(&joint.name) {
            return Err(Error::DuplicateJoint(joint.name.clone()));
        }
    }

    let mut material_names = HashSet::new();
    for material in &robot.materials {
        if !material_names.insert(&material.name) {
            return Err(Error::DuplicateMaterial(material.name.clone()));
        }
    }

    Ok(())
}

/// Walk the tree from `root`, returning links in visit order and their depths.
///
/// With one parent per link and a single root, any link the walk misses
/// sits on a cycle.
fn breadth_first(
    robot: &Robot,
    root: &str,
    link_child_joints: &BTreeMap<String, Vec<String>>,
) -> Result<(Vec<String>, BTreeMap<String, usize>)> {
    let joint_child: HashMap<&str, &str> = robot
        .joints
        .iter()
        .map(|j| (j.name.as_str(), j.child.as_str()))
        .collect();

    let mut sorted = Vec::with_capacity(robot.links.len());
    let mut depth = BTreeMap::new();
    let mut queue = VecDeque::from([(root, 0_usize)]);

    while let Some((link, d)) = queue.pop_front() {
        sorted.push(link.to_string());
        depth.insert(link.to_string(), d);
        for joint in link_child_joints.get(link).into_iter().flatten() {
            if let Some(&child) = joint_child.get(joint.as_str()) {
                queue.push_back((child, d + 1));
            }
        }
    }

    if sorted.len() != robot.links.len() {
        let unreachable: Vec<&str> = robot
            .links
            .iter()
            .map(|l| l.name.as_str())
            .filter(|name| !depth.contains_key(*name))
            .collect();
        return Err(Error::KinematicLoop(format!(
            "links not reachable from root '{root}': {}",
            unreachable.join(", ")
        )));
    }

    Ok((sorted, depth))
}

fn check_joint(joint: &Joint) -> Result<()> {
    let joint_type = joint.joint_type;

    if joint_type == JointType::Fixed {
        if joint.axis.is_some() {
            return Err(Error::UnexpectedElement {
                joint: joint.name.clone(),
                element: "axis",
            });
        }
        if joint.limit.is_some() {
            return Err(Error::UnexpectedElement {
                joint: joint.name.clone(),
                element: "limit",
            });
        }
    }
    if joint_type.requires_axis() && joint.axis.is_none() {
        return Err(Error::MissingAxis {
            joint: joint.name.clone(),
            joint_type: joint_type.as_str(),
        });
    }
    if joint_type.requires_limit() && joint.limit.is_none() {
        return Err(Error::MissingLimit {
            joint: joint.name.clone(),
            joint_type: joint_type.as_str(),
        });
    }

    let context = || format!("joint '{}'", joint.name);
    check_origin(&joint.origin, &context)?;

    if let Some(axis) = &joint.axis {
        check_vector(axis, "axis", &context)?;
        if axis.norm() == 0.0 {
            return Err(Error::invalid_value(context(), "axis must be non-zero"));
        }
    }

    if let Some(limit) = &joint.limit {
        for (name, value) in [
            ("lower", limit.lower),
            ("upper", limit.upper),
            ("effort", limit.effort),
            ("velocity", limit.velocity),
        ] {
            check_finite(value, name, &context)?;
        }
        if limit.lower > limit.upper {
            return Err(Error::InvertedLimit {
                joint: joint.name.clone(),
                lower: limit.lower,
                upper: limit.upper,
            });
        }
        check_non_negative(limit.effort, "effort", &context)?;
        check_non_negative(limit.velocity, "velocity", &context)?;
    }

    if let Some(dynamics) = &joint.dynamics {
        check_finite(dynamics.damping, "damping", &context)?;
        check_finite(dynamics.friction, "friction", &context)?;
        check_non_negative(dynamics.damping, "damping", &context)?;
        check_non_negative(dynamics.friction, "friction", &context)?;
    }

    Ok(())
}

fn check_link(robot: &Robot, link: &Link) -> Result<()> {
    if let Some(visual) = &link.visual {
        let context = || format!("visual of link '{}'", link.name);
        check_origin(&visual.origin, &context)?;
        check_geometry(&visual.geometry, &context)?;
        if let Some(material) = &visual.material {
            check_material(material, &context())?;
            if material.is_reference() && robot.material(&material.name).is_none() {
                return Err(Error::invalid_value(
                    context(),
                    format!("material '{}' is not defined", material.name),
                ));
            }
        }
    }

    if let Some(collision) = &link.collision {
        let context = || format!("collision of link '{}'", link.name);
        check_origin(&collision.origin, &context)?;
        check_geometry(&collision.geometry, &context)?;
    }

    if let Some(inertial) = &link.inertial {
        let context = || format!("inertial of link '{}'", link.name);
        check_origin(&inertial.origin, &context)?;
        check_finite(inertial.mass, "mass", &context)?;
        if inertial.mass <= 0.0 {
            return Err(Error::invalid_value(
                context(),
                format!("mass must be positive, got {}", inertial.mass),
            ));
        }
        for value in inertial.inertia.values() {
            check_finite(value, "inertia", &context)?;
        }
    }

    Ok(())
}

fn check_material(material: &Material, owner: &str) -> Result<()> {
    if let Some(color) = material.color {
        check_color(color, &material.name, owner)?;
    }
    Ok(())
}

fn check_color(color: Color, material: &str, owner: &str) -> Result<()> {
    if !color.is_normalized() {
        let [r, g, b, a] = color.to_array();
        return Err(Error::invalid_value(
            format!("material '{material}' of {owner}"),
            format!("color components must lie in [0, 1], got {r} {g} {b} {a}"),
        ));
    }
    Ok(())
}

fn check_geometry(geometry: &Geometry, context: &dyn Fn() -> String) -> Result<()> {
    match geometry {
        Geometry::Box { size } => {
            for value in size.iter() {
                check_positive(*value, "box size", context)?;
            }
        }
        Geometry::Cylinder { radius, length } => {
            check_positive(*radius, "cylinder radius", context)?;
            check_positive(*length, "cylinder length", context)?;
        }
        Geometry::Sphere { radius } => check_positive(*radius, "sphere radius", context)?,
        Geometry::Mesh { filename, scale } => {
            if filename.trim().is_empty() {
                return Err(Error::invalid_value(context(), "mesh filename is empty"));
            }
            if let Some(scale) = scale {
                check_vector(scale, "mesh scale", context)?;
            }
        }
    }
    Ok(())
}

fn check_origin(origin: &Origin, context: &dyn Fn() -> String) -> Result<()> {
    check_vector(&origin.xyz, "origin xyz", context)?;
    check_vector(&origin.rpy, "origin rpy", context)
}

fn check_vector(v: &Vector3<f64>, what: &str, context: &dyn Fn() -> String) -> Result<()> {
    for value in v.iter() {
        check_finite(*value, what, context)?;
    }
    Ok(())
}

fn check_finite(value: f64, what: &str, context: &dyn Fn() -> String) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid_value(
            context(),
            format!("{what} must be finite, got {value}"),
        ))
    }
}

fn check_positive(value: f64, what: &str, context: &dyn Fn() -> String) -> Result<()> {
    check_finite(value, what, context)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_value(
            context(),
            format!("{what} must be positive, got {value}"),
        ))
    }
}

fn check_non_negative(value: f64, what: &str, context: &dyn Fn() -> String) -> Result<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_value(
            context(),
            format!("{what} must not be negative, got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dynamics, Inertia, Inertial, Limit, Visual};
    use crate::urdf::{parse_str, BUNDLED_ROBOT};

    fn limit() -> Limit {
        Limit::new(-1.0, 1.0, 10.0, 1.0)
    }

    fn chain() -> Robot {
        Robot::new("chain")
            .with_link(Link::new("base"))
            .with_link(Link::new("upper"))
            .with_link(Link::new("lower"))
            .with_link(Link::new("tool"))
            .with_joint(Joint::revolute("shoulder", "base", "upper", Vector3::z(), limit()))
            .with_joint(Joint::revolute("elbow", "upper", "lower", Vector3::y(), limit()))
            .with_joint(Joint::fixed("mount", "lower", "tool"))
    }

    #[test]
    fn test_valid_chain() {
        let tree = validate(&chain()).expect("chain should validate");
        assert_eq!(tree.root(), "base");
        assert_eq!(tree.sorted_links(), ["base", "upper", "lower", "tool"]);
        assert_eq!(tree.parent_joint("lower"), Some("elbow"));
        assert_eq!(tree.parent_joint("base"), None);
        assert_eq!(tree.child_joints("base"), ["shoulder".to_string()]);
        assert!(tree.child_joints("tool").is_empty());
        assert_eq!(tree.depth("tool"), Some(3));
        assert_eq!(tree.leaves(), vec!["tool"]);
    }

    #[test]
    fn test_render() {
        let robot = chain();
        let tree = validate(&robot).unwrap();
        assert_eq!(
            tree.render(&robot),
            "base\n  shoulder [revolute] -> upper\n    elbow [revolute] -> lower\n      mount [fixed] -> tool\n"
        );
    }

    #[test]
    fn test_json_is_deterministic() {
        let tree = validate(&chain()).unwrap();
        let a = serde_json::to_string(&tree).unwrap();
        let b = serde_json::to_string(&validate(&chain()).unwrap()).unwrap();
        assert_eq!(a, b);
        assert!(a.contains(r#""root":"base""#));
    }

    #[test]
    fn test_chain_to() {
        let tree = validate(&chain()).unwrap();
        assert_eq!(tree.chain_to("tool"), Some(vec!["shoulder", "elbow", "mount"]));
        assert_eq!(tree.chain_to("base"), Some(vec![]));
        assert_eq!(tree.chain_to("nowhere"), None);
    }

    #[test]
    fn test_branching_tree_order() {
        let robot = Robot::new("gripper")
            .with_link(Link::new("palm"))
            .with_link(Link::new("left"))
            .with_link(Link::new("right"))
            .with_link(Link::new("left_tip"))
            .with_joint(Joint::fixed("left_tip_joint", "left", "left_tip"))
            .with_joint(Joint::fixed("left_joint", "palm", "left"))
            .with_joint(Joint::fixed("right_joint", "palm", "right"));
        let tree = validate(&robot).unwrap();
        assert_eq!(tree.root(), "palm");

        let position = |name: &str| tree.sorted_links().iter().position(|l| l == name).unwrap();
        assert!(position("palm") < position("left"));
        assert!(position("left") < position("left_tip"));
        assert_eq!(tree.leaves().len(), 2);
        assert_eq!(tree.depth("left_tip"), Some(2));
    }

    #[test]
    fn test_single_link_robot() {
        let tree = validate(&Robot::new("r").with_link(Link::new("only"))).unwrap();
        assert_eq!(tree.root(), "only");
        assert_eq!(tree.leaves(), vec!["only"]);
    }

    #[test]
    fn test_empty_robot_has_no_root() {
        assert!(matches!(validate(&Robot::new("r")), Err(Error::NoRootLink)));
    }

    #[test]
    fn test_undefined_child_link() {
        let mut robot = chain();
        robot.joints[1].child = "forearm".to_string();
        match validate(&robot) {
            Err(Error::UndefinedLink { link, joint }) => {
                assert_eq!(link, "forearm");
                assert_eq!(joint, "elbow");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_undefined_parent_link() {
        let mut robot = chain();
        robot.joints[0].parent = "world".to_string();
        assert!(matches!(validate(&robot), Err(Error::UndefinedLink { .. })));
    }

    #[test]
    fn test_duplicate_names() {
        let robot = chain().with_link(Link::new("tool"));
        assert!(matches!(validate(&robot), Err(Error::DuplicateLink(name)) if name == "tool"));

        let robot = chain().with_joint(Joint::fixed("mount", "base", "tool"));
        assert!(matches!(validate(&robot), Err(Error::DuplicateJoint(name)) if name == "mount"));

        let robot = chain()
            .with_material(Material::named("grey"))
            .with_material(Material::named("grey"));
        assert!(matches!(validate(&robot), Err(Error::DuplicateMaterial(_))));
    }

    #[test]
    fn test_multiple_roots() {
        let robot = chain().with_link(Link::new("floating_box"));
        match validate(&robot) {
            Err(Error::MultipleRootLinks(roots)) => {
                assert_eq!(roots, vec!["base".to_string(), "floating_box".to_string()]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_two_parents_is_a_loop() {
        let robot = chain().with_joint(Joint::fixed("extra", "base", "lower"));
        let err = validate(&robot).unwrap_err();
        assert!(matches!(err, Error::KinematicLoop(_)));
        assert!(err.to_string().contains("multiple parent joints"));
    }

    #[test]
    fn test_cycle_detached_from_root() {
        let robot = Robot::new("r")
            .with_link(Link::new("root"))
            .with_link(Link::new("a"))
            .with_link(Link::new("b"))
            .with_joint(Joint::fixed("ab", "a", "b"))
            .with_joint(Joint::fixed("ba", "b", "a"));
        let err = validate(&robot).unwrap_err();
        assert!(matches!(err, Error::KinematicLoop(_)));
        assert!(err.to_string().contains("a, b"));
    }

    #[test]
    fn test_full_cycle_has_no_root() {
        let robot = Robot::new("r")
            .with_link(Link::new("a"))
            .with_link(Link::new("b"))
            .with_joint(Joint::fixed("ab", "a", "b"))
            .with_joint(Joint::fixed("ba", "b", "a"));
        assert!(matches!(validate(&robot), Err(Error::NoRootLink)));
    }

    #[test]
    fn test_self_loop() {
        let robot = Robot::new("r")
            .with_link(Link::new("a"))
            .with_joint(Joint::fixed("aa", "a", "a"));
        assert!(matches!(validate(&robot), Err(Error::KinematicLoop(_))));
    }

    #[test]
    fn test_revolute_requires_axis_and_limit() {
        let mut robot = chain();
        robot.joints[0].axis = None;
        assert!(matches!(
            validate(&robot),
            Err(Error::MissingAxis { joint_type: "revolute", .. })
        ));

        let mut robot = chain();
        robot.joints[1].limit = None;
        assert!(matches!(
            validate(&robot),
            Err(Error::MissingLimit { joint_type: "revolute", .. })
        ));
    }

    #[test]
    fn test_fixed_rejects_axis_and_limit() {
        let mut robot = chain();
        robot.joints[2].axis = Some(Vector3::z());
        assert!(matches!(
            validate(&robot),
            Err(Error::UnexpectedElement { element: "axis", .. })
        ));

        let mut robot = chain();
        robot.joints[2].limit = Some(limit());
        assert!(matches!(
            validate(&robot),
            Err(Error::UnexpectedElement { element: "limit", .. })
        ));
    }

    #[test]
    fn test_continuous_and_prismatic_rules() {
        let base = || {
            Robot::new("r")
                .with_link(Link::new("a"))
                .with_link(Link::new("b"))
        };

        let wheel = base().with_joint(Joint::new("wheel", JointType::Continuous, "a", "b").with_axis(Vector3::y()));
        assert!(validate(&wheel).is_ok());

        let wheel = base().with_joint(Joint::new("wheel", JointType::Continuous, "a", "b"));
        assert!(matches!(validate(&wheel), Err(Error::MissingAxis { .. })));

        let slider = base().with_joint(Joint::new("slide", JointType::Prismatic, "a", "b").with_axis(Vector3::x()));
        assert!(matches!(
            validate(&slider),
            Err(Error::MissingLimit { joint_type: "prismatic", .. })
        ));

        let free = base().with_joint(Joint::new("free", JointType::Floating, "a", "b"));
        assert!(validate(&free).is_ok());
    }

    #[test]
    fn test_inverted_limit() {
        let mut robot = chain();
        robot.joints[0].limit = Some(Limit::new(1.0, -1.0, 10.0, 1.0));
        match validate(&robot) {
            Err(Error::InvertedLimit { joint, lower, upper }) => {
                assert_eq!(joint, "shoulder");
                assert!((lower - 1.0).abs() < f64::EPSILON);
                assert!((upper + 1.0).abs() < f64::EPSILON);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_equal_limits_are_allowed() {
        let mut robot = chain();
        robot.joints[0].limit = Some(Limit::new(0.5, 0.5, 10.0, 1.0));
        assert!(validate(&robot).is_ok());
    }

    #[test]
    fn test_negative_effort() {
        let mut robot = chain();
        robot.joints[0].limit = Some(Limit::new(-1.0, 1.0, -3.0, 1.0));
        let err = validate(&robot).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));
        assert!(err.to_string().contains("effort must not be negative"));
    }

    #[test]
    fn test_negative_damping() {
        let mut robot = chain();
        robot.joints[0].dynamics = Some(Dynamics {
            damping: -0.1,
            friction: 0.0,
        });
        assert!(validate(&robot).unwrap_err().to_string().contains("damping"));
    }

    #[test]
    fn test_zero_axis() {
        let mut robot = chain();
        robot.joints[0].axis = Some(Vector3::zeros());
        assert!(validate(&robot).unwrap_err().to_string().contains("axis must be non-zero"));
    }

    #[test]
    fn test_non_finite_origin() {
        let mut robot = chain();
        robot.joints[1].origin = Origin::from_xyz(0.0, f64::NAN, 0.0);
        let err = validate(&robot).unwrap_err();
        assert!(err.to_string().contains("joint 'elbow'"));
        assert!(err.to_string().contains("must be finite"));
    }

    #[test]
    fn test_non_positive_geometry() {
        let mut robot = chain();
        robot.links[0].visual = Some(Visual::new(Geometry::box_shape(0.1, 0.0, 0.1)));
        let err = validate(&robot).unwrap_err();
        assert!(err.to_string().contains("box size must be positive"));

        let mut robot = chain();
        robot.links[1].visual = Some(Visual::new(Geometry::sphere(-1.0)));
        assert!(validate(&robot).is_err());
    }

    #[test]
    fn test_color_out_of_range() {
        let robot = chain().with_material(Material::with_color("hot", Color::rgba(1.5, 0.0, 0.0, 1.0)));
        let err = validate(&robot).unwrap_err();
        assert!(err.to_string().contains("material 'hot'"));
        assert!(err.to_string().contains("[0, 1]"));
    }

    #[test]
    fn test_undefined_material_reference() {
        let mut robot = chain();
        robot.links[0].visual =
            Some(Visual::new(Geometry::sphere(0.1)).with_material(Material::named("chrome")));
        let err = validate(&robot).unwrap_err();
        assert!(err.to_string().contains("material 'chrome' is not defined"));

        let robot = robot.with_material(Material::with_color("chrome", Color::rgba(0.8, 0.8, 0.8, 1.0)));
        assert!(validate(&robot).is_ok());
    }

    #[test]
    fn test_non_positive_mass() {
        let mut robot = chain();
        robot.links[0].inertial = Some(Inertial {
            origin: Origin::default(),
            mass: 0.0,
            inertia: Inertia::diagonal(0.1, 0.1, 0.1),
        });
        let err = validate(&robot).unwrap_err();
        assert!(err.to_string().contains("mass must be positive"));
    }

    #[test]
    fn test_errors_are_structural() {
        let mut robot = chain();
        robot.joints[0].limit = None;
        assert!(validate(&robot).unwrap_err().is_structural());
    }

    #[test]
    fn test_bundled_robot_validates() {
        let robot = parse_str(BUNDLED_ROBOT).unwrap();
        let tree = validate(&robot).expect("bundled robot should validate");
        assert_eq!(tree.root(), "base_link");
        assert_eq!(tree.leaves(), vec!["flange"]);
        assert_eq!(
            tree.chain_to("flange"),
            Some(vec!["joint1", "joint2", "joint3", "joint4", "flange_joint"])
        );
    }
}
