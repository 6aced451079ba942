//! URDF reading and writing.
//!
//! [`parse_str`] and [`parse_file`] turn a URDF document into a
//! [`Robot`](crate::model::Robot); [`write_string`] and [`write_file`] go
//! the other way. Parsing checks the document's shape only. Tree structure
//! and value ranges are checked by [`crate::validation::validate`].

mod parser;
mod writer;

pub use parser::{parse_file, parse_str};
pub use writer::{write_file, write_string};

/// The robot description shipped with the crate.
pub const BUNDLED_ROBOT: &str = include_str!("../../assets/robot_hw.urdf");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JointType;

    #[test]
    fn test_bundled_robot_parses() {
        let robot = parse_str(BUNDLED_ROBOT).expect("bundled robot should parse");
        assert_eq!(robot.name, "robot_hw");
        assert_eq!(robot.links.len(), 6);
        assert_eq!(robot.joints.len(), 5);
        assert_eq!(robot.materials.len(), 2);
        assert_eq!(robot.dof(), 4);

        let flange = robot.joint("flange_joint").expect("flange joint");
        assert_eq!(flange.joint_type, JointType::Fixed);
        assert!(flange.axis.is_none() && flange.limit.is_none());

        for joint in robot.joints.iter().filter(|j| j.joint_type == JointType::Revolute) {
            assert!(joint.axis.is_some(), "{} has no axis", joint.name);
            let limit = joint.limit.expect("revolute joints carry a limit");
            assert!(limit.lower <= limit.upper);
        }
    }

    #[test]
    fn test_bundled_robot_round_trip() {
        let robot = parse_str(BUNDLED_ROBOT).unwrap();
        let xml = write_string(&robot, 2).unwrap();
        let reparsed = parse_str(&xml).unwrap();
        assert_eq!(reparsed, robot);
        assert!(reparsed.same_graph(&robot));

        // Canonical output is a fixed point.
        assert_eq!(write_string(&reparsed, 2).unwrap(), xml);
    }

    #[test]
    fn test_bundled_robot_colors_resolve() {
        let robot = parse_str(BUNDLED_ROBOT).unwrap();
        for link in &robot.links {
            let visual = link.visual.as_ref().expect("every bundled link has a visual");
            assert!(robot.resolve_color(visual).is_some(), "{} has no color", link.name);
        }
    }
}
