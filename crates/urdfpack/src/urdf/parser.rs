//! URDF XML to [`Robot`].
//!
//! Pull parser over `quick_xml` events. Each element has its own function
//! that consumes events up to its matching end tag.

use std::borrow::Cow;
use std::path::Path;

use nalgebra::Vector3;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::model::{
    Collision, Color, Dynamics, Geometry, Inertia, Inertial, Joint, JointType, Limit, Link,
    Material, Origin, Robot, Visual,
};

type XmlReader<'a> = Reader<&'a [u8]>;

/// Parse a URDF document held in memory.
///
/// # Errors
///
/// Returns an error if the XML is malformed, the root element is not
/// `<robot>`, or any element is missing required content.
pub fn parse_str(xml: &str) -> Result<Robot> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) if e.name().as_ref() == b"robot" => {
                return parse_robot(&mut reader, &e);
            }
            Event::Empty(e) if e.name().as_ref() == b"robot" => {
                return Ok(Robot::new(get_attribute(&e, "name")?));
            }
            Event::Start(e) | Event::Empty(e) => {
                return Err(Error::missing_element(
                    "robot",
                    format!("document (found <{}>)", element_name(&e)),
                ));
            }
            Event::Eof => return Err(Error::missing_element("robot", "document")),
            _ => {}
        }
    }
}

/// Read and parse a URDF file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Robot> {
    let path = path.as_ref();
    debug!("Reading robot description from {}", path.display());
    let xml = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(&xml)
}

fn parse_robot(reader: &mut XmlReader<'_>, start: &BytesStart<'_>) -> Result<Robot> {
    let mut robot = Robot::new(get_attribute(start, "name")?);

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => match e.name().as_ref() {
                b"link" => robot.links.push(parse_link(reader, &e)?),
                b"joint" => robot.joints.push(parse_joint(reader, &e)?),
                b"material" => robot.materials.push(parse_material(reader, &e)?),
                other => {
                    warn!(element = %String::from_utf8_lossy(other), "Skipping unsupported element");
                    skip_element(reader, &e)?;
                }
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"link" => robot.links.push(Link::new(get_attribute(&e, "name")?)),
                b"material" => robot.materials.push(Material::named(get_attribute(&e, "name")?)),
                b"joint" => {
                    let name = get_attribute(&e, "name")?;
                    return Err(Error::missing_element("parent", format!("joint '{name}'")));
                }
                other => {
                    warn!(element = %String::from_utf8_lossy(other), "Skipping unsupported element");
                }
            },
            Event::End(e) if e.name().as_ref() == b"robot" => break,
            Event::Eof => return Err(unexpected_eof("robot")),
            _ => {}
        }
    }

    debug!(
        robot = %robot.name,
        links = robot.links.len(),
        joints = robot.joints.len(),
        "Parsed robot description"
    );
    Ok(robot)
}

fn parse_link(reader: &mut XmlReader<'_>, start: &BytesStart<'_>) -> Result<Link> {
    let mut link = Link::new(get_attribute(start, "name")?);

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => match e.name().as_ref() {
                b"visual" => {
                    if link.visual.is_some() {
                        return Err(duplicate(format!("link '{}'", link.name), "visual"));
                    }
                    link.visual = Some(parse_visual(reader, &e, &link.name)?);
                }
                b"collision" => {
                    if link.collision.is_some() {
                        return Err(duplicate(format!("link '{}'", link.name), "collision"));
                    }
                    link.collision = Some(parse_collision(reader, &e, &link.name)?);
                }
                b"inertial" => {
                    if link.inertial.is_some() {
                        return Err(duplicate(format!("link '{}'", link.name), "inertial"));
                    }
                    link.inertial = Some(parse_inertial(reader, &link.name)?);
                }
                other => {
                    warn!(
                        link = %link.name,
                        element = %String::from_utf8_lossy(other),
                        "Skipping unsupported link element"
                    );
                    skip_element(reader, &e)?;
                }
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"visual" => {
                    return Err(Error::missing_element(
                        "geometry",
                        format!("visual of link '{}'", link.name),
                    ))
                }
                b"collision" => {
                    return Err(Error::missing_element(
                        "geometry",
                        format!("collision of link '{}'", link.name),
                    ))
                }
                b"inertial" => {
                    return Err(Error::missing_element(
                        "mass",
                        format!("inertial of link '{}'", link.name),
                    ))
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"link" => break,
            Event::Eof => return Err(unexpected_eof("link")),
            _ => {}
        }
    }

    trace!(link = %link.name, "Parsed link");
    Ok(link)
}

fn parse_visual(reader: &mut XmlReader<'_>, start: &BytesStart<'_>, link: &str) -> Result<Visual> {
    let name = get_attribute_opt(start, "name")?;
    let mut origin = Origin::default();
    let mut geometry = None;
    let mut material = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => match e.name().as_ref() {
                b"geometry" => geometry = Some(parse_geometry(reader, link)?),
                b"material" => material = Some(parse_material(reader, &e)?),
                b"origin" => {
                    origin = parse_origin(&e)?;
                    skip_element(reader, &e)?;
                }
                _ => skip_element(reader, &e)?,
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"origin" => origin = parse_origin(&e)?,
                b"material" => material = Some(Material::named(get_attribute(&e, "name")?)),
                b"geometry" => {
                    return Err(shape_missing(link));
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"visual" => break,
            Event::Eof => return Err(unexpected_eof("visual")),
            _ => {}
        }
    }

    let geometry = geometry
        .ok_or_else(|| Error::missing_element("geometry", format!("visual of link '{link}'")))?;

    Ok(Visual {
        name,
        origin,
        geometry,
        material,
    })
}

fn parse_collision(
    reader: &mut XmlReader<'_>,
    start: &BytesStart<'_>,
    link: &str,
) -> Result<Collision> {
    let name = get_attribute_opt(start, "name")?;
    let mut origin = Origin::default();
    let mut geometry = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => match e.name().as_ref() {
                b"geometry" => geometry = Some(parse_geometry(reader, link)?),
                b"origin" => {
                    origin = parse_origin(&e)?;
                    skip_element(reader, &e)?;
                }
                _ => skip_element(reader, &e)?,
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"origin" => origin = parse_origin(&e)?,
                b"geometry" => return Err(shape_missing(link)),
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"collision" => break,
            Event::Eof => return Err(unexpected_eof("collision")),
            _ => {}
        }
    }

    let geometry = geometry
        .ok_or_else(|| Error::missing_element("geometry", format!("collision of link '{link}'")))?;

    Ok(Collision {
        name,
        origin,
        geometry,
    })
}

fn parse_inertial(reader: &mut XmlReader<'_>, link: &str) -> Result<Inertial> {
    let mut origin = Origin::default();
    let mut mass = None;
    let mut inertia = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => {
                match e.name().as_ref() {
                    b"origin" => origin = parse_origin(&e)?,
                    b"mass" => mass = Some(get_f64(&e, "value")?),
                    b"inertia" => inertia = Some(parse_inertia(&e)?),
                    _ => {}
                }
                skip_element(reader, &e)?;
            }
            Event::Empty(e) => match e.name().as_ref() {
                b"origin" => origin = parse_origin(&e)?,
                b"mass" => mass = Some(get_f64(&e, "value")?),
                b"inertia" => inertia = Some(parse_inertia(&e)?),
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"inertial" => break,
            Event::Eof => return Err(unexpected_eof("inertial")),
            _ => {}
        }
    }

    let context = || format!("inertial of link '{link}'");
    Ok(Inertial {
        origin,
        mass: mass.ok_or_else(|| Error::missing_element("mass", context()))?,
        inertia: inertia.ok_or_else(|| Error::missing_element("inertia", context()))?,
    })
}

fn parse_inertia(e: &BytesStart<'_>) -> Result<Inertia> {
    Ok(Inertia {
        ixx: get_f64(e, "ixx")?,
        ixy: get_f64(e, "ixy")?,
        ixz: get_f64(e, "ixz")?,
        iyy: get_f64(e, "iyy")?,
        iyz: get_f64(e, "iyz")?,
        izz: get_f64(e, "izz")?,
    })
}

fn parse_geometry(reader: &mut XmlReader<'_>, link: &str) -> Result<Geometry> {
    let mut geometry = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => {
                if let Some(shape) = parse_shape(&e)? {
                    geometry = Some(shape);
                }
                skip_element(reader, &e)?;
            }
            Event::Empty(e) => {
                if let Some(shape) = parse_shape(&e)? {
                    geometry = Some(shape);
                }
            }
            Event::End(e) if e.name().as_ref() == b"geometry" => break,
            Event::Eof => return Err(unexpected_eof("geometry")),
            _ => {}
        }
    }

    geometry.ok_or_else(|| shape_missing(link))
}

/// Interpret one child of `<geometry>`; unknown children yield `None`.
fn parse_shape(e: &BytesStart<'_>) -> Result<Option<Geometry>> {
    let shape = match e.name().as_ref() {
        b"box" => Geometry::Box {
            size: get_vector3(e, "size")?,
        },
        b"cylinder" => Geometry::Cylinder {
            radius: get_f64(e, "radius")?,
            length: get_f64(e, "length")?,
        },
        b"sphere" => Geometry::Sphere {
            radius: get_f64(e, "radius")?,
        },
        b"mesh" => Geometry::Mesh {
            filename: get_attribute(e, "filename")?,
            scale: get_attribute_opt(e, "scale")?
                .map(|s| parse_vector3(&s, "scale", "mesh"))
                .transpose()?,
        },
        _ => return Ok(None),
    };
    Ok(Some(shape))
}

fn parse_material(reader: &mut XmlReader<'_>, start: &BytesStart<'_>) -> Result<Material> {
    let mut material = Material::named(get_attribute(start, "name")?);

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => {
                apply_material_child(&mut material, &e)?;
                skip_element(reader, &e)?;
            }
            Event::Empty(e) => apply_material_child(&mut material, &e)?,
            Event::End(e) if e.name().as_ref() == b"material" => break,
            Event::Eof => return Err(unexpected_eof("material")),
            _ => {}
        }
    }

    Ok(material)
}

fn apply_material_child(material: &mut Material, e: &BytesStart<'_>) -> Result<()> {
    match e.name().as_ref() {
        b"color" => {
            let rgba = get_attribute(e, "rgba")?;
            material.color = Some(parse_color(&rgba)?);
        }
        b"texture" => material.texture = Some(get_attribute(e, "filename")?),
        _ => {}
    }
    Ok(())
}

fn parse_joint(reader: &mut XmlReader<'_>, start: &BytesStart<'_>) -> Result<Joint> {
    let name = get_attribute(start, "name")?;
    let type_str = get_attribute(start, "type")?;
    let joint_type: JointType = type_str.parse().map_err(|joint_type| Error::UnknownJointType {
        joint: name.clone(),
        joint_type,
    })?;

    let mut parent = None;
    let mut child = None;
    let mut origin = Origin::default();
    let mut seen_origin = false;
    let mut axis = None;
    let mut limit = None;
    let mut dynamics = None;

    loop {
        let (e, is_start) = match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => (e, true),
            Event::Empty(e) => (e, false),
            Event::End(e) if e.name().as_ref() == b"joint" => break,
            Event::Eof => return Err(unexpected_eof("joint")),
            _ => continue,
        };

        let element = e.name();
        let repeated = |seen: bool, tag: &'static str| {
            if seen {
                Err(duplicate(format!("joint '{name}'"), tag))
            } else {
                Ok(())
            }
        };
        match element.as_ref() {
            b"parent" => {
                repeated(parent.is_some(), "parent")?;
                parent = Some(get_attribute(&e, "link")?);
            }
            b"child" => {
                repeated(child.is_some(), "child")?;
                child = Some(get_attribute(&e, "link")?);
            }
            b"origin" => {
                repeated(seen_origin, "origin")?;
                seen_origin = true;
                origin = parse_origin(&e)?;
            }
            b"axis" => {
                repeated(axis.is_some(), "axis")?;
                axis = Some(get_vector3(&e, "xyz")?);
            }
            b"limit" => {
                repeated(limit.is_some(), "limit")?;
                limit = Some(parse_limit(&e)?);
            }
            b"dynamics" => {
                repeated(dynamics.is_some(), "dynamics")?;
                dynamics = Some(Dynamics {
                    damping: get_f64_or(&e, "damping", 0.0)?,
                    friction: get_f64_or(&e, "friction", 0.0)?,
                });
            }
            other => {
                trace!(joint = %name, element = %String::from_utf8_lossy(other), "Ignoring joint child");
            }
        }

        if is_start {
            skip_element(reader, &e)?;
        }
    }

    let parent =
        parent.ok_or_else(|| Error::missing_element("parent", format!("joint '{name}'")))?;
    let child = child.ok_or_else(|| Error::missing_element("child", format!("joint '{name}'")))?;

    trace!(joint = %name, %parent, %child, "Parsed joint");
    Ok(Joint {
        name,
        joint_type,
        parent,
        child,
        origin,
        axis,
        limit,
        dynamics,
    })
}

fn parse_limit(e: &BytesStart<'_>) -> Result<Limit> {
    Ok(Limit {
        lower: get_f64_or(e, "lower", 0.0)?,
        upper: get_f64_or(e, "upper", 0.0)?,
        effort: get_f64(e, "effort")?,
        velocity: get_f64(e, "velocity")?,
    })
}

fn parse_origin(e: &BytesStart<'_>) -> Result<Origin> {
    let xyz = get_attribute_opt(e, "xyz")?
        .map(|s| parse_vector3(&s, "xyz", "origin"))
        .transpose()?
        .unwrap_or_else(Vector3::zeros);
    let rpy = get_attribute_opt(e, "rpy")?
        .map(|s| parse_vector3(&s, "rpy", "origin"))
        .transpose()?
        .unwrap_or_else(Vector3::zeros);
    Ok(Origin::new(xyz, rpy))
}

// ============================================================================
// Attribute helpers
// ============================================================================

fn get_attribute(e: &BytesStart<'_>, name: &'static str) -> Result<String> {
    get_attribute_opt(e, name)?.ok_or_else(|| Error::missing_attribute(name, element_name(e)))
}

fn get_attribute_opt(e: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::XmlParse(err.to_string()))?;
        if attr.key.as_ref() == name.as_bytes() {
            let value: Cow<'_, str> = attr.unescape_value().map_err(xml_error)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn get_f64(e: &BytesStart<'_>, name: &'static str) -> Result<f64> {
    let raw = get_attribute(e, name)?;
    parse_f64(&raw, name, &element_name(e))
}

fn get_f64_or(e: &BytesStart<'_>, name: &'static str, default: f64) -> Result<f64> {
    match get_attribute_opt(e, name)? {
        Some(raw) => parse_f64(&raw, name, &element_name(e)),
        None => Ok(default),
    }
}

fn get_vector3(e: &BytesStart<'_>, name: &'static str) -> Result<Vector3<f64>> {
    let raw = get_attribute(e, name)?;
    parse_vector3(&raw, name, &element_name(e))
}

fn parse_f64(raw: &str, attribute: &'static str, element: &str) -> Result<f64> {
    raw.trim().parse().map_err(|_| {
        Error::invalid_attribute(attribute, element, format!("expected a number, got '{raw}'"))
    })
}

fn parse_floats(raw: &str, attribute: &'static str, element: &str) -> Result<Vec<f64>> {
    raw.split_whitespace()
        .map(|part| parse_f64(part, attribute, element))
        .collect()
}

/// Parse a space-separated triple.
pub(crate) fn parse_vector3(raw: &str, attribute: &'static str, element: &str) -> Result<Vector3<f64>> {
    match parse_floats(raw, attribute, element)?.as_slice() {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        parts => Err(Error::invalid_attribute(
            attribute,
            element,
            format!("expected 3 values, got {}", parts.len()),
        )),
    }
}

fn parse_color(raw: &str) -> Result<Color> {
    match parse_floats(raw, "rgba", "color")?.as_slice() {
        [r, g, b, a] => Ok(Color::rgba(*r, *g, *b, *a)),
        parts => Err(Error::invalid_attribute(
            "rgba",
            "color",
            format!("expected 4 values, got {}", parts.len()),
        )),
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn xml_error(err: quick_xml::Error) -> Error {
    Error::XmlParse(err.to_string())
}

fn unexpected_eof(element: &str) -> Error {
    Error::XmlParse(format!("unexpected end of document inside <{element}>"))
}

fn duplicate(owner: String, element: &'static str) -> Error {
    Error::DuplicateElement { owner, element }
}

fn shape_missing(link: &str) -> Error {
    Error::missing_element(
        "box|cylinder|sphere|mesh",
        format!("geometry of link '{link}'"),
    )
}

/// Consume events up to the end tag matching `start`.
fn skip_element(reader: &mut XmlReader<'_>, start: &BytesStart<'_>) -> Result<()> {
    reader.read_to_end(start.name()).map_err(xml_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_simple_robot() {
        let xml = r#"
            <robot name="test_robot">
                <link name="base_link">
                    <inertial>
                        <mass value="1.0"/>
                        <inertia ixx="0.1" ixy="0" ixz="0" iyy="0.1" iyz="0" izz="0.1"/>
                    </inertial>
                </link>
                <link name="link1"/>
            </robot>
        "#;

        let robot = parse_str(xml).expect("should parse");
        assert_eq!(robot.name, "test_robot");
        assert_eq!(robot.links.len(), 2);

        let base = robot.link("base_link").expect("base_link should exist");
        let inertial = base.inertial.as_ref().expect("should have inertial");
        assert_relative_eq!(inertial.mass, 1.0);
        assert_relative_eq!(inertial.inertia.izz, 0.1);
        assert!(robot.link("link1").is_some_and(Link::is_empty));
    }

    #[test]
    fn test_parse_revolute_joint() {
        let xml = r#"
            <robot name="test">
                <link name="base"/>
                <link name="child"/>
                <joint name="joint1" type="revolute">
                    <origin xyz="0 0 0.5" rpy="0 0 1.5707963"/>
                    <parent link="base"/>
                    <child link="child"/>
                    <axis xyz="0 0 1"/>
                    <limit lower="-1.57" upper="1.57" effort="10" velocity="1"/>
                </joint>
            </robot>
        "#;

        let robot = parse_str(xml).expect("should parse");
        let joint = robot.joint("joint1").expect("joint1 should exist");
        assert_eq!(joint.joint_type, JointType::Revolute);
        assert_eq!(joint.parent, "base");
        assert_eq!(joint.child, "child");
        assert_eq!(joint.axis, Some(Vector3::z()));
        assert_relative_eq!(joint.origin.xyz.z, 0.5);
        assert_relative_eq!(joint.origin.rpy.z, 1.570_796_3);

        let limit = joint.limit.expect("should have limit");
        assert_relative_eq!(limit.lower, -1.57);
        assert_relative_eq!(limit.upper, 1.57);
        assert_relative_eq!(limit.effort, 10.0);
        assert_relative_eq!(limit.velocity, 1.0);
    }

    #[test]
    fn test_fixed_joint_keeps_absent_axis_and_limit() {
        let xml = r#"
            <robot name="test">
                <link name="a"/>
                <link name="b"/>
                <joint name="weld" type="fixed">
                    <parent link="a"/>
                    <child link="b"/>
                </joint>
            </robot>
        "#;
        let joint = parse_str(xml).unwrap().joints.remove(0);
        assert_eq!(joint.joint_type, JointType::Fixed);
        assert!(joint.axis.is_none());
        assert!(joint.limit.is_none());
        assert!(joint.origin.is_identity());
    }

    #[test]
    fn test_parse_visual_with_inline_material() {
        let xml = r#"
            <robot name="test">
                <link name="base">
                    <visual name="shell">
                        <origin xyz="0 0 0.05"/>
                        <geometry>
                            <cylinder radius="0.1" length="0.1"/>
                        </geometry>
                        <material name="orange">
                            <color rgba="1.0 0.423 0.039 1.0"/>
                        </material>
                    </visual>
                </link>
            </robot>
        "#;

        let robot = parse_str(xml).expect("should parse");
        let visual = robot.links[0].visual.as_ref().expect("visual");
        assert_eq!(visual.name.as_deref(), Some("shell"));
        assert_eq!(visual.geometry, Geometry::cylinder(0.1, 0.1));
        assert_relative_eq!(visual.origin.xyz.z, 0.05);

        let material = visual.material.as_ref().expect("material");
        assert_eq!(material.name, "orange");
        assert_eq!(material.color, Some(Color::rgba(1.0, 0.423, 0.039, 1.0)));
    }

    #[test]
    fn test_parse_material_reference_and_definition() {
        let xml = r#"
            <robot name="test">
                <material name="grey"><color rgba="0.5 0.5 0.5 1"/></material>
                <link name="base">
                    <visual>
                        <geometry><sphere radius="0.2"/></geometry>
                        <material name="grey"/>
                    </visual>
                </link>
            </robot>
        "#;

        let robot = parse_str(xml).expect("should parse");
        assert_eq!(robot.materials.len(), 1);
        let visual = robot.links[0].visual.as_ref().expect("visual");
        assert!(visual.material.as_ref().is_some_and(Material::is_reference));
        assert_eq!(robot.resolve_color(visual), Some(Color::rgba(0.5, 0.5, 0.5, 1.0)));
    }

    #[test]
    fn test_parse_box_and_mesh() {
        let xml = r#"
            <robot name="test">
                <link name="a">
                    <visual><geometry><box size="1 2 3"/></geometry></visual>
                    <collision>
                        <geometry><mesh filename="package://r/a.stl" scale="0.001 0.001 0.001"/></geometry>
                    </collision>
                </link>
            </robot>
        "#;

        let robot = parse_str(xml).expect("should parse");
        let link = &robot.links[0];
        assert_eq!(link.visual.as_ref().map(|v| &v.geometry), Some(&Geometry::box_shape(1.0, 2.0, 3.0)));
        match &link.collision.as_ref().expect("collision").geometry {
            Geometry::Mesh { filename, scale } => {
                assert_eq!(filename, "package://r/a.stl");
                assert_eq!(*scale, Some(Vector3::new(0.001, 0.001, 0.001)));
            }
            other => panic!("expected mesh geometry, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_elements_are_skipped() {
        let xml = r#"
            <robot name="test">
                <gazebo reference="base"><material>Gazebo/Grey</material></gazebo>
                <link name="base">
                    <sensor name="cam"><visual><geometry/></visual></sensor>
                    <visual><geometry><sphere radius="1"/></geometry></visual>
                </link>
                <transmission name="t"><type>x</type><joint name="j"/></transmission>
                <plugin/>
            </robot>
        "#;
        crate::logging::init_test_logging();
        let robot = parse_str(xml).expect("should parse");
        assert_eq!(robot.links.len(), 1);
        assert!(robot.joints.is_empty());
        assert_eq!(
            robot.links[0].visual.as_ref().map(|v| &v.geometry),
            Some(&Geometry::Sphere { radius: 1.0 })
        );
    }

    #[test]
    fn test_second_visual_is_rejected() {
        let xml = r#"
            <robot name="test">
                <link name="base">
                    <visual><geometry><sphere radius="1"/></geometry></visual>
                    <visual><geometry><sphere radius="2"/></geometry></visual>
                </link>
            </robot>
        "#;
        let err = parse_str(xml).unwrap_err();
        assert!(matches!(err, Error::DuplicateElement { element: "visual", .. }));
        assert_eq!(
            err.to_string(),
            "link 'base' declares more than one <visual>"
        );
    }

    fn joint_with(children: &str) -> String {
        format!(
            r#"<robot name="t">
                <link name="a"/><link name="b"/><link name="c"/>
                <joint name="j" type="revolute">{children}</joint>
            </robot>"#
        )
    }

    #[test]
    fn test_joint_with_two_parents_is_rejected() {
        let xml = joint_with(r#"<parent link="a"/><parent link="c"/><child link="b"/>"#);
        let err = parse_str(&xml).unwrap_err();
        assert!(err.is_parse_error());
        assert!(matches!(err, Error::DuplicateElement { element: "parent", .. }));
        assert_eq!(err.to_string(), "joint 'j' declares more than one <parent>");
    }

    #[test]
    fn test_joint_with_two_children_is_rejected() {
        let xml = joint_with(r#"<parent link="a"/><child link="b"/><child link="c"></child>"#);
        let err = parse_str(&xml).unwrap_err();
        assert!(matches!(err, Error::DuplicateElement { element: "child", .. }));
    }

    #[test]
    fn test_joint_repeated_axis_limit_origin_dynamics() {
        let cases = [
            ("axis", r#"<axis xyz="0 0 1"/><axis xyz="1 0 0"/>"#),
            (
                "limit",
                r#"<limit effort="1" velocity="1"/><limit lower="-1" upper="1" effort="1" velocity="1"/>"#,
            ),
            ("origin", r#"<origin xyz="0 0 1"/><origin rpy="0 0 1"/>"#),
            ("dynamics", r#"<dynamics damping="0.1"/><dynamics friction="0.2"/>"#),
        ];
        for (element, repeated) in cases {
            let xml = joint_with(&format!(r#"<parent link="a"/><child link="b"/>{repeated}"#));
            match parse_str(&xml) {
                Err(Error::DuplicateElement { owner, element: found }) => {
                    assert_eq!(owner, "joint 'j'");
                    assert_eq!(found, element);
                }
                other => panic!("repeated <{element}> should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_visual_without_geometry() {
        let xml = r#"<robot name="t"><link name="a"><visual><origin xyz="0 0 1"/></visual></link></robot>"#;
        let err = parse_str(xml).unwrap_err();
        assert!(matches!(err, Error::MissingElement { element: "geometry", .. }));
    }

    #[test]
    fn test_geometry_without_shape() {
        let xml = r#"<robot name="t"><link name="a"><visual><geometry></geometry></visual></link></robot>"#;
        let err = parse_str(xml).unwrap_err();
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("geometry of link 'a'"));
    }

    #[test]
    fn test_parse_vector3() {
        let v = parse_vector3("1.0 2.0 3.0", "xyz", "origin").expect("should parse");
        assert_eq!(v, Vector3::new(1.0, 2.0, 3.0));

        let v = parse_vector3("  1   2   3  ", "xyz", "origin").expect("should parse");
        assert_eq!(v, Vector3::new(1.0, 2.0, 3.0));

        let err = parse_vector3("1 2", "xyz", "origin").unwrap_err();
        assert!(err.to_string().contains("expected 3 values, got 2"));

        let err = parse_vector3("1 two 3", "xyz", "origin").unwrap_err();
        assert!(matches!(err, Error::InvalidAttribute { attribute: "xyz", .. }));
    }

    #[test]
    fn test_bad_color_arity() {
        let xml = r#"<robot name="t"><material name="m"><color rgba="1 0 0"/></material></robot>"#;
        let err = parse_str(xml).unwrap_err();
        assert!(err.to_string().contains("expected 4 values, got 3"));
    }

    #[test]
    fn test_missing_robot_name() {
        let err = parse_str(r#"<robot><link name="base"/></robot>"#).unwrap_err();
        assert!(matches!(err, Error::MissingAttribute { attribute: "name", .. }));
    }

    #[test]
    fn test_wrong_root_element() {
        let err = parse_str(r#"<model name="m"/>"#).unwrap_err();
        assert!(matches!(err, Error::MissingElement { element: "robot", .. }));
        assert!(err.to_string().contains("<model>"));
    }

    #[test]
    fn test_empty_document() {
        let err = parse_str("").unwrap_err();
        assert!(matches!(err, Error::MissingElement { element: "robot", .. }));
    }

    #[test]
    fn test_truncated_document() {
        let err = parse_str(r#"<robot name="t"><link name="a">"#).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_unknown_joint_type() {
        let xml = r#"
            <robot name="test">
                <link name="a"/>
                <link name="b"/>
                <joint name="j" type="hinge">
                    <parent link="a"/>
                    <child link="b"/>
                </joint>
            </robot>
        "#;
        let err = parse_str(xml).unwrap_err();
        match err {
            Error::UnknownJointType { joint, joint_type } => {
                assert_eq!(joint, "j");
                assert_eq!(joint_type, "hinge");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_joint_without_child() {
        let xml = r#"
            <robot name="test">
                <link name="a"/>
                <joint name="j" type="fixed"><parent link="a"/></joint>
            </robot>
        "#;
        let err = parse_str(xml).unwrap_err();
        assert!(matches!(err, Error::MissingElement { element: "child", .. }));
    }

    #[test]
    fn test_limit_requires_effort_and_velocity() {
        let xml = r#"
            <robot name="test">
                <link name="a"/><link name="b"/>
                <joint name="j" type="revolute">
                    <parent link="a"/><child link="b"/>
                    <axis xyz="0 0 1"/>
                    <limit lower="0" upper="1" velocity="1"/>
                </joint>
            </robot>
        "#;
        let err = parse_str(xml).unwrap_err();
        assert!(matches!(err, Error::MissingAttribute { attribute: "effort", .. }));
    }

    #[test]
    fn test_escaped_attribute_values() {
        let xml = r#"<robot name="r&amp;d"><link name="a"/></robot>"#;
        assert_eq!(parse_str(xml).unwrap().name, "r&d");
    }

    #[test]
    fn test_parse_file_missing() {
        let err = parse_file("/nonexistent/robot.urdf").unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
