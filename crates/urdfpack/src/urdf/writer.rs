//! [`Robot`] to URDF XML.
//!
//! Output is deterministic: the XML declaration, then robot-level
//! materials, links and joints, each in declaration order. Floats are
//! written with their shortest round-trip representation so reparsing
//! yields the same values. Identity origins and absent optional elements
//! are left out.

use std::io::{Cursor, Write};
use std::path::Path;

use nalgebra::Vector3;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{
    Collision, Geometry, Inertial, Joint, Limit, Link, Material, Origin, Robot, Visual,
};

/// Serialize a robot to a URDF string.
///
/// `indent` is the number of spaces per nesting level; `0` writes
/// everything on one line.
///
/// # Errors
///
/// Returns [`Error::XmlWrite`] if the XML writer fails.
pub fn write_string(robot: &Robot, indent: usize) -> Result<String> {
    let mut buffer = Vec::new();
    {
        let cursor = Cursor::new(&mut buffer);
        let mut writer = if indent == 0 {
            Writer::new(cursor)
        } else {
            Writer::new_with_indent(cursor, b' ', indent)
        };
        write_robot(&mut writer, robot)?;
    }
    if indent > 0 {
        buffer.push(b'\n');
    }
    String::from_utf8(buffer).map_err(|e| Error::XmlWrite(format!("invalid UTF-8 in output: {e}")))
}

/// Serialize a robot and write it to `path`.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails.
pub fn write_file(robot: &Robot, path: impl AsRef<Path>, indent: usize) -> Result<()> {
    let path = path.as_ref();
    let xml = write_string(robot, indent)?;
    std::fs::write(path, xml)?;
    debug!("Wrote robot description to {}", path.display());
    Ok(())
}

fn write_robot<W: Write>(w: &mut Writer<W>, robot: &Robot) -> Result<()> {
    emit(w, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut start = BytesStart::new("robot");
    start.push_attribute(("name", robot.name.as_str()));
    emit(w, Event::Start(start))?;

    for material in &robot.materials {
        write_material(w, material)?;
    }
    for link in &robot.links {
        write_link(w, link)?;
    }
    for joint in &robot.joints {
        write_joint(w, joint)?;
    }

    emit(w, Event::End(BytesEnd::new("robot")))
}

fn write_material<W: Write>(w: &mut Writer<W>, material: &Material) -> Result<()> {
    let mut start = BytesStart::new("material");
    start.push_attribute(("name", material.name.as_str()));

    if material.is_reference() {
        return emit(w, Event::Empty(start));
    }

    emit(w, Event::Start(start))?;
    if let Some(color) = material.color {
        let rgba = format!("{} {} {} {}", color.r, color.g, color.b, color.a);
        let mut e = BytesStart::new("color");
        e.push_attribute(("rgba", rgba.as_str()));
        emit(w, Event::Empty(e))?;
    }
    if let Some(texture) = &material.texture {
        let mut e = BytesStart::new("texture");
        e.push_attribute(("filename", texture.as_str()));
        emit(w, Event::Empty(e))?;
    }
    emit(w, Event::End(BytesEnd::new("material")))
}

fn write_link<W: Write>(w: &mut Writer<W>, link: &Link) -> Result<()> {
    let mut start = BytesStart::new("link");
    start.push_attribute(("name", link.name.as_str()));

    if link.is_empty() {
        return emit(w, Event::Empty(start));
    }

    emit(w, Event::Start(start))?;
    if let Some(inertial) = &link.inertial {
        write_inertial(w, inertial)?;
    }
    if let Some(visual) = &link.visual {
        write_visual(w, visual)?;
    }
    if let Some(collision) = &link.collision {
        write_collision(w, collision)?;
    }
    emit(w, Event::End(BytesEnd::new("link")))
}

fn write_inertial<W: Write>(w: &mut Writer<W>, inertial: &Inertial) -> Result<()> {
    emit(w, Event::Start(BytesStart::new("inertial")))?;
    write_origin(w, &inertial.origin)?;

    let mass = inertial.mass.to_string();
    let mut e = BytesStart::new("mass");
    e.push_attribute(("value", mass.as_str()));
    emit(w, Event::Empty(e))?;

    let i = &inertial.inertia;
    let values = [
        ("ixx", i.ixx),
        ("ixy", i.ixy),
        ("ixz", i.ixz),
        ("iyy", i.iyy),
        ("iyz", i.iyz),
        ("izz", i.izz),
    ]
    .map(|(key, value)| (key, value.to_string()));
    let mut e = BytesStart::new("inertia");
    for (key, value) in &values {
        e.push_attribute((*key, value.as_str()));
    }
    emit(w, Event::Empty(e))?;

    emit(w, Event::End(BytesEnd::new("inertial")))
}

fn write_visual<W: Write>(w: &mut Writer<W>, visual: &Visual) -> Result<()> {
    let mut start = BytesStart::new("visual");
    if let Some(name) = &visual.name {
        start.push_attribute(("name", name.as_str()));
    }
    emit(w, Event::Start(start))?;
    write_origin(w, &visual.origin)?;
    write_geometry(w, &visual.geometry)?;
    if let Some(material) = &visual.material {
        write_material(w, material)?;
    }
    emit(w, Event::End(BytesEnd::new("visual")))
}

fn write_collision<W: Write>(w: &mut Writer<W>, collision: &Collision) -> Result<()> {
    let mut start = BytesStart::new("collision");
    if let Some(name) = &collision.name {
        start.push_attribute(("name", name.as_str()));
    }
    emit(w, Event::Start(start))?;
    write_origin(w, &collision.origin)?;
    write_geometry(w, &collision.geometry)?;
    emit(w, Event::End(BytesEnd::new("collision")))
}

fn write_geometry<W: Write>(w: &mut Writer<W>, geometry: &Geometry) -> Result<()> {
    emit(w, Event::Start(BytesStart::new("geometry")))?;

    let mut shape = BytesStart::new(geometry.kind());
    match geometry {
        Geometry::Box { size } => {
            shape.push_attribute(("size", format_vector3(size).as_str()));
        }
        Geometry::Cylinder { radius, length } => {
            shape.push_attribute(("radius", radius.to_string().as_str()));
            shape.push_attribute(("length", length.to_string().as_str()));
        }
        Geometry::Sphere { radius } => {
            shape.push_attribute(("radius", radius.to_string().as_str()));
        }
        Geometry::Mesh { filename, scale } => {
            shape.push_attribute(("filename", filename.as_str()));
            if let Some(scale) = scale {
                shape.push_attribute(("scale", format_vector3(scale).as_str()));
            }
        }
    }
    emit(w, Event::Empty(shape))?;

    emit(w, Event::End(BytesEnd::new("geometry")))
}

fn write_joint<W: Write>(w: &mut Writer<W>, joint: &Joint) -> Result<()> {
    let mut start = BytesStart::new("joint");
    start.push_attribute(("name", joint.name.as_str()));
    start.push_attribute(("type", joint.joint_type.as_str()));
    emit(w, Event::Start(start))?;

    write_origin(w, &joint.origin)?;

    let mut parent = BytesStart::new("parent");
    parent.push_attribute(("link", joint.parent.as_str()));
    emit(w, Event::Empty(parent))?;

    let mut child = BytesStart::new("child");
    child.push_attribute(("link", joint.child.as_str()));
    emit(w, Event::Empty(child))?;

    if let Some(axis) = &joint.axis {
        let mut e = BytesStart::new("axis");
        e.push_attribute(("xyz", format_vector3(axis).as_str()));
        emit(w, Event::Empty(e))?;
    }
    if let Some(limit) = &joint.limit {
        write_limit(w, limit)?;
    }
    if let Some(dynamics) = &joint.dynamics {
        let mut e = BytesStart::new("dynamics");
        e.push_attribute(("damping", dynamics.damping.to_string().as_str()));
        e.push_attribute(("friction", dynamics.friction.to_string().as_str()));
        emit(w, Event::Empty(e))?;
    }

    emit(w, Event::End(BytesEnd::new("joint")))
}

fn write_limit<W: Write>(w: &mut Writer<W>, limit: &Limit) -> Result<()> {
    let mut e = BytesStart::new("limit");
    e.push_attribute(("lower", limit.lower.to_string().as_str()));
    e.push_attribute(("upper", limit.upper.to_string().as_str()));
    e.push_attribute(("effort", limit.effort.to_string().as_str()));
    e.push_attribute(("velocity", limit.velocity.to_string().as_str()));
    emit(w, Event::Empty(e))
}

fn write_origin<W: Write>(w: &mut Writer<W>, origin: &Origin) -> Result<()> {
    if origin.is_identity() {
        return Ok(());
    }
    let mut e = BytesStart::new("origin");
    e.push_attribute(("xyz", format_vector3(&origin.xyz).as_str()));
    e.push_attribute(("rpy", format_vector3(&origin.rpy).as_str()));
    emit(w, Event::Empty(e))
}

fn format_vector3(v: &Vector3<f64>) -> String {
    format!("{} {} {}", v.x, v.y, v.z)
}

fn emit<W: Write>(w: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    w.write_event(event)
        .map_err(|e| Error::XmlWrite(e.to_string()))
}
