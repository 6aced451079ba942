//! Error types for urdfpack.
//!
//! This module defines all error types used throughout the urdfpack crate,
//! covering description parsing, structural validation, configuration and
//! archive packing.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for urdfpack operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Description Parse Errors ===
    /// The document is not well-formed XML.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Writing the document failed.
    #[error("XML write error: {0}")]
    XmlWrite(String),

    /// A required element is missing.
    #[error("missing required element <{element}> in {context}")]
    MissingElement {
        /// The missing element name.
        element: &'static str,
        /// Where the element was expected.
        context: String,
    },

    /// A required attribute is missing.
    #[error("missing required attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        /// The missing attribute name.
        attribute: &'static str,
        /// The element that should carry it.
        element: String,
    },

    /// An attribute value could not be interpreted.
    #[error("invalid value for '{attribute}' on <{element}>: {message}")]
    InvalidAttribute {
        /// The attribute with the invalid value.
        attribute: &'static str,
        /// The element containing the attribute.
        element: String,
        /// Why the value is invalid.
        message: String,
    },

    /// The joint `type` attribute is not a known joint type.
    #[error("unknown joint type '{joint_type}' on joint '{joint}'")]
    UnknownJointType {
        /// The joint carrying the type.
        joint: String,
        /// The unrecognized type string.
        joint_type: String,
    },

    /// A link or joint repeats a child element that may appear only once.
    #[error("{owner} declares more than one <{element}>")]
    DuplicateElement {
        /// The offending element, e.g. `link 'base'`.
        owner: String,
        /// The repeated element.
        element: &'static str,
    },

    // === Structure Errors ===
    /// A joint references a link that is not declared.
    #[error("joint '{joint}' references undefined link '{link}'")]
    UndefinedLink {
        /// The link name that was referenced.
        link: String,
        /// The joint that referenced it.
        joint: String,
    },

    /// Two links share a name.
    #[error("duplicate link name: {0}")]
    DuplicateLink(String),

    /// Two joints share a name.
    #[error("duplicate joint name: {0}")]
    DuplicateJoint(String),

    /// Two top-level materials share a name.
    #[error("duplicate material name: {0}")]
    DuplicateMaterial(String),

    /// The link/joint graph contains a cycle or a link with two parents.
    #[error("kinematic loop: {0}")]
    KinematicLoop(String),

    /// Every link is the child of some joint.
    #[error("no root link found (every link is the child of a joint)")]
    NoRootLink,

    /// More than one link has no parent joint.
    #[error("multiple root links found: {0:?}")]
    MultipleRootLinks(Vec<String>),

    /// A moving joint lacks its motion axis.
    #[error("{joint_type} joint '{joint}' must declare an <axis>")]
    MissingAxis {
        /// The joint name.
        joint: String,
        /// The joint type, for the message.
        joint_type: &'static str,
    },

    /// A bounded joint lacks its limit.
    #[error("{joint_type} joint '{joint}' must declare a <limit>")]
    MissingLimit {
        /// The joint name.
        joint: String,
        /// The joint type, for the message.
        joint_type: &'static str,
    },

    /// A fixed joint carries an axis or limit.
    #[error("fixed joint '{joint}' must not declare <{element}>")]
    UnexpectedElement {
        /// The joint name.
        joint: String,
        /// The element that should be absent.
        element: &'static str,
    },

    /// A joint limit has `lower > upper`.
    #[error("joint '{joint}' has inverted limit: lower {lower} > upper {upper}")]
    InvertedLimit {
        /// The joint name.
        joint: String,
        /// Declared lower bound.
        lower: f64,
        /// Declared upper bound.
        upper: f64,
    },

    /// A numeric value is out of its allowed range.
    #[error("invalid value in {context}: {message}")]
    InvalidValue {
        /// The element the value belongs to.
        context: String,
        /// Why the value is invalid.
        message: String,
    },

    /// A canonically rewritten description no longer describes the same robot.
    #[error("{} does not survive a write/parse round trip", path.display())]
    RoundTrip {
        /// The description that was rewritten.
        path: PathBuf,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Archive Errors ===
    /// The folder to pack does not exist.
    #[error("source path not found: {}", path.display())]
    SourceNotFound {
        /// The missing source folder.
        path: PathBuf,
    },

    /// Walking the source folder failed.
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        /// The folder being walked.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: walkdir::Error,
    },

    /// Writing the zip archive failed.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to read a description or archive file.
    #[error("failed to read {}: {source}", path.display())]
    FileRead {
        /// Path that couldn't be read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {}: {source}", path.display())]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for urdfpack operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a missing element error.
    #[must_use]
    pub fn missing_element(element: &'static str, context: impl Into<String>) -> Self {
        Self::MissingElement {
            element,
            context: context.into(),
        }
    }

    /// Create a missing attribute error.
    #[must_use]
    pub fn missing_attribute(attribute: &'static str, element: impl Into<String>) -> Self {
        Self::MissingAttribute {
            attribute,
            element: element.into(),
        }
    }

    /// Create an invalid attribute error.
    #[must_use]
    pub fn invalid_attribute(
        attribute: &'static str,
        element: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            attribute,
            element: element.into(),
            message: message.into(),
        }
    }

    /// Create an undefined link error.
    #[must_use]
    pub fn undefined_link(link: impl Into<String>, joint: impl Into<String>) -> Self {
        Self::UndefinedLink {
            link: link.into(),
            joint: joint.into(),
        }
    }

    /// Create an invalid value error.
    #[must_use]
    pub fn invalid_value(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error comes from reading the document itself.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::XmlParse(_)
                | Self::MissingElement { .. }
                | Self::MissingAttribute { .. }
                | Self::InvalidAttribute { .. }
                | Self::UnknownJointType { .. }
                | Self::DuplicateElement { .. }
        )
    }

    /// Check if this error is a violation of the kinematic tree invariants.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::UndefinedLink { .. }
                | Self::DuplicateLink(_)
                | Self::DuplicateJoint(_)
                | Self::DuplicateMaterial(_)
                | Self::KinematicLoop(_)
                | Self::NoRootLink
                | Self::MultipleRootLinks(_)
                | Self::MissingAxis { .. }
                | Self::MissingLimit { .. }
                | Self::UnexpectedElement { .. }
                | Self::InvertedLimit { .. }
                | Self::InvalidValue { .. }
        )
    }
}
