//! `urdfpack` - Robot description tooling
//!
//! This library reads and writes URDF robot descriptions, checks that they
//! form a valid kinematic tree, and packages the folder they ship in as a
//! zip archive.
//!
//! ```
//! use urdfpack::{urdf, validation};
//!
//! let robot = urdf::parse_str(urdf::BUNDLED_ROBOT)?;
//! let tree = validation::validate(&robot)?;
//! assert_eq!(tree.root(), "base_link");
//! # Ok::<(), urdfpack::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod urdf;
pub mod validation;

pub use archive::{PackSummary, Packer};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{Joint, JointType, Link, Robot};
pub use validation::{validate, KinematicTree};
