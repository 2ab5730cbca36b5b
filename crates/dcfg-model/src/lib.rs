//! Shared data model for firmware settings images.
//!
//! This crate defines the types every other `dcfg` crate speaks:
//!
//! - [`ConfigValue`]: the closed variant all decoded/edited values use
//! - [`ConfigModel`]: an insertion-ordered field name → value mapping
//! - [`VersionTag`]: the firmware version a blob declares
//! - [`Group`]: functional categories used for filtering and display
//! - [`ConfigError`] / [`Warning`]: the fatal and non-fatal taxonomies

pub mod error;
pub mod group;
pub mod model;
pub mod value;
pub mod version;
pub mod warning;

pub use error::{ConfigError, Result};
pub use group::Group;
pub use model::{ConfigEntry, ConfigModel};
pub use value::{ConfigValue, ValueKind};
pub use version::VersionTag;
pub use warning::{Warning, WarningMode, check_warnings};
