//! Versioned field-layout registry for firmware settings images.
//!
//! The firmware's settings structure evolves across releases: fields move,
//! widen, appear, and retire. This crate holds the full layout knowledge as
//! an ordered set of immutable [`FieldDescriptor`] records, each valid for
//! an inclusive firmware version range, and exposes pure version-indexed
//! lookup through [`SchemaRegistry`].
//!
//! The table is validated once at registry build time — offset bounds,
//! per-name range disjointness and contiguity, bit-run limits, default
//! kinds — never per decode. Gaps in version coverage fail closed with
//! `UnsupportedVersion`.

pub mod descriptor;
pub mod error;
pub mod geometry;
pub mod registry;
pub mod table;

pub use descriptor::{CommandSpec, DefaultValue, FieldDescriptor, FieldKind, VersionRange};
pub use error::SchemaError;
pub use registry::{SchemaRegistry, SchemaVersion, registry};
