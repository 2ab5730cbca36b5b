//! Output codecs for decoded settings models.
//!
//! Two formats share one model:
//!
//! - **Document**: an ordered JSON object, the lossless backup format,
//!   parseable back into a restore overlay.
//! - **Commands**: vendor console commands for replaying a configuration
//!   interactively, lossy by design.

pub mod commands;
pub mod document;

pub use commands::{CommandOptions, render_commands};
pub use document::{
    DocumentError, DocumentHeader, DocumentOptions, HEADER_KEY, REDACTED, parse_document,
    render_document,
};
