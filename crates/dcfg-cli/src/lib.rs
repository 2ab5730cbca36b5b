//! Library components of the `dcfg` command line tool.

pub mod logging;
pub mod pipeline;
