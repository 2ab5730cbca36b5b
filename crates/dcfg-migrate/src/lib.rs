//! Model reconciliation: cross-version migration, partial-document
//! overlay merge, and group filtering.
//!
//! All functions here are pure transformations over `ConfigModel`;
//! recoverable issues are accumulated as `Warning`s and judged once at
//! the pipeline boundary.

pub mod filter;
pub mod merge;
pub mod migrate;

pub use filter::filter_groups;
pub use merge::merge_overlay;
pub use migrate::migrate;
