//! Group filtering.

use std::collections::BTreeSet;

use dcfg_model::{ConfigModel, Group};

/// Narrow a model to the fields whose group is in `groups`.
///
/// The empty set means no filtering (identity). The same filtered model
/// feeds every output codec of a run, so document and command output are
/// always consistent for one group selection.
pub fn filter_groups(model: &ConfigModel, groups: &BTreeSet<Group>) -> ConfigModel {
    if groups.is_empty() {
        return model.clone();
    }
    model.retained(|entry| groups.contains(&entry.group))
}
