//! Functional field groups.
//!
//! Groups categorize fields for filtering and display only; they have no
//! bearing on storage layout.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Functional category of a configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Group {
    System,
    Wifi,
    Mqtt,
    Management,
    Power,
    Light,
    Display,
    Sensor,
    Rules,
    SetOption,
    Timer,
}

impl Group {
    /// All groups, in display order.
    pub const ALL: &'static [Group] = &[
        Group::System,
        Group::Wifi,
        Group::Mqtt,
        Group::Management,
        Group::Power,
        Group::Light,
        Group::Display,
        Group::Sensor,
        Group::Rules,
        Group::SetOption,
        Group::Timer,
    ];

    /// Canonical group name.
    pub fn as_str(self) -> &'static str {
        match self {
            Group::System => "System",
            Group::Wifi => "Wifi",
            Group::Mqtt => "Mqtt",
            Group::Management => "Management",
            Group::Power => "Power",
            Group::Light => "Light",
            Group::Display => "Display",
            Group::Sensor => "Sensor",
            Group::Rules => "Rules",
            Group::SetOption => "SetOption",
            Group::Timer => "Timer",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Group {
    type Err = String;

    /// Parse a group name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Group::ALL
            .iter()
            .copied()
            .find(|g| g.as_str().to_ascii_lowercase() == normalized)
            .ok_or_else(|| format!("unknown group: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("wifi".parse::<Group>().unwrap(), Group::Wifi);
        assert_eq!("SETOPTION".parse::<Group>().unwrap(), Group::SetOption);
        assert!("gpio".parse::<Group>().is_err());
    }

    #[test]
    fn all_covers_every_name_uniquely() {
        let mut names: Vec<&str> = Group::ALL.iter().map(|g| g.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Group::ALL.len());
    }
}
