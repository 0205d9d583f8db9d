//! The immutable naming policy for one organizing run.

use crate::config::CompiledFilters;
use crate::naming::DateFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the category folder and date format are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mode {
    /// Ask the user for the folder name and date format.
    Custom,
    /// Take both from the settings file.
    #[default]
    Default,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CUSTOM" => Ok(Mode::Custom),
            "DEFAULT" => Ok(Mode::Default),
            other => Err(format!(
                "unknown mode '{other}', expected CUSTOM or DEFAULT"
            )),
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Custom => write!(f, "CUSTOM"),
            Mode::Default => write!(f, "DEFAULT"),
        }
    }
}

/// Everything the naming and filtering steps need, built once per run and
/// passed by reference. Nothing in it changes during the run.
#[derive(Debug, Clone)]
pub struct NamingPolicy {
    pub date_format: DateFormat,
    pub mode: Mode,
    pub filters: CompiledFilters,
}

impl NamingPolicy {
    pub fn new(date_format: DateFormat, mode: Mode, filters: CompiledFilters) -> Self {
        Self {
            date_format,
            mode,
            filters,
        }
    }

    /// Whether a file with this name takes part in organizing.
    pub fn is_eligible(&self, file_name: &str) -> bool {
        self.filters.should_include(file_name)
    }
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self::new(
            DateFormat::default(),
            Mode::default(),
            CompiledFilters::shortcuts_only(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse_is_case_insensitive() {
        assert_eq!("custom".parse::<Mode>(), Ok(Mode::Custom));
        assert_eq!(" Default ".parse::<Mode>(), Ok(Mode::Default));
        assert!("sometimes".parse::<Mode>().is_err());
    }

    #[test]
    fn test_default_policy_excludes_shortcuts() {
        let policy = NamingPolicy::default();
        assert!(policy.is_eligible("a.txt"));
        assert!(!policy.is_eligible("b.lnk"));
        assert!(!policy.is_eligible("c.CMD"));
    }
}
