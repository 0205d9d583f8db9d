//! Settings and file filtering configuration.
//!
//! Configuration is stored in TOML:
//!
//! ```toml
//! [settings]
//! mode = "default"            # or "custom"
//! main_folder = "Organized"
//! date_format = 1             # 1..4 or "1".."4", see `DateFormat::from_index`
//! desktop_path = "/home/me/Desktop"
//! log_file = "organize_desktop.log"
//!
//! [filters]
//! enable_hidden_files = true
//!
//! [filters.exclude]
//! filenames = ["desktop.ini", ".DS_Store"]
//! patterns = ["~$*"]
//! extensions = ["url"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//! ```
//!
//! Shortcut and command files (`.lnk`, `.cmd`) are always excluded; no rule
//! can bring them back.

use crate::naming::{DateFormat, extension_of};
use crate::policy::{Mode, NamingPolicy};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions that are never organized, whatever the configuration says.
pub const SHORTCUT_EXTENSIONS: [&str; 2] = ["lnk", "cmd"];

pub const DEFAULT_MAIN_FOLDER: &str = "Organized";
pub const LOCAL_CONFIG_FILE: &str = ".desktidyrc.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid configuration in {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("Invalid glob pattern '{0}'")]
    InvalidGlobPattern(String),

    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },

    #[error("Could not read configuration {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub filters: FilterRules,
}

/// Run settings: mode, destination folder name and date format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: Mode,
    pub main_folder: String,
    /// Menu selector; anything unrecognized falls back to day/month/year.
    pub date_format: DateSelector,
    pub desktop_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Default,
            main_folder: DEFAULT_MAIN_FOLDER.to_string(),
            date_format: DateSelector::Index(1),
            desktop_path: None,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn date_format(&self) -> DateFormat {
        match &self.date_format {
            DateSelector::Index(index) => DateFormat::from_index(*index),
            DateSelector::Text(text) => DateFormat::from_selector(text),
        }
    }
}

/// The `date_format` setting, written either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateSelector {
    Index(i64),
    Text(String),
}

impl From<i64> for DateSelector {
    fn from(index: i64) -> Self {
        DateSelector::Index(index)
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether files starting with "." are organized. Defaults to true.
    #[serde(default = "default_true")]
    pub enable_hidden_files: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Whitelist that overrides the exclude rules (but not the shortcut rule).
    #[serde(default)]
    pub include: IncludeRules,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            enable_hidden_files: true,
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    #[serde(default)]
    pub filenames: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Extensions without the dot, matched case-insensitively.
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub regex: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl Config {
    /// Loads configuration, trying in order:
    /// 1. `config_path`, if given (a missing file is an error)
    /// 2. `.desktidyrc.toml` in the current directory
    /// 3. `desktidy/config.toml` in the platform config directory
    /// 4. built-in defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("desktidy").join("config.toml");
            if user_config.exists() {
                return Self::load_from_file(&user_config);
            }
        }

        Ok(Self::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Builds the run policy from these settings and a chosen date format.
    pub fn policy(&self, date_format: DateFormat) -> Result<NamingPolicy, ConfigError> {
        let filters = CompiledFilters::new(&self.filters)?;
        Ok(NamingPolicy::new(date_format, self.settings.mode, filters))
    }
}

/// Filter rules with every pattern compiled up front.
#[derive(Debug, Clone)]
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(|_| ConfigError::InvalidGlobPattern(p.clone())))
        .collect()
}

impl CompiledFilters {
    pub fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns: compile_globs(&rules.exclude.patterns)?,
            exclude_regexes,
            include_patterns: compile_globs(&rules.include.patterns)?,
        })
    }

    /// Filters that only apply the built-in shortcut exclusion.
    pub fn shortcuts_only() -> Self {
        Self {
            enable_hidden_files: true,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
        }
    }

    /// Checks a direct child's file name. Order, first match wins:
    /// shortcut extensions, include patterns, hidden files, exact names,
    /// extensions, glob patterns, regexes. Anything left is included.
    pub fn should_include(&self, file_name: &str) -> bool {
        let ext = extension_of(file_name);

        if let Some(ext) = &ext
            && SHORTCUT_EXTENSIONS.contains(&ext.as_str())
        {
            return false;
        }

        if self.include_patterns.iter().any(|p| p.matches(file_name)) {
            return true;
        }

        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name) {
            return false;
        }

        if let Some(ext) = &ext
            && self.exclude_extensions.contains(ext)
        {
            return false;
        }

        if self.exclude_patterns.iter().any(|p| p.matches(file_name)) {
            return false;
        }

        !self.exclude_regexes.iter().any(|r| r.is_match(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn compiled(rules: FilterRules) -> CompiledFilters {
        CompiledFilters::new(&rules).unwrap()
    }

    #[test]
    fn test_default_settings() {
        let config = Config::default();
        assert_eq!(config.settings.mode, Mode::Default);
        assert_eq!(config.settings.main_folder, "Organized");
        assert_eq!(config.settings.date_format(), DateFormat::DayMonthYear);
        assert!(config.filters.enable_hidden_files);
    }

    #[test]
    fn test_parse_settings_file() {
        let config: Config = toml::from_str(
            r#"
            [settings]
            mode = "CUSTOM"
            main_folder = "Old Stuff"
            date_format = 2

            [filters.exclude]
            extensions = ["url"]
            "#,
        )
        .unwrap();

        assert_eq!(config.settings.mode, Mode::Custom);
        assert_eq!(config.settings.main_folder, "Old Stuff");
        assert_eq!(config.settings.date_format(), DateFormat::YearMonthDay);
        assert_eq!(config.filters.exclude.extensions, vec!["url"]);
    }

    #[test]
    fn test_out_of_range_date_format_falls_back() {
        let config: Config = toml::from_str("[settings]\ndate_format = 7\n").unwrap();
        assert_eq!(config.settings.date_format(), DateFormat::DayMonthYear);
    }

    #[test]
    fn test_date_format_written_as_string() {
        let config: Config = toml::from_str("[settings]\ndate_format = \"2\"\n").unwrap();
        assert_eq!(config.settings.date_format(), DateFormat::YearMonthDay);

        let config: Config = toml::from_str("[settings]\ndate_format = \"abc\"\n").unwrap();
        assert_eq!(config.settings.date_format(), DateFormat::DayMonthYear);
    }

    #[test]
    fn test_hidden_files_enabled_when_filters_table_omits_it() {
        let config: Config = toml::from_str("[filters.exclude]\nextensions = [\"url\"]\n").unwrap();
        assert!(config.filters.enable_hidden_files);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let result: Result<Config, _> = toml::from_str("[settings]\nmode = \"auto\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load(Some(&temp_dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        fs::write(&path, "[settings\nmode = ").unwrap();

        let result = Config::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_shortcuts_always_excluded() {
        let filters = compiled(FilterRules {
            enable_hidden_files: true,
            include: IncludeRules {
                patterns: vec!["*".to_string()],
            },
            ..Default::default()
        });

        assert!(!filters.should_include("Browser.lnk"));
        assert!(!filters.should_include("build.CMD"));
        assert!(filters.should_include("notes.txt"));
    }

    #[test]
    fn test_hidden_files_included_by_default() {
        let filters = compiled(FilterRules::default());
        assert!(filters.should_include(".env"));
        assert!(filters.should_include("visible.txt"));

        let filters = compiled(FilterRules {
            enable_hidden_files: false,
            ..Default::default()
        });
        assert!(!filters.should_include(".env"));
        assert!(filters.should_include("visible.txt"));
    }

    #[test]
    fn test_exclude_rules() {
        let filters = compiled(FilterRules {
            enable_hidden_files: false,
            exclude: ExcludeRules {
                filenames: vec!["desktop.ini".to_string()],
                patterns: vec!["~$*".to_string()],
                extensions: vec![".URL".to_string(), "tmp".to_string()],
                regex: vec![r"^draft_\d+".to_string()],
            },
            include: IncludeRules::default(),
        });

        assert!(!filters.should_include("desktop.ini"));
        assert!(!filters.should_include("~$budget.xlsx"));
        assert!(!filters.should_include("site.url"));
        assert!(!filters.should_include("cache.TMP"));
        assert!(!filters.should_include("draft_12.md"));
        assert!(filters.should_include("budget.xlsx"));
        assert!(filters.should_include("draft.md"));
    }

    #[test]
    fn test_include_overrides_exclude() {
        let filters = compiled(FilterRules {
            enable_hidden_files: false,
            exclude: ExcludeRules {
                extensions: vec!["log".to_string()],
                ..Default::default()
            },
            include: IncludeRules {
                patterns: vec!["keep*.log".to_string(), ".important".to_string()],
            },
        });

        assert!(filters.should_include("keep-me.log"));
        assert!(filters.should_include(".important"));
        assert!(!filters.should_include("other.log"));
        assert!(!filters.should_include(".other"));
    }

    #[test]
    fn test_invalid_patterns_are_errors() {
        let bad_regex = FilterRules {
            exclude: ExcludeRules {
                regex: vec!["[invalid(".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            CompiledFilters::new(&bad_regex),
            Err(ConfigError::InvalidRegexPattern { .. })
        ));

        let bad_glob = FilterRules {
            exclude: ExcludeRules {
                patterns: vec!["[unclosed".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            CompiledFilters::new(&bad_glob),
            Err(ConfigError::InvalidGlobPattern(_))
        ));
    }

    #[test]
    fn test_policy_from_config() {
        let config = Config::default();
        let policy = config.policy(DateFormat::MonthDayYear).unwrap();
        assert_eq!(policy.date_format, DateFormat::MonthDayYear);
        assert!(policy.is_eligible(".hidden"));
        assert!(!policy.is_eligible("x.lnk"));
    }
}
