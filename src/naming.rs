//! Filename and folder-name normalization.
//!
//! Normalized names are lower-case, use a single underscore wherever the
//! original had a run of spaces, hyphens or underscores, and carry a date tag
//! built from the file's creation date:
//!
//! ```
//! use chrono::NaiveDate;
//! use desktidy::naming::{DateFormat, normalize};
//!
//! let created = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! assert_eq!(
//!     normalize("My Report - final.PDF", created, DateFormat::YearMonthDay),
//!     "my_report_final_2024_01_15.PDF"
//! );
//! ```

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_\s-]+").expect("separator pattern is valid"));

/// The date layouts a user can pick from.
///
/// The same layout names the day folder and the date tag appended to files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateFormat {
    /// `15_01_2024`
    #[default]
    DayMonthYear,
    /// `2024_01_15`
    YearMonthDay,
    /// `01_15_2024`
    MonthDayYear,
    /// `2024_15_01`
    YearDayMonth,
}

impl DateFormat {
    /// All formats in menu order (selector 1 through 4).
    pub const ALL: [DateFormat; 4] = [
        DateFormat::DayMonthYear,
        DateFormat::YearMonthDay,
        DateFormat::MonthDayYear,
        DateFormat::YearDayMonth,
    ];

    /// Maps a menu selector to a format. Anything outside `1..=4` falls back
    /// to [`DateFormat::DayMonthYear`].
    ///
    /// ```
    /// use desktidy::naming::DateFormat;
    ///
    /// assert_eq!(DateFormat::from_index(2), DateFormat::YearMonthDay);
    /// assert_eq!(DateFormat::from_index(9), DateFormat::DayMonthYear);
    /// ```
    pub fn from_index(selector: i64) -> Self {
        match selector {
            1..=4 => Self::ALL[(selector - 1) as usize],
            _ => Self::default(),
        }
    }

    /// Parses a selector typed by the user, e.g. `" 3 "`.
    pub fn from_selector(input: &str) -> Self {
        input
            .trim()
            .parse::<i64>()
            .map(Self::from_index)
            .unwrap_or_default()
    }

    /// The chrono format string for this layout.
    pub fn pattern(&self) -> &'static str {
        match self {
            DateFormat::DayMonthYear => "%d_%m_%Y",
            DateFormat::YearMonthDay => "%Y_%m_%d",
            DateFormat::MonthDayYear => "%m_%d_%Y",
            DateFormat::YearDayMonth => "%Y_%d_%m",
        }
    }

    /// Menu label shown when asking the user to pick a format.
    pub fn label(&self) -> &'static str {
        match self {
            DateFormat::DayMonthYear => "day / month / year",
            DateFormat::YearMonthDay => "year / month / day",
            DateFormat::MonthDayYear => "month / day / year",
            DateFormat::YearDayMonth => "year / day / month",
        }
    }

    pub fn format(&self, date: NaiveDate) -> String {
        date.format(self.pattern()).to_string()
    }

    /// The underscore-prefixed date tag, e.g. `_15_01_2024`.
    pub fn tag(&self, date: NaiveDate) -> String {
        format!("_{}", self.format(date))
    }
}

/// Splits a filename into stem and extension. The extension keeps its dot.
///
/// Leading dots belong to the stem, so `.bashrc` has no extension.
///
/// ```
/// use desktidy::naming::split_name;
///
/// assert_eq!(split_name("archive.tar.gz"), ("archive.tar", ".gz"));
/// assert_eq!(split_name(".bashrc"), (".bashrc", ""));
/// assert_eq!(split_name("README"), ("README", ""));
/// ```
pub fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if !name[..idx].chars().all(|c| c == '.') => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    }
}

/// Lower-cased extension without the dot, if the name has one.
pub fn extension_of(name: &str) -> Option<String> {
    match split_name(name).1 {
        "" | "." => None,
        ext => Some(ext[1..].to_lowercase()),
    }
}

fn collapse_separators(text: &str) -> String {
    SEPARATOR_RUN.replace_all(text, "_").into_owned()
}

/// Produces the canonical name for a file created on `created`.
///
/// The date tag is only appended when the original name does not already
/// contain it, so normalizing an already-normalized name is a no-op.
pub fn normalize(name: &str, created: NaiveDate, format: DateFormat) -> String {
    let tag = format.tag(created);
    let (stem, ext) = split_name(name);
    let tagged = if name.contains(&tag) {
        stem.to_owned()
    } else {
        format!("{stem}{tag}")
    };

    // Collapse after tagging so a trailing separator in the stem merges with
    // the tag's leading underscore.
    format!("{}{ext}", collapse_separators(&tagged).to_lowercase())
}

/// Produces the canonical name for a folder: trimmed, separators collapsed,
/// first letter upper-case and the rest lower-case.
///
/// ```
/// use desktidy::naming::normalize_folder_name;
///
/// assert_eq!(normalize_folder_name("  my   Photos--2024 "), "My_photos_2024");
/// ```
pub fn normalize_folder_name(name: &str) -> String {
    let collapsed = collapse_separators(name.trim());
    let mut chars = collapsed.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
