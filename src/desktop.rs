//! Locating the directory to organize.
//!
//! The organizer never builds platform paths itself; it asks a
//! [`DesktopLocator`], which either finds an existing directory or reports
//! that there is none.

use std::path::{Path, PathBuf};

/// Folder names tried under the home directory when the platform does not
/// report a desktop (English and Italian localizations).
pub const LOCALIZED_DESKTOP_NAMES: [&str; 2] = ["Desktop", "Scrivania"];

pub trait DesktopLocator {
    /// Returns an existing directory, or `None` if nothing suitable exists.
    fn locate(&self) -> Option<PathBuf>;
}

/// A fixed path, e.g. from the settings file or the command line.
#[derive(Debug, Clone)]
pub struct FixedDesktop(pub PathBuf);

impl DesktopLocator for FixedDesktop {
    fn locate(&self) -> Option<PathBuf> {
        existing_dir(&self.0)
    }
}

/// The user's desktop as reported by the platform, with localized fallbacks
/// under the home directory.
#[derive(Debug, Clone)]
pub struct PlatformDesktop {
    desktop: Option<PathBuf>,
    home: Option<PathBuf>,
}

impl PlatformDesktop {
    pub fn new() -> Self {
        Self {
            desktop: dirs::desktop_dir(),
            home: dirs::home_dir(),
        }
    }

    /// Candidate paths in the order they are tried.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = self.desktop.iter().cloned().collect();
        if let Some(home) = &self.home {
            candidates.extend(LOCALIZED_DESKTOP_NAMES.iter().map(|name| home.join(name)));
        }
        candidates
    }
}

impl Default for PlatformDesktop {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopLocator for PlatformDesktop {
    fn locate(&self) -> Option<PathBuf> {
        self.candidates().iter().find_map(|path| existing_dir(path))
    }
}

fn existing_dir(path: &Path) -> Option<PathBuf> {
    path.is_dir().then(|| path.to_path_buf())
}
