//! Provisioning of the two-level destination: `<category folder>/<day folder>`.
//!
//! Provisioning walks a small state machine. Each step creates at most one
//! directory, and existing directories are reused, so resolving twice on the
//! same day yields the same path without touching the filesystem again.
//!
//! ```text
//! RootMissing --create root--> DayMissing --create day--> Ready(path)
//! ```

use crate::file_organizer::{OrganizeError, OrganizeResult};
use crate::policy::NamingPolicy;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where provisioning currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provisioning {
    RootMissing,
    DayMissing,
    Ready(PathBuf),
}

/// The provisioned day folder and which levels this call had to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub path: PathBuf,
    pub root_created: bool,
    pub day_created: bool,
}

pub struct DestinationResolver {
    root: PathBuf,
    day: PathBuf,
}

impl DestinationResolver {
    /// `root` is the category folder; the day folder is `today` formatted
    /// with the policy's date format.
    pub fn new(root: &Path, policy: &NamingPolicy, today: NaiveDate) -> Self {
        Self {
            root: root.to_path_buf(),
            day: root.join(policy.date_format.format(today)),
        }
    }

    pub fn day_path(&self) -> &Path {
        &self.day
    }

    /// Reports the current state without creating anything.
    pub fn inspect(&self) -> OrganizeResult<Provisioning> {
        if !existing_dir(&self.root)? {
            return Ok(Provisioning::RootMissing);
        }
        if !existing_dir(&self.day)? {
            return Ok(Provisioning::DayMissing);
        }
        Ok(Provisioning::Ready(self.day.clone()))
    }

    /// Creates whatever is missing and returns the day folder.
    ///
    /// The category folder is created as a single level: if its parent does
    /// not exist this fails instead of building the whole chain.
    pub fn resolve(&self) -> OrganizeResult<Destination> {
        let mut root_created = false;
        let mut day_created = false;

        loop {
            match self.inspect()? {
                Provisioning::RootMissing => {
                    create_single_dir(&self.root)?;
                    info!(path = %self.root.display(), "created category folder");
                    root_created = true;
                }
                Provisioning::DayMissing => {
                    create_single_dir(&self.day)?;
                    info!(path = %self.day.display(), "created day folder");
                    day_created = true;
                }
                Provisioning::Ready(path) => {
                    debug!(path = %path.display(), root_created, day_created, "destination ready");
                    return Ok(Destination {
                        path,
                        root_created,
                        day_created,
                    });
                }
            }
        }
    }
}

/// Convenience wrapper around [`DestinationResolver::resolve`].
pub fn resolve(root: &Path, policy: &NamingPolicy, today: NaiveDate) -> OrganizeResult<Destination> {
    DestinationResolver::new(root, policy, today).resolve()
}

/// `Ok(true)` for a directory, `Ok(false)` for nothing, an error for a
/// non-directory sitting where the folder should be.
fn existing_dir(path: &Path) -> OrganizeResult<bool> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(true),
        Ok(_) => Err(OrganizeError::NotADirectory {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(OrganizeError::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn create_single_dir(path: &Path) -> OrganizeResult<()> {
    match fs::create_dir(path) {
        Ok(()) => Ok(()),
        // Someone else created it in the meantime; the next inspect decides.
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(source) => Err(OrganizeError::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}
