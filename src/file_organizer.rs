//! Moving loose files from a source directory into the day folder.
//!
//! A run takes a snapshot of the source directory, then handles each eligible
//! file in turn: normalize its name, resolve collisions against a fresh
//! listing of the destination, move it. A file that fails is recorded in the
//! [`Report`] and the run carries on with the next one.
//!
//! Collision resolution is only valid against the listing taken right before
//! each move, so files are moved one at a time.

use crate::collision::resolve_unique;
use crate::naming::{extension_of, normalize};
use crate::policy::NamingPolicy;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum OrganizeError {
    #[error("Failed to read source directory {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} exists but is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Failed to list destination {}: {source}", path.display())]
    DestinationUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Errors that only affect a single file.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("{} disappeared before it could be moved", path.display())]
    Vanished { path: PathBuf },

    #[error("{} has a name that is not valid Unicode", path.display())]
    InvalidName { path: PathBuf },

    #[error("Failed to list destination {}: {source}", path.display())]
    DestinationUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FileError::Vanished { .. } => FailureKind::Vanished,
            FileError::InvalidName { .. } => FailureKind::InvalidName,
            FileError::DestinationUnreadable { .. } | FileError::MoveFailed { .. } => {
                FailureKind::Transient
            }
        }
    }
}

/// A directory child as seen when the source was scanned.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    /// Lossy when the name is not valid Unicode; such entries are never moved.
    pub name: String,
    pub path: PathBuf,
    /// Lower-cased, without the dot.
    pub extension: Option<String>,
    pub created: DateTime<Local>,
    pub is_file: bool,
}

impl SourceEntry {
    fn from_dir_entry(entry: &fs::DirEntry) -> io::Result<Self> {
        let name = entry.file_name().to_string_lossy().into_owned();
        let file_type = entry.file_type()?;
        let metadata = entry.metadata()?;
        let created = metadata.created().or_else(|_| metadata.modified())?;
        let extension = extension_of(&name);

        Ok(Self {
            path: entry.path(),
            extension,
            created: DateTime::<Local>::from(created),
            is_file: file_type.is_file(),
            name,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The file was gone by the time it was moved.
    Vanished,
    /// The name could not be normalized without changing it.
    InvalidName,
    /// Locked, permission denied or any other IO failure.
    Transient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// True when a counter suffix had to be added.
    pub disambiguated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub source: PathBuf,
    pub kind: FailureKind,
    pub reason: String,
}

/// What a run did. A file only counts as moved once the move call succeeded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub destination: PathBuf,
    pub moved: Vec<MovedFile>,
    pub failed: Vec<FailedFile>,
}

impl Report {
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result for one file, handed to the progress callback.
#[derive(Debug, Clone, Copy)]
pub enum FileOutcome<'a> {
    Moved(&'a MovedFile),
    Failed(&'a FailedFile),
}

/// A move that a dry run would perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub disambiguated: bool,
}

pub struct Organizer<'a> {
    policy: &'a NamingPolicy,
}

impl<'a> Organizer<'a> {
    pub fn new(policy: &'a NamingPolicy) -> Self {
        Self { policy }
    }

    /// Snapshots the eligible direct children of `source_dir`: regular files
    /// that pass the policy's filters. Subdirectories are never entered.
    ///
    /// Order follows the filesystem and is not guaranteed.
    pub fn scan(&self, source_dir: &Path) -> OrganizeResult<Vec<SourceEntry>> {
        let entries = fs::read_dir(source_dir).map_err(|source| OrganizeError::SourceUnreadable {
            path: source_dir.to_path_buf(),
            source,
        })?;

        let mut eligible = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %source_dir.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            match SourceEntry::from_dir_entry(&entry) {
                Ok(source) if source.is_file && self.policy.is_eligible(&source.name) => {
                    eligible.push(source)
                }
                Ok(source) => debug!(name = %source.name, "not eligible"),
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "skipping entry that vanished during scan")
                }
            }
        }

        Ok(eligible)
    }

    /// The candidate name for an entry, before collision resolution.
    pub fn candidate_name(&self, entry: &SourceEntry) -> String {
        normalize(
            &entry.name,
            entry.created.date_naive(),
            self.policy.date_format,
        )
    }

    /// Computes the moves a run would make, without touching anything.
    /// `dest_dir` does not need to exist yet. Entries a real run would
    /// reject for their name are left out.
    pub fn plan(&self, entries: &[SourceEntry], dest_dir: &Path) -> OrganizeResult<Vec<PlannedMove>> {
        let mut taken = match list_names(dest_dir) {
            Ok(names) => names,
            Err(e) if e.kind() == ErrorKind::NotFound => HashSet::new(),
            Err(source) => {
                return Err(OrganizeError::DestinationUnreadable {
                    path: dest_dir.to_path_buf(),
                    source,
                });
            }
        };

        Ok(entries
            .iter()
            .filter(|entry| has_unicode_name(entry))
            .map(|entry| {
                let candidate = self.candidate_name(entry);
                let name = resolve_unique(&candidate, &taken);
                let planned = PlannedMove {
                    source: entry.path.clone(),
                    destination: dest_dir.join(&name),
                    disambiguated: name != candidate,
                };
                taken.insert(name);
                planned
            })
            .collect())
    }

    /// Moves every entry into `dest_dir`, calling `on_file` after each one.
    pub fn organize<F>(&self, entries: &[SourceEntry], dest_dir: &Path, mut on_file: F) -> Report
    where
        F: FnMut(FileOutcome<'_>),
    {
        let mut report = Report {
            destination: dest_dir.to_path_buf(),
            ..Report::default()
        };

        for entry in entries {
            match self.organize_one(entry, dest_dir) {
                Ok(moved) => {
                    info!(
                        from = %moved.source.display(),
                        to = %moved.destination.display(),
                        "moved file"
                    );
                    report.moved.push(moved);
                    if let Some(moved) = report.moved.last() {
                        on_file(FileOutcome::Moved(moved));
                    }
                }
                Err(e) => {
                    error!(path = %entry.path.display(), error = %e, "could not organize file");
                    report.failed.push(FailedFile {
                        source: entry.path.clone(),
                        kind: e.kind(),
                        reason: e.to_string(),
                    });
                    if let Some(failed) = report.failed.last() {
                        on_file(FileOutcome::Failed(failed));
                    }
                }
            }
        }

        report
    }

    /// Scans `source_dir` and moves every eligible file into `dest_dir`.
    pub fn run(&self, source_dir: &Path, dest_dir: &Path) -> OrganizeResult<Report> {
        let entries = self.scan(source_dir)?;
        info!(
            source = %source_dir.display(),
            count = entries.len(),
            "organizing files"
        );
        Ok(self.organize(&entries, dest_dir, |_| {}))
    }

    fn organize_one(&self, entry: &SourceEntry, dest_dir: &Path) -> Result<MovedFile, FileError> {
        if !has_unicode_name(entry) {
            return Err(FileError::InvalidName {
                path: entry.path.clone(),
            });
        }

        let candidate = self.candidate_name(entry);
        let mut existing =
            list_names(dest_dir).map_err(|source| FileError::DestinationUnreadable {
                path: dest_dir.to_path_buf(),
                source,
            })?;

        // rename replaces an existing target on some platforms, so the chosen
        // name must also be free on disk, not just absent from the listing.
        let (name, destination) = loop {
            let name = resolve_unique(&candidate, &existing);
            let destination = dest_dir.join(&name);
            match fs::symlink_metadata(&destination) {
                Err(e) if e.kind() == ErrorKind::NotFound => break (name, destination),
                Err(source) => {
                    return Err(FileError::DestinationUnreadable {
                        path: destination,
                        source,
                    });
                }
                Ok(_) => {
                    debug!(name = %name, "name already taken on disk");
                    existing.insert(name);
                }
            }
        };

        move_file(&entry.path, &destination).map_err(|source| {
            if source.kind() == ErrorKind::NotFound && !entry.path.exists() {
                FileError::Vanished {
                    path: entry.path.clone(),
                }
            } else {
                FileError::MoveFailed {
                    from: entry.path.clone(),
                    to: destination.clone(),
                    source,
                }
            }
        })?;

        Ok(MovedFile {
            source: entry.path.clone(),
            destination,
            disambiguated: name != candidate,
        })
    }
}

fn has_unicode_name(entry: &SourceEntry) -> bool {
    entry.path.file_name().and_then(OsStr::to_str).is_some()
}

/// Names currently present in `dir`. Names that are not valid Unicode are
/// skipped; no candidate can equal them.
pub(crate) fn list_names(dir: &Path) -> io::Result<HashSet<String>> {
    let mut names = HashSet::new();
    for entry in fs::read_dir(dir)? {
        if let Ok(name) = entry?.file_name().into_string() {
            names.insert(name);
        }
    }
    Ok(names)
}

/// Renames `from` to `to`, falling back to copy-then-remove when the two are
/// on different filesystems.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            debug!(from = %from.display(), to = %to.display(), "rename crosses devices, copying");
            fs::copy(from, to).inspect_err(|_| {
                let _ = fs::remove_file(to);
            })?;
            fs::remove_file(from).inspect_err(|_| {
                let _ = fs::remove_file(to);
            })
        }
        other => other,
    }
}
