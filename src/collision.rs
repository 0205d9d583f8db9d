//! Collision-free naming inside a destination directory.
//!
//! When a candidate name is taken, a counter suffix `_(n)` is inserted before
//! the extension, scanning upward from 1 until a free name is found:
//!
//! ```
//! use std::collections::HashSet;
//! use desktidy::collision::resolve_unique;
//!
//! let existing: HashSet<String> = ["a.txt", "a_(1).txt"].map(String::from).into();
//! assert_eq!(resolve_unique("a.txt", &existing), "a_(2).txt");
//! ```
//!
//! Names are compared without regard to case, since the destination may live
//! on a case-insensitive filesystem where `a.JPG` and `a.jpg` are one file.
//!
//! The resolver remembers the stem it started from rather than re-parsing the
//! names it renders, so parenthesized numbers that were already part of the
//! original name (`img(2020).jpg`) are never mistaken for a counter.

use crate::naming::split_name;
use std::collections::HashSet;

/// Per-call state: the untouched stem and extension plus the last counter
/// that was tried.
#[derive(Debug, Clone)]
struct Disambiguator<'a> {
    stem: &'a str,
    ext: &'a str,
    counter: u64,
}

impl<'a> Disambiguator<'a> {
    fn new(candidate: &'a str) -> Self {
        let (stem, ext) = split_name(candidate);
        Self {
            stem,
            ext,
            counter: 0,
        }
    }

    fn next_name(&mut self) -> String {
        self.counter += 1;
        format!("{}_({}){}", self.stem, self.counter, self.ext)
    }
}

/// Returns `candidate` if no name in `existing` matches it ignoring case,
/// otherwise the suffixed name with the lowest free counter.
///
/// Always terminates: `existing` is finite and every attempt uses a new
/// counter value.
pub fn resolve_unique(candidate: &str, existing: &HashSet<String>) -> String {
    let taken: HashSet<String> = existing.iter().map(|name| name.to_lowercase()).collect();
    if !taken.contains(&candidate.to_lowercase()) {
        return candidate.to_string();
    }

    let mut attempt = Disambiguator::new(candidate);
    loop {
        let name = attempt.next_name();
        if !taken.contains(&name.to_lowercase()) {
            return name;
        }
    }
}
