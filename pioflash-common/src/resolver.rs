// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! PlatformIO executable discovery.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

/// Errors returned while locating the PlatformIO executable.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(
        "Could not locate the PlatformIO executable. Install PlatformIO or pass --platformio with an explicit path."
    )]
    NotFound { candidates: Vec<PathBuf> },
}

/// Locates a runnable PlatformIO executable.
///
/// Candidates, in order: the hint as given, the hint looked up in `PATH`,
/// PlatformIO's own virtualenv and `~/.local/bin`.
#[derive(Clone, Debug, Default)]
pub struct ExecutableResolver {
    home: Option<PathBuf>,
    search_path: Option<OsString>,
    cwd: PathBuf,
}

impl ExecutableResolver {
    /// Resolver using the current user's home directory and `PATH`.
    pub fn from_env() -> Self {
        Self {
            home: dirs::home_dir(),
            search_path: std::env::var_os("PATH"),
            cwd: std::env::current_dir().unwrap_or_default(),
        }
    }

    /// Resolver with an explicit home directory and search path.
    pub fn new(home: Option<PathBuf>, search_path: Option<OsString>) -> Self {
        Self {
            home,
            search_path,
            cwd: std::env::current_dir().unwrap_or_default(),
        }
    }

    /// Ordered, deduplicated list of paths to check for the given hint.
    pub fn candidates(&self, hint: Option<&str>) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(cmd) = hint.filter(|cmd| !cmd.is_empty()) {
            paths.push(expand_home(cmd, self.home.as_deref()));
            if let Ok(found) = which::which_in(cmd, self.search_path.as_ref(), &self.cwd) {
                paths.push(found);
            }
        }

        if let Some(home) = &self.home {
            paths.push(home.join(".platformio").join("penv").join("bin").join("platformio"));
            paths.push(home.join(".local").join("bin").join("platformio"));
        }

        let mut seen = HashSet::new();
        paths.retain(|path| seen.insert(path.clone()));
        paths
    }

    /// Return the first candidate that is an executable regular file.
    pub fn resolve(&self, hint: Option<&str>) -> Result<PathBuf, ResolveError> {
        let candidates = self.candidates(hint);

        for candidate in &candidates {
            if is_executable_file(candidate) {
                debug!("Using PlatformIO at {}", candidate.display());
                return Ok(candidate.clone());
            }
            debug!("Skipping {}: not an executable file", candidate.display());
        }

        Err(ResolveError::NotFound { candidates })
    }
}

/// Replace a leading `~` with the home directory.
fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    match home {
        Some(home) if path == "~" => home.to_path_buf(),
        Some(home) => match path.strip_prefix("~/") {
            Some(rest) => home.join(rest),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}

/// Regular file the current user is allowed to execute.
#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use nix::unistd::{access, AccessFlags};

    let is_file = fs::metadata(path).map(|m| m.is_file()).unwrap_or(false);
    is_file && access(path, AccessFlags::X_OK).is_ok()
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}
