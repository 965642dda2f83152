//! Module file discovery.
//!
//! YANG modules are stored as `<name>[@<revision>].yang` (or `.yin`)
//! files scattered over a handful of well-known locations. The locator
//! probes those locations in a fixed order and returns the first match;
//! it never opens a file and never touches a module record.
//!
//! Search order for a bare module name:
//! 1. The override directory, when one is configured
//! 2. The working directory
//! 3. Each entry of the module search path (`YANGKIT_MODPATH`)
//! 4. `$HOME/modules`
//! 5. `$YANGKIT_HOME/modules`
//! 6. `$YANGKIT_INSTALL/modules`, else `/usr/share/yangkit/modules`
//!
//! Locations 1 through 3 descend into subdirectories only when the
//! caller asks for it; the module library trees (4 through 6) are always
//! searched with subdirectories.
//!
//! A name that contains a path separator or a `.yang`/`.yin` suffix is
//! treated as an explicit path: it is tried exactly once, after `~`
//! expansion, and the search list is never consulted.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

/// Default library tree used when `YANGKIT_INSTALL` is not set.
const DEFAULT_INSTALL_DIR: &str = "/usr/share/yangkit/modules";

/// Failure to locate a module file.
#[derive(Debug, Error)]
pub enum LocateError {
    /// Every search location was probed and none matched.
    #[error("module '{}'{} not found on the search path", name, match revision {
        Some(rev) => format!(" revision {}", rev),
        None => String::new(),
    })]
    NotFound {
        name: String,
        revision: Option<String>,
    },

    /// A directory could not be read while probing.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Ordered list of locations to probe for module files.
///
/// Every field can be overridden per instance; [`SearchPaths::from_env`]
/// fills them from the process environment once, and nothing here reads
/// the environment afterwards.
#[derive(Debug, Clone)]
pub struct SearchPaths {
    /// Probed before everything else when set. Comparison tooling uses
    /// this to pin one side of a diff to a specific tree.
    pub override_dir: Option<PathBuf>,
    /// The working directory probe.
    pub cwd: PathBuf,
    /// Entries of the module search path, in order.
    pub modpath: Vec<PathBuf>,
    /// `$HOME/modules`.
    pub home_modules: Option<PathBuf>,
    /// `$YANGKIT_HOME/modules`.
    pub yangkit_home: Option<PathBuf>,
    /// The installed module library.
    pub install: PathBuf,
}

impl SearchPaths {
    /// Builds the search list from the process environment.
    pub fn from_env() -> Self {
        let modpath = std::env::var("YANGKIT_MODPATH")
            .map(|raw| {
                raw.split(':')
                    .filter(|entry| !entry.is_empty())
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            override_dir: None,
            cwd: PathBuf::from("."),
            modpath,
            home_modules: std::env::var_os("HOME").map(|home| PathBuf::from(home).join("modules")),
            yangkit_home: std::env::var_os("YANGKIT_HOME")
                .map(|home| PathBuf::from(home).join("modules")),
            install: std::env::var_os("YANGKIT_INSTALL")
                .map(|root| PathBuf::from(root).join("modules"))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INSTALL_DIR)),
        }
    }

    /// A search list that consults nothing outside the directories the
    /// caller fills in afterwards.
    pub fn empty() -> Self {
        Self {
            override_dir: None,
            cwd: PathBuf::from("."),
            modpath: Vec::new(),
            home_modules: None,
            yangkit_home: None,
            install: PathBuf::from(DEFAULT_INSTALL_DIR),
        }
    }

    /// Finds the file for a module.
    ///
    /// `search_subdirs` controls descent for the working directory and
    /// the module search path; the library trees always descend.
    ///
    /// # Errors
    ///
    /// [`LocateError::NotFound`] when every location has been probed, or
    /// [`LocateError::Io`] when a directory that should be readable is
    /// not.
    pub fn locate(
        &self,
        name: &str,
        revision: Option<&str>,
        search_subdirs: bool,
    ) -> Result<PathBuf, LocateError> {
        debug!(module = name, ?revision, "locating module file");

        if is_explicit_path(name) {
            let path = expand_home(name);
            return if path.is_file() {
                Ok(path)
            } else {
                Err(self.not_found(name, revision))
            };
        }

        if let Some(dir) = &self.override_dir {
            if let Some(hit) = probe_tree(dir, name, revision, search_subdirs)? {
                return Ok(hit);
            }
        }
        if let Some(hit) = probe_tree(&self.cwd, name, revision, search_subdirs)? {
            return Ok(hit);
        }
        for dir in &self.modpath {
            if let Some(hit) = probe_tree(dir, name, revision, search_subdirs)? {
                return Ok(hit);
            }
        }
        for dir in [&self.home_modules, &self.yangkit_home].into_iter().flatten() {
            if let Some(hit) = probe_tree(dir, name, revision, true)? {
                return Ok(hit);
            }
        }
        if let Some(hit) = probe_tree(&self.install, name, revision, true)? {
            return Ok(hit);
        }

        Err(self.not_found(name, revision))
    }

    fn not_found(&self, name: &str, revision: Option<&str>) -> LocateError {
        LocateError::NotFound {
            name: name.to_string(),
            revision: revision.map(str::to_string),
        }
    }
}

/// True when the name must be treated as a path rather than searched.
fn is_explicit_path(name: &str) -> bool {
    name.contains(std::path::MAIN_SEPARATOR)
        || name.contains('/')
        || name.ends_with(".yang")
        || name.ends_with(".yin")
}

/// Expands a leading `~/` to the caller's home directory.
fn expand_home(name: &str) -> PathBuf {
    if let Some(rest) = name.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(name)
}

/// Probes one search location: the directory itself first, then its
/// subdirectories when allowed.
fn probe_tree(
    dir: &Path,
    name: &str,
    revision: Option<&str>,
    subdirs: bool,
) -> Result<Option<PathBuf>, LocateError> {
    if !dir.is_dir() {
        return Ok(None);
    }
    if let Some(hit) = probe_dir(dir, name, revision) {
        return Ok(Some(hit));
    }
    if subdirs {
        return walk(dir, name, revision);
    }
    Ok(None)
}

/// Tries the candidate file names in one directory.
///
/// With a requested revision the dated name is preferred over the bare
/// one, and `.yang` over `.yin` in either case.
fn probe_dir(dir: &Path, name: &str, revision: Option<&str>) -> Option<PathBuf> {
    let candidates = match revision {
        Some(rev) => vec![
            format!("{}@{}.yang", name, rev),
            format!("{}.yang", name),
            format!("{}@{}.yin", name, rev),
            format!("{}.yin", name),
        ],
        None => vec![format!("{}.yang", name), format!("{}.yin", name)],
    };

    for candidate in candidates {
        let path = dir.join(&candidate);
        if path.is_file() {
            trace!(path = %path.display(), "candidate matched");
            return Some(path);
        }
    }
    None
}

/// Recursive descent below one search location.
///
/// Entries are visited in sorted order and hidden directories are
/// skipped. When no revision was requested, any syntactically dated
/// `name@DATE.ext` file in a visited directory matches; the first one in
/// sort order wins, the engine does not compare the dates themselves.
fn walk(dir: &Path, name: &str, revision: Option<&str>) -> Result<Option<PathBuf>, LocateError> {
    let reader = fs::read_dir(dir).map_err(|source| LocateError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut entries: Vec<PathBuf> = reader
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    if revision.is_none() {
        for entry in &entries {
            if entry.is_file() && matches_dated(entry, name) {
                trace!(path = %entry.display(), "dated candidate matched");
                return Ok(Some(entry.clone()));
            }
        }
    }

    for entry in &entries {
        if !entry.is_dir() || is_hidden(entry) {
            continue;
        }
        if let Some(hit) = probe_dir(entry, name, revision) {
            return Ok(Some(hit));
        }
        if let Some(hit) = walk(entry, name, revision)? {
            return Ok(Some(hit));
        }
    }
    Ok(None)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// True for `name@YYYY-MM-DD.yang` or `.yin` file names.
fn matches_dated(path: &Path, name: &str) -> bool {
    let Some(file) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let stem = match file.strip_suffix(".yang").or_else(|| file.strip_suffix(".yin")) {
        Some(stem) => stem,
        None => return false,
    };
    let Some(date) = stem.strip_prefix(name).and_then(|rest| rest.strip_prefix('@')) else {
        return false;
    };
    is_date_shaped(date)
}

fn is_date_shaped(date: &str) -> bool {
    let bytes = date.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
}
