//! Directory traversal feeding file paths to the counting engine.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::Args;
use crate::error::{ClocError, Result};

const IGNORED_DIRS: &[&str] = &[
    "target",
    "node_modules",
    "build",
    "dist",
    ".git",
    ".hg",
    ".svn",
    "venv",
    "__pycache__",
    "bin",
    "obj",
];

#[derive(Debug, Default)]
pub struct WalkOptions {
    pub ignore: Vec<String>,
    pub max_depth: usize,
    pub non_recursive: bool,
    pub filespec: Option<Pattern>,
    /// Directories below a root are entered only when their name matches.
    pub match_dir: Option<Regex>,
}

impl WalkOptions {
    pub fn from_args(args: &Args) -> Result<Self> {
        let filespec = match args.filespec.as_deref() {
            Some(spec) => Some(Pattern::new(spec).map_err(|source| {
                ClocError::InvalidFilespec {
                    pattern: spec.to_string(),
                    source,
                }
            })?),
            None => None,
        };
        let match_dir = match args.match_dir.as_deref() {
            Some(pattern) => Some(Regex::new(pattern).map_err(|source| {
                ClocError::InvalidMatchDir {
                    pattern: pattern.to_string(),
                    source,
                }
            })?),
            None => None,
        };
        Ok(WalkOptions {
            ignore: args.ignore.clone(),
            max_depth: args.max_depth,
            non_recursive: args.non_recursive,
            filespec,
            match_dir,
        })
    }
}

/// Files found under the roots, each listed once, plus the number of
/// entries that could not be inspected.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub files: Vec<PathBuf>,
    pub errors: usize,
    seen: HashSet<PathBuf>,
}

impl WalkOutcome {
    fn push(&mut self, path: PathBuf) {
        if self.seen.insert(path.clone()) {
            self.files.push(path);
        }
    }
}

pub fn collect_files(roots: &[PathBuf], options: &WalkOptions) -> Result<WalkOutcome> {
    let mut outcome = WalkOutcome::default();
    for root in roots {
        if !root.exists() {
            return Err(ClocError::PathNotFound(root.clone()));
        }
        walk(root, root, 0, options, &mut outcome);
    }
    Ok(outcome)
}

fn is_ignored_dir(path: &Path, options: &WalkOptions) -> bool {
    let dir_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    IGNORED_DIRS.contains(&dir_name)
        || options
            .ignore
            .iter()
            .any(|d| path.ends_with(Path::new(d)))
}

fn is_matched_dir(path: &Path, options: &WalkOptions) -> bool {
    let Some(pattern) = options.match_dir.as_ref() else {
        return true;
    };
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| pattern.is_match(name))
        .unwrap_or(false)
}

fn should_process_file(filespec: Option<&Pattern>, root_path: &Path, file_path: &Path) -> bool {
    filespec
        .map(|pattern| filespec_matches(pattern, root_path, file_path))
        .unwrap_or(true)
}

fn filespec_matches(pattern: &Pattern, root_path: &Path, file_path: &Path) -> bool {
    if file_path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| pattern.matches(name))
        .unwrap_or(false)
    {
        return true;
    }

    let relative = match file_path.strip_prefix(root_path) {
        Ok(rel) => rel,
        Err(_) => return false,
    };

    let rel_str = match relative.to_str() {
        Some(s) => s.replace('\\', "/"),
        None => return false,
    };

    pattern.matches(&rel_str)
}

fn walk(
    path: &Path,
    root_path: &Path,
    current_depth: usize,
    options: &WalkOptions,
    outcome: &mut WalkOutcome,
) {
    if current_depth > options.max_depth {
        warn!(
            max_depth = options.max_depth,
            path = %path.display(),
            "maximum directory depth reached"
        );
        outcome.errors += 1;
        return;
    }

    let metadata = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "cannot read metadata");
            outcome.errors += 1;
            return;
        }
    };

    if metadata.is_file() {
        if should_process_file(options.filespec.as_ref(), root_path, path) {
            outcome.push(path.to_path_buf());
        }
        return;
    }

    if !metadata.is_dir() || (current_depth > 0 && is_ignored_dir(path, options)) {
        return;
    }
    if current_depth > 0 && !is_matched_dir(path, options) {
        debug!(path = %path.display(), "directory does not match --match-d");
        return;
    }

    let read_dir = match fs::read_dir(path) {
        Ok(iter) => iter,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "cannot read directory");
            outcome.errors += 1;
            return;
        }
    };

    let mut entries = Vec::new();
    for entry_result in read_dir {
        match entry_result {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot read directory entry");
                outcome.errors += 1;
            }
        }
    }
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let entry_path = entry.path();
        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(err) => {
                warn!(path = %entry_path.display(), error = %err, "cannot read file type");
                outcome.errors += 1;
                continue;
            }
        };

        if file_type.is_symlink() {
            continue;
        }
        if file_type.is_dir() {
            if !options.non_recursive {
                walk(&entry_path, root_path, current_depth + 1, options, outcome);
            }
        } else if file_type.is_file()
            && should_process_file(options.filespec.as_ref(), root_path, &entry_path)
        {
            outcome.push(entry_path);
        }
    }
}
