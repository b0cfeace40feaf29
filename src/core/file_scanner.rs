use std::{
    collections::BTreeSet,
    path::{Component, Path, PathBuf},
};

use glob::{Pattern, glob};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning files.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Python files, sorted by path.
    pub files: BTreeSet<String>,
    pub skipped_count: usize,
}

/// Collect the Python files below `includes`, resolved against `base_dir`.
///
/// An include may name a directory, a single file or a glob pattern. An
/// ignore is either a glob matched against the full path or a literal path
/// that excludes everything below it.
pub fn scan_files(base_dir: &Path, includes: &[String], ignore_patterns: &[String]) -> ScanResult {
    let mut files = BTreeSet::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();

    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => warn!(pattern = %p, error = %e, "invalid ignore pattern"),
            }
        } else {
            literal_ignore_paths.push(base_dir.join(p));
        }
    }

    let roots: Vec<PathBuf> = if includes.is_empty() {
        vec![base_dir.to_path_buf()]
    } else {
        let mut paths = Vec::new();
        for inc in includes {
            if is_glob_pattern(inc) {
                let full_pattern = base_dir.join(inc);
                match glob(&full_pattern.to_string_lossy()) {
                    Ok(entries) => paths.extend(entries.flatten()),
                    Err(e) => warn!(pattern = %inc, error = %e, "invalid include pattern"),
                }
            } else {
                let path = base_dir.join(inc);
                if path.exists() {
                    paths.push(path);
                } else {
                    warn!(path = %path.display(), "include path does not exist");
                }
            }
        }
        paths
    };

    for root in roots {
        for entry in WalkDir::new(&root) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    warn!(error = %e, "cannot access path");
                    continue;
                }
            };
            let path = entry.path();
            let path_str = path.to_string_lossy();

            if literal_ignore_paths
                .iter()
                .any(|ignore_path| path.starts_with(ignore_path))
            {
                continue;
            }
            if glob_patterns.iter().any(|p| p.matches(&path_str)) {
                continue;
            }

            if path.is_file() && is_python_file(path) {
                files.insert(display_path(path));
            }
        }
    }

    debug!(files = files.len(), skipped = skipped_count, "scan finished");
    ScanResult {
        files,
        skipped_count,
    }
}

fn is_python_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("py"))
}

/// Path as reported in message locations, without `.` components.
fn display_path(path: &Path) -> String {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect::<PathBuf>()
        .to_string_lossy()
        .into_owned()
}
