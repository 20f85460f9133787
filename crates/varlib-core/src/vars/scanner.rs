//! Recursive discovery of variable scripts.

use super::definition::VariableDef;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Scan `dir` recursively for files whose names end with `suffix` and
/// return one [`VariableDef`] per match, in walk order.
///
/// An absent or unlistable `dir` is a normal condition and yields an empty
/// vector. Unreadable nodes inside the tree are skipped with a debug log;
/// their siblings are still scanned. Directories are only recursed into,
/// even when their own names end with the suffix.
pub fn scan_script_dir(dir: &Path, suffix: &str) -> Vec<VariableDef> {
    let mut found = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry under {}: {}", dir.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(def) = VariableDef::from_script_path(entry.path(), suffix) {
            debug!("Discovered variable '{}' at {}", def.name(), entry.path().display());
            found.push(def);
        }
    }

    found
}
