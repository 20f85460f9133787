//! Workspace root resolution.
//!
//! The registry never decides where the workspace lives; a host supplies a
//! provider that resolves the current root on demand.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Resolves the workspace root directory under which the conventional
/// `vars/` subdirectory lives.
///
/// The registry calls this on every rebuild, so implementations backed by a
/// moving checkout always resolve the current location. The path is not
/// required to exist; an absent workspace simply yields zero variables.
pub trait WorkspaceProvider: Send + Sync {
    /// Resolve the current workspace root.
    fn workspace_root(&self) -> Result<PathBuf>;
}

/// Provider backed by a fixed directory, for hosts whose workspace never
/// moves once the process is up.
#[derive(Debug, Clone)]
pub struct FixedWorkspace {
    root: PathBuf,
}

impl FixedWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl WorkspaceProvider for FixedWorkspace {
    fn workspace_root(&self) -> Result<PathBuf> {
        Ok(self.root.clone())
    }
}
