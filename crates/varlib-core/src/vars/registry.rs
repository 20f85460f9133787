//! The variable registry: snapshot publication and lookup.

use super::definition::VariableDef;
use super::scanner::scan_script_dir;
use crate::config::VarsConfig;
use crate::error::{Result, VarLibError};
use crate::workspace::WorkspaceProvider;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use tracing::info;

/// The complete, immutable set of variable definitions published by one
/// rebuild.
///
/// Cloning is cheap (the definition sequence is shared), so readers take
/// their own copy and iterate it without ever touching live registry state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    vars: Arc<[VariableDef]>,
    generation: u64,
    rebuilt_at: String,
}

impl Snapshot {
    /// All published definitions, in scan order.
    pub fn vars(&self) -> &[VariableDef] {
        &self.vars
    }

    /// Look up a definition by variable name.
    pub fn get(&self, name: &str) -> Option<&VariableDef> {
        self.vars.iter().find(|d| d.name() == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VariableDef> {
        self.vars.iter()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Rebuild counter, starting at 1 for the first published snapshot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// RFC 3339 timestamp of when this snapshot was published.
    pub fn rebuilt_at(&self) -> &str {
        &self.rebuilt_at
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a VariableDef;
    type IntoIter = std::slice::Iter<'a, VariableDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter()
    }
}

/// Registry of user-defined variables discovered under the workspace's
/// `vars/` directory.
///
/// Owns one piece of shared mutable state: the currently published
/// [`Snapshot`]. Rebuilds construct a full replacement off to the side and
/// swap it in atomically, so any number of concurrent readers observe either
/// the previous or the next snapshot in its entirety, never a mix.
///
/// Construct once at process startup and share by reference (or `Arc`);
/// there is no ambient global instance.
pub struct VariableRegistry {
    workspace: Arc<dyn WorkspaceProvider>,
    /// The published snapshot; `None` until the first rebuild completes.
    published: RwLock<Option<Snapshot>>,
    /// Serializes rebuilds, including the lazy first-read rebuild.
    rebuild_lock: Mutex<()>,
}

impl VariableRegistry {
    pub fn new(workspace: Arc<dyn WorkspaceProvider>) -> Self {
        Self {
            workspace,
            published: RwLock::new(None),
            rebuild_lock: Mutex::new(()),
        }
    }

    /// Re-scan the workspace and publish a fresh snapshot, replacing
    /// whatever was previously published.
    ///
    /// Rebuilds are mutually exclusive: a rebuild finishes its full scan
    /// before its result becomes visible. On failure (the workspace root
    /// cannot be resolved) the previous snapshot remains published.
    ///
    /// Returns the number of published definitions.
    pub fn rebuild(&self) -> Result<usize> {
        let _guard = self.lock_rebuild()?;
        let snapshot = self.rebuild_locked()?;
        Ok(snapshot.len())
    }

    /// Return the currently published snapshot, rebuilding first if nothing
    /// has ever been published.
    ///
    /// Concurrent first readers collapse into a single initializing scan;
    /// after that, `list()` is a lock-read plus a cheap clone and never
    /// waits on an in-flight rebuild beyond its publish step.
    pub fn list(&self) -> Result<Snapshot> {
        if let Some(snapshot) = self.current()? {
            return Ok(snapshot);
        }

        // First access: re-check under the rebuild lock so racing readers
        // trigger at most one scan between them.
        let _guard = self.lock_rebuild()?;
        if let Some(snapshot) = self.current()? {
            return Ok(snapshot);
        }
        self.rebuild_locked()
    }

    /// Look up a single published definition by name.
    pub fn find(&self, name: &str) -> Result<Option<VariableDef>> {
        Ok(self.list()?.get(name).cloned())
    }

    /// Number of currently published definitions.
    pub fn count(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }

    /// Whether a snapshot has ever been published.
    pub fn is_initialized(&self) -> bool {
        self.published.read().map(|p| p.is_some()).unwrap_or(false)
    }

    fn current(&self) -> Result<Option<Snapshot>> {
        Ok(self
            .published
            .read()
            .map_err(|e| VarLibError::Other(format!("Failed to acquire registry lock: {}", e)))?
            .clone())
    }

    fn lock_rebuild(&self) -> Result<MutexGuard<'_, ()>> {
        self.rebuild_lock
            .lock()
            .map_err(|e| VarLibError::Other(format!("Failed to acquire rebuild lock: {}", e)))
    }

    /// Scan and publish. Caller must hold `rebuild_lock`.
    fn rebuild_locked(&self) -> Result<Snapshot> {
        let root = self.workspace.workspace_root()?;
        let vars_dir = root.join(VarsConfig::VARS_DIR_NAME);

        let discovered = scan_script_dir(&vars_dir, VarsConfig::SCRIPT_SUFFIX);
        let vars = collapse_collisions(discovered);

        let mut slot = self
            .published
            .write()
            .map_err(|e| VarLibError::Other(format!("Failed to acquire registry lock: {}", e)))?;
        let generation = slot.as_ref().map_or(1, |s| s.generation + 1);
        let snapshot = Snapshot {
            vars: vars.into(),
            generation,
            rebuilt_at: chrono::Utc::now().to_rfc3339(),
        };
        *slot = Some(snapshot.clone());
        drop(slot);

        info!(
            "Published variable snapshot generation {} with {} definitions",
            generation,
            snapshot.len()
        );
        Ok(snapshot)
    }
}

/// Collapse duplicate names, keeping the definition encountered last in
/// scan order. Duplicate base names across nested subdirectories are a
/// normal condition, not an error.
fn collapse_collisions(discovered: Vec<VariableDef>) -> Vec<VariableDef> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut vars: Vec<VariableDef> = Vec::with_capacity(discovered.len());

    for def in discovered {
        match slots.get(def.name()) {
            Some(&i) => vars[i] = def,
            None => {
                slots.insert(def.name().to_string(), vars.len());
                vars.push(def);
            }
        }
    }

    vars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::FixedWorkspace;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Provider that counts how often the root is resolved, i.e. how many
    /// rebuild scans actually ran.
    struct CountingWorkspace {
        root: PathBuf,
        resolutions: AtomicUsize,
    }

    impl CountingWorkspace {
        fn new(root: impl Into<PathBuf>) -> Self {
            Self {
                root: root.into(),
                resolutions: AtomicUsize::new(0),
            }
        }

        fn resolutions(&self) -> usize {
            self.resolutions.load(Ordering::SeqCst)
        }
    }

    impl WorkspaceProvider for CountingWorkspace {
        fn workspace_root(&self) -> Result<PathBuf> {
            self.resolutions.fetch_add(1, Ordering::SeqCst);
            Ok(self.root.clone())
        }
    }

    /// Provider that fails after a configurable number of resolutions.
    struct FlakyWorkspace {
        root: PathBuf,
        successes_left: AtomicUsize,
    }

    impl WorkspaceProvider for FlakyWorkspace {
        fn workspace_root(&self) -> Result<PathBuf> {
            let left = self.successes_left.load(Ordering::SeqCst);
            if left == 0 {
                return Err(VarLibError::Workspace {
                    message: "workspace unavailable".into(),
                });
            }
            self.successes_left.store(left - 1, Ordering::SeqCst);
            Ok(self.root.clone())
        }
    }

    fn write_script(root: &Path, rel: &str) {
        let path = root.join(VarsConfig::VARS_DIR_NAME).join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    fn registry_over(root: &Path) -> VariableRegistry {
        VariableRegistry::new(Arc::new(FixedWorkspace::new(root)))
    }

    #[test]
    fn test_missing_vars_dir_publishes_empty() {
        let temp = TempDir::new().unwrap();
        let registry = registry_over(temp.path());

        assert_eq!(registry.rebuild().unwrap(), 0);
        assert!(registry.list().unwrap().is_empty());
    }

    #[test]
    fn test_collision_publishes_single_definition() {
        let temp = TempDir::new().unwrap();
        write_script(temp.path(), "x/a.groovy");
        write_script(temp.path(), "y/a.groovy");
        let registry = registry_over(temp.path());

        registry.rebuild().unwrap();
        let snapshot = registry.list().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.vars()[0].name(), "a");
    }

    #[test]
    fn test_lazy_init_scans_once() {
        let temp = TempDir::new().unwrap();
        write_script(temp.path(), "greet.groovy");
        let workspace = Arc::new(CountingWorkspace::new(temp.path()));
        let registry = VariableRegistry::new(workspace.clone());

        assert!(!registry.is_initialized());
        let first = registry.list().unwrap();
        let second = registry.list().unwrap();

        assert_eq!(workspace.resolutions(), 1);
        assert_eq!(first.generation(), second.generation());
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_rebuild_idempotent_for_unchanged_tree() {
        let temp = TempDir::new().unwrap();
        write_script(temp.path(), "greet.groovy");
        write_script(temp.path(), "sub/deploy.groovy");
        let registry = registry_over(temp.path());

        registry.rebuild().unwrap();
        let before = registry.list().unwrap();
        registry.rebuild().unwrap();
        let after = registry.list().unwrap();

        let pairs = |s: &Snapshot| {
            let mut v: Vec<_> = s
                .iter()
                .map(|d| (d.name().to_string(), d.source().to_path_buf()))
                .collect();
            v.sort();
            v
        };
        assert_eq!(pairs(&before), pairs(&after));
        assert_eq!(after.generation(), before.generation() + 1);
    }

    #[test]
    fn test_failed_rebuild_keeps_previous_snapshot() {
        let temp = TempDir::new().unwrap();
        write_script(temp.path(), "greet.groovy");
        let registry = VariableRegistry::new(Arc::new(FlakyWorkspace {
            root: temp.path().to_path_buf(),
            successes_left: AtomicUsize::new(1),
        }));

        registry.rebuild().unwrap();
        assert!(registry.rebuild().is_err());

        let snapshot = registry.list().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.generation(), 1);
    }

    #[test]
    fn test_find_and_count() {
        let temp = TempDir::new().unwrap();
        write_script(temp.path(), "greet.groovy");
        write_script(temp.path(), "deploy.groovy");
        let registry = registry_over(temp.path());

        assert_eq!(registry.count().unwrap(), 2);
        let found = registry.find("greet").unwrap().unwrap();
        assert!(found.source().ends_with("vars/greet.groovy"));
        assert!(registry.find("missing").unwrap().is_none());
    }

    #[test]
    fn test_snapshot_survives_republish() {
        let temp = TempDir::new().unwrap();
        write_script(temp.path(), "greet.groovy");
        let registry = registry_over(temp.path());

        let old = registry.list().unwrap();
        write_script(temp.path(), "deploy.groovy");
        registry.rebuild().unwrap();

        // The reader's copy is unaffected by the republish.
        assert_eq!(old.len(), 1);
        assert_eq!(registry.list().unwrap().len(), 2);
    }
}
