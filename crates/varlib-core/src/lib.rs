//! Varlib - Headless registry for user-defined pipeline variables.
//!
//! A pipeline host keeps a shared library checked out in a workspace; each
//! script under its `vars/` subdirectory defines one global variable. This
//! crate discovers those scripts and serves them as an immutable, atomically
//! replaceable snapshot. It never reads or executes script contents —
//! resolving a definition to runnable code is the host's job.
//!
//! An external trigger (typically a source-control checkout hook) calls
//! [`VariableRegistry::rebuild`] whenever the workspace may have changed;
//! any number of concurrent readers call [`VariableRegistry::list`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use varlib::{FixedWorkspace, VariableRegistry};
//!
//! fn main() -> varlib::Result<()> {
//!     let workspace = Arc::new(FixedWorkspace::new("/srv/pipeline-libs"));
//!     let registry = VariableRegistry::new(workspace);
//!
//!     // First read lazily triggers one scan.
//!     for def in &registry.list()? {
//!         println!("{} -> {}", def.name(), def.source().display());
//!     }
//!
//!     // After the checkout changes:
//!     registry.rebuild()?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod vars;
pub mod workspace;

// Re-export commonly used types
pub use config::VarsConfig;
pub use error::{Result, VarLibError};
pub use vars::{scan_script_dir, Snapshot, VariableDef, VariableRegistry};
pub use workspace::{FixedWorkspace, WorkspaceProvider};
