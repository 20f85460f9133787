//! User-defined variable discovery and registration.
//!
//! A workspace's shared library keeps one script per variable under the
//! conventional `vars/` subdirectory; this module discovers those scripts
//! and serves them as a published, immutable snapshot:
//!
//! ```text
//! VariableRegistry
//!     │
//!     ├── scanner - recursive script discovery (pure)
//!     │
//!     └── Snapshot - published sequence of VariableDef
//! ```

mod definition;
mod registry;
mod scanner;

pub use definition::VariableDef;
pub use registry::{Snapshot, VariableRegistry};
pub use scanner::scan_script_dir;
