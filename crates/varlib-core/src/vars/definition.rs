//! A single discovered variable definition.

use crate::config::VarsConfig;
use crate::error::{Result, VarLibError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One user-defined variable: a name plus the script file that backs it.
///
/// Created fresh on every rebuild scan and never mutated. The registry only
/// enumerates files; resolving a definition to executable content is the
/// host's job, via [`VariableDef::source`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDef {
    /// Variable name: the script's base name with the suffix stripped.
    name: String,
    /// Path of the backing script file.
    source: PathBuf,
}

impl VariableDef {
    /// Build a definition from a script path, if its file name ends with
    /// `suffix`. The variable name is the file name minus the suffix.
    pub fn from_script_path(path: impl Into<PathBuf>, suffix: &str) -> Option<Self> {
        let source = path.into();
        let file_name = source.file_name()?.to_string_lossy().into_owned();
        let name = file_name.strip_suffix(suffix)?.to_string();
        Some(Self { name, source })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Conventional location of this variable's help text: a sibling file
    /// named `<name>.txt`.
    pub fn help_path(&self) -> PathBuf {
        self.source
            .with_file_name(format!("{}{}", self.name, VarsConfig::HELP_SUFFIX))
    }

    /// Load the help text, or `None` if no help file exists.
    pub fn read_help(&self) -> Result<Option<String>> {
        let path = self.help_path();
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VarLibError::io_with_path(e, path)),
        }
    }
}
