//! External toolchain binaries referenced by the emitted script.
//!
//! The generator never runs these tools; it only needs their paths so the
//! recipes can name them. Lookup happens once, before generation starts.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Compiler binary name. It is never prefixed: one compiler serves every target.
pub const COMPILER: &str = "rustc";

/// A required toolchain binary could not be found on the search path.
#[derive(Debug, Error)]
#[error("didn't find '{program}' program")]
pub struct ToolNotFoundError {
  pub program: String,
  #[source]
  pub source: which::Error,
}

/// Paths of the tools invoked by generated recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  pub compiler: PathBuf,
  pub objcopy: PathBuf,
  pub archiver: PathBuf,
  pub assembler: PathBuf,
  pub linker: PathBuf,
}

impl Toolchain {
  /// Bare tool names with `prefix` applied to the binutils, left for the
  /// recipe engine's own `PATH` lookup.
  pub fn with_prefix(prefix: &str) -> Self {
    Self {
      compiler: PathBuf::from(COMPILER),
      objcopy: PathBuf::from(format!("{prefix}objcopy")),
      archiver: PathBuf::from(format!("{prefix}ar")),
      assembler: PathBuf::from(format!("{prefix}as")),
      linker: PathBuf::from(format!("{prefix}ld")),
    }
  }

  /// Resolve every tool against the process `PATH`.
  pub fn locate(prefix: &str) -> Result<Self, ToolNotFoundError> {
    Self::with_prefix(prefix).resolve(|program| which::which(program))
  }

  /// Resolve every tool against an explicit search path.
  pub fn locate_in(prefix: &str, paths: impl AsRef<OsStr>, cwd: &Path) -> Result<Self, ToolNotFoundError> {
    let paths = paths.as_ref();
    Self::with_prefix(prefix).resolve(|program| which::which_in(program, Some(paths), cwd))
  }

  fn resolve(self, find: impl Fn(&Path) -> which::Result<PathBuf>) -> Result<Self, ToolNotFoundError> {
    let lookup = |program: PathBuf| -> Result<PathBuf, ToolNotFoundError> {
      let found = find(&program).map_err(|source| ToolNotFoundError {
        program: program.display().to_string(),
        source,
      })?;
      debug!(program = %program.display(), path = %found.display(), "located tool");
      Ok(found)
    };

    Ok(Self {
      compiler: lookup(self.compiler)?,
      objcopy: lookup(self.objcopy)?,
      archiver: lookup(self.archiver)?,
      assembler: lookup(self.assembler)?,
      linker: lookup(self.linker)?,
    })
  }
}
