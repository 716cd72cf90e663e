//! Generation configuration.
//!
//! A [`BuildConfig`] is the only environment-sensitive input to generation.
//! It is passed explicitly to the walker, the module model and the emitter,
//! so scripts for several architectures can be produced in one process.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::platform::arch::Arch;
use crate::toolchain::Toolchain;

/// Compiler optimization level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OptLevel {
  O0,
  O1,
  O2,
  #[default]
  O3,
}

impl OptLevel {
  pub fn as_u8(self) -> u8 {
    match self {
      Self::O0 => 0,
      Self::O1 => 1,
      Self::O2 => 2,
      Self::O3 => 3,
    }
  }
}

impl fmt::Display for OptLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_u8())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unsupported optimization level {0} (expected 0-3)")]
pub struct InvalidOptLevel(pub u8);

impl TryFrom<u8> for OptLevel {
  type Error = InvalidOptLevel;

  fn try_from(level: u8) -> Result<Self, Self::Error> {
    match level {
      0 => Ok(Self::O0),
      1 => Ok(Self::O1),
      2 => Ok(Self::O2),
      3 => Ok(Self::O3),
      other => Err(InvalidOptLevel(other)),
    }
  }
}

/// How the tree walker treats a directory without a manifest file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ManifestMode {
  /// A missing manifest is a [`ManifestError::NotFound`](crate::manifest::ManifestError::NotFound).
  #[default]
  Strict,
  /// A missing manifest reads as an empty leaf node.
  Lenient,
}

/// Everything generation needs besides the manifests themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
  /// Project root; holds `src/` and receives `build/` and the script.
  pub root: PathBuf,
  pub arch: Arch,
  pub opt_level: OptLevel,
  pub toolchain: Toolchain,
  pub manifest_mode: ManifestMode,
  /// Emit the `run` rule that boots the image in an emulator.
  pub run_rule: bool,
}

impl BuildConfig {
  pub fn new(root: impl Into<PathBuf>, arch: Arch, toolchain: Toolchain) -> Self {
    Self {
      root: root.into(),
      arch,
      opt_level: OptLevel::default(),
      toolchain,
      manifest_mode: ManifestMode::default(),
      run_rule: true,
    }
  }

  pub fn with_opt_level(mut self, opt_level: OptLevel) -> Self {
    self.opt_level = opt_level;
    self
  }

  pub fn with_manifest_mode(mut self, mode: ManifestMode) -> Self {
    self.manifest_mode = mode;
    self
  }

  pub fn with_run_rule(mut self, run_rule: bool) -> Self {
    self.run_rule = run_rule;
    self
  }

  pub fn root(&self) -> &Path {
    &self.root
  }
}
