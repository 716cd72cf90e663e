//! Shared helpers for library integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use kgen_lib::config::{BuildConfig, ManifestMode};
use kgen_lib::consts::MANIFEST_FILENAME;
use kgen_lib::generate::{GenerateError, Generator};
use kgen_lib::platform::arch::Arch;
use kgen_lib::script::Script;
use kgen_lib::toolchain::Toolchain;
use tempfile::TempDir;

/// A project root in a temporary directory.
pub struct Project {
  pub temp: TempDir,
}

impl Project {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Two modules: `core` with two compiled sources, and `kernel` depending
  /// on `core` with one compiled source and one assembly file per
  /// architecture under its `arch` subdirectory.
  pub fn core_kernel() -> Self {
    let project = Self::new();
    project.manifest("src", r#"{ "kernelModules": ["core", "kernel"] }"#);
    project.manifest("src/core", r#"{ "rustFiles": ["lib.rs", "option.rs"] }"#);
    project.manifest(
      "src/kernel",
      r#"{ "rustFiles": ["lib.rs"], "dependencies": ["core"], "subdirs": ["arch"] }"#,
    );
    project.manifest("src/kernel/arch-x86_64", r#"{ "asmFiles": ["boot.s"] }"#);
    project.manifest("src/kernel/arch-aarch64", r#"{ "asmFiles": ["boot.s"] }"#);
    project
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  pub fn manifest(&self, dir: &str, content: &str) {
    let dir = self.root().join(dir);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(MANIFEST_FILENAME), content).unwrap();
  }

  pub fn config(&self, arch: Arch) -> BuildConfig {
    BuildConfig::new(self.root(), arch, Toolchain::with_prefix(&format!("{arch}-elf-")))
  }

  pub fn lenient_config(&self, arch: Arch) -> BuildConfig {
    self.config(arch).with_manifest_mode(ManifestMode::Lenient)
  }

  pub fn script(&self, arch: Arch) -> Result<Script, GenerateError> {
    Ok(Generator::load(self.config(arch))?.script())
  }

  pub fn output(&self) -> PathBuf {
    self.root().join("Makefile")
  }
}
