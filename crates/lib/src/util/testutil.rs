//! Test utilities for kgen-lib.
//!
//! Helpers that lay out manifest trees on disk, so walker and generator
//! tests read real files.

use std::fs;
use std::path::Path;

use crate::consts::MANIFEST_FILENAME;

/// Write `content` as the manifest of `dir` (relative to `root`), creating
/// the directory as needed.
pub fn write_manifest(root: &Path, dir: &str, content: &str) {
  let dir = root.join(dir);
  fs::create_dir_all(&dir).unwrap();
  fs::write(dir.join(MANIFEST_FILENAME), content).unwrap();
}

/// Lay out the two-module project used across tests:
///
/// - `core`: two compiled sources, no dependencies
/// - `kernel`: depends on `core`, one compiled source plus one assembly file
///   found through its `arch` subdirectory
pub fn write_core_kernel_project(root: &Path) {
  write_manifest(root, "src", r#"{ "kernelModules": ["core", "kernel"] }"#);
  write_manifest(root, "src/core", r#"{ "rustFiles": ["lib.rs", "option.rs"] }"#);
  write_manifest(
    root,
    "src/kernel",
    r#"{ "rustFiles": ["lib.rs"], "dependencies": ["core"], "subdirs": ["arch"] }"#,
  );
  write_manifest(root, "src/kernel/arch-x86_64", r#"{ "asmFiles": ["boot.s"] }"#);
  write_manifest(root, "src/kernel/arch-aarch64", r#"{ "asmFiles": ["boot.s"] }"#);
}
