//! Canonical paths of every build artifact.
//!
//! All paths are relative to the project root, which is where the emitted
//! script runs. The build tree mirrors the source tree under `build/`, so a
//! source directory `src/kernel/arch-x86_64` builds into
//! `build/src/kernel/arch-x86_64`.
//!
//! Rules that reference another module's output must go through these
//! functions; the prerequisite text and the produced file then cannot drift
//! apart.

use std::path::{Path, PathBuf};

use crate::consts::{
  BUILD_DIR, BUILD_DIRS_MARKER, CRATE_ROOT_FILE, KERNEL_LINKER_SCRIPT, KERNEL_MODULE_DIR, MODULE_LINKER_SCRIPT,
  SRC_DIR,
};
use crate::platform::arch::Arch;

/// Kind of per-module artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
  /// Compiled-language archive produced by the compiler.
  Library,
  /// Single object extracted from the library.
  RelocatableObject,
  /// Object assembled from the module's assembly sources.
  AssemblyObject,
  /// Linked, still relocatable, module image.
  ModuleImage,
}

/// Path of the `kind` artifact of module `name`.
pub fn artifact_path(name: &str, kind: ArtifactKind) -> PathBuf {
  let file = match kind {
    ArtifactKind::Library => format!("lib{name}.rlib"),
    ArtifactKind::RelocatableObject => format!("{name}.rust.o"),
    ArtifactKind::AssemblyObject => format!("{name}.asm.o"),
    ArtifactKind::ModuleImage => format!("{name}.mod"),
  };
  module_build_dir(name).join(file)
}

pub fn library_path(name: &str) -> PathBuf {
  artifact_path(name, ArtifactKind::Library)
}

pub fn relocatable_object_path(name: &str) -> PathBuf {
  artifact_path(name, ArtifactKind::RelocatableObject)
}

pub fn assembly_object_path(name: &str) -> PathBuf {
  artifact_path(name, ArtifactKind::AssemblyObject)
}

pub fn module_image_path(name: &str) -> PathBuf {
  artifact_path(name, ArtifactKind::ModuleImage)
}

/// Marker touched once all of a module's output directories exist.
pub fn build_dirs_marker_path(name: &str) -> PathBuf {
  module_build_dir(name).join(BUILD_DIRS_MARKER)
}

/// Root of the source tree.
pub fn src_root() -> PathBuf {
  PathBuf::from(SRC_DIR)
}

/// Root of the build tree; `clean` removes it wholesale.
pub fn build_root() -> PathBuf {
  PathBuf::from(BUILD_DIR)
}

/// Output directory mirroring the root-relative source directory `source_dir`.
pub fn build_dir(source_dir: &Path) -> PathBuf {
  build_root().join(source_dir)
}

pub fn module_source_dir(name: &str) -> PathBuf {
  src_root().join(name)
}

pub fn module_build_dir(name: &str) -> PathBuf {
  build_dir(&module_source_dir(name))
}

/// Crate root handed to the compiler for module `name`.
pub fn crate_root_path(name: &str) -> PathBuf {
  module_source_dir(name).join(CRATE_ROOT_FILE)
}

/// File name of the temporary archive made from the library during extraction.
pub fn intermediate_archive_name(name: &str) -> String {
  format!("lib{name}.a")
}

/// File name of the single member object inside the intermediate archive.
pub fn archive_member_name(name: &str) -> String {
  format!("lib{name}.0.o")
}

/// Whole-system linked image.
pub fn kernel_image_path(image_name: &str) -> PathBuf {
  module_build_dir(KERNEL_MODULE_DIR).join(image_name)
}

pub fn module_linker_script() -> PathBuf {
  module_source_dir(KERNEL_MODULE_DIR).join(MODULE_LINKER_SCRIPT)
}

pub fn kernel_linker_script(arch: Arch) -> PathBuf {
  module_source_dir(KERNEL_MODULE_DIR)
    .join(arch.subdir())
    .join(KERNEL_LINKER_SCRIPT)
}

/// Renders a root-relative path the way it appears in the script, with `/`
/// separators regardless of host.
pub fn script_path(path: &Path) -> String {
  path
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/")
}

/// Short form of an artifact path used in progress messages: relative to
/// the build root when it lies inside it.
pub fn pretty_target(path: &Path) -> String {
  let root = build_root();
  script_path(path.strip_prefix(&root).unwrap_or(path))
}
