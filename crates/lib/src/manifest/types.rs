//! Manifest types for kgen.
//!
//! # Format
//!
//! A directory manifest (`build.json`):
//!
//! ```json
//! {
//!   "asmFiles": ["boot.s"],
//!   "compiledFiles": ["lib.rs", "memory.rs"],
//!   "subdirs": ["arch", "mm"],
//!   "dependencies": ["core"],
//!   "compilerArgs": ["-C", "relocation-model=static"]
//! }
//! ```
//!
//! `rustFiles` is accepted as an alias of `compiledFiles`. A manifest with a
//! `subdirs` key is a grouping node; one without it is a leaf and owns a
//! build-output directory, even when it lists no sources.
//!
//! The top-level manifest (`src/build.json`) lists the kernel modules in
//! link order:
//!
//! ```json
//! { "kernelModules": ["core", "kernel"], "imageName": "arwen.ki" }
//! ```

use std::collections::HashSet;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_IMAGE_NAME, KERNEL_MODULE_DIR};

/// Characters the recipe engine or the shell would interpret inside a
/// target, prerequisite or recipe word.
const SCRIPT_METACHARS: &[char] = &[':', '$', '#', '%', ';', '\\', '"', '\'', '`', '|', '&', '<', '>', '*', '?'];

/// Module names become crate names and path components, so they follow the
/// compiler's crate-name rules: ASCII letters, digits and `_`, not starting
/// with a digit.
pub fn is_valid_module_name(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
    _ => return false,
  }
  chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Whether `name` can be written into the script as a single word.
pub fn is_valid_file_name(name: &str) -> bool {
  !name.is_empty() && !name.chars().any(|c| c.is_whitespace() || c.is_control() || SCRIPT_METACHARS.contains(&c))
}

/// A subdirectory entry must name exactly one child directory.
fn is_single_component(name: &str) -> bool {
  let mut components = Path::new(name).components();
  matches!(
    (components.next(), components.next()),
    (Some(Component::Normal(_)), None)
  )
}

/// Raw contents of a directory manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestFile {
  /// Assembly sources; order is preserved into the assembler invocation.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub asm_files: Vec<String>,

  /// Compiled-language sources.
  #[serde(default, alias = "rustFiles", skip_serializing_if = "Vec::is_empty")]
  pub compiled_files: Vec<String>,

  /// Child directories. Presence, even empty, makes this a grouping node.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub subdirs: Option<Vec<String>>,

  /// Names of kernel modules this one links against.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub dependencies: Vec<String>,

  /// Extra flags passed to the compiler for the owning module.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub compiler_args: Vec<String>,
}

impl ManifestFile {
  /// Reject entries that cannot be spliced into the script or that would
  /// lead the walk outside the declaring directory.
  pub fn validate(&self, path: &Path) -> Result<(), ManifestError> {
    let invalid_file = |name: &String| ManifestError::InvalidFileName {
      path: path.to_path_buf(),
      name: name.clone(),
    };

    if let Some(name) = self
      .asm_files
      .iter()
      .chain(&self.compiled_files)
      .find(|name| !is_valid_file_name(name))
    {
      return Err(invalid_file(name));
    }

    if let Some(name) = self.dependencies.iter().find(|name| !is_valid_module_name(name)) {
      return Err(ManifestError::InvalidModuleName {
        path: path.to_path_buf(),
        name: name.clone(),
      });
    }

    for name in self.subdirs.iter().flatten() {
      if !is_single_component(name) {
        return Err(ManifestError::InvalidSubdir {
          path: path.to_path_buf(),
          name: name.clone(),
        });
      }
      if !is_valid_file_name(name) {
        return Err(invalid_file(name));
      }
    }

    Ok(())
  }
}

/// Contents of the top-level manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopManifest {
  /// Kernel modules in link order.
  pub kernel_modules: Vec<String>,

  /// File name of the linked kernel image.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_name: Option<String>,
}

impl TopManifest {
  pub fn image_name(&self) -> &str {
    self.image_name.as_deref().unwrap_or(DEFAULT_IMAGE_NAME)
  }

  /// Reject empty or duplicated module lists, unusable names, and lists
  /// without the `kernel` module that owns the linker scripts and the image.
  pub fn validate(&self, path: &Path) -> Result<(), ManifestError> {
    if self.kernel_modules.is_empty() {
      return Err(ManifestError::NoKernelModules { path: path.to_path_buf() });
    }

    let mut seen = HashSet::new();
    for name in &self.kernel_modules {
      if !is_valid_module_name(name) {
        return Err(ManifestError::InvalidModuleName {
          path: path.to_path_buf(),
          name: name.clone(),
        });
      }
      if !seen.insert(name.as_str()) {
        return Err(ManifestError::DuplicateModule(name.clone()));
      }
    }

    let image_name = self.image_name();
    if !is_single_component(image_name) || !is_valid_file_name(image_name) {
      return Err(ManifestError::InvalidFileName {
        path: path.to_path_buf(),
        name: image_name.to_string(),
      });
    }

    if !seen.contains(KERNEL_MODULE_DIR) {
      return Err(ManifestError::MissingKernelModule { path: path.to_path_buf() });
    }

    Ok(())
  }
}

/// What one manifest contributes to its owning module, with file names
/// resolved against the manifest's directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSet {
  pub asm_files: Vec<PathBuf>,
  pub compiled_files: Vec<PathBuf>,
  pub dependencies: Vec<String>,
  pub compiler_args: Vec<String>,
}

impl SourceSet {
  pub fn from_manifest(dir: &Path, file: &ManifestFile) -> Self {
    Self {
      asm_files: file.asm_files.iter().map(|f| dir.join(f)).collect(),
      compiled_files: file.compiled_files.iter().map(|f| dir.join(f)).collect(),
      dependencies: file.dependencies.clone(),
      compiler_args: file.compiler_args.clone(),
    }
  }
}

/// One walked source directory.
///
/// Directories are root-relative (`src/kernel/arch-x86_64`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestNode {
  /// Declares child directories; contributes sources but no output directory.
  Group {
    dir: PathBuf,
    sources: SourceSet,
    children: Vec<ManifestNode>,
  },
  /// Declares no children; its mirrored build directory is a real output location.
  Leaf { dir: PathBuf, sources: SourceSet },
}

impl ManifestNode {
  pub fn dir(&self) -> &Path {
    match self {
      Self::Group { dir, .. } | Self::Leaf { dir, .. } => dir,
    }
  }

  pub fn sources(&self) -> &SourceSet {
    match self {
      Self::Group { sources, .. } | Self::Leaf { sources, .. } => sources,
    }
  }

  pub fn children(&self) -> &[ManifestNode] {
    match self {
      Self::Group { children, .. } => children,
      Self::Leaf { .. } => &[],
    }
  }

  pub fn is_leaf(&self) -> bool {
    matches!(self, Self::Leaf { .. })
  }

  /// Depth-first, pre-order traversal: a node, then each child subtree in
  /// declaration order.
  pub fn iter(&self) -> Preorder<'_> {
    Preorder { stack: vec![self] }
  }
}

/// Iterator returned by [`ManifestNode::iter`].
pub struct Preorder<'a> {
  stack: Vec<&'a ManifestNode>,
}

impl<'a> Iterator for Preorder<'a> {
  type Item = &'a ManifestNode;

  fn next(&mut self) -> Option<Self::Item> {
    let node = self.stack.pop()?;
    self.stack.extend(node.children().iter().rev());
    Some(node)
  }
}

/// Errors raised while reading manifests.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// No manifest in a directory the walker was told to visit.
  #[error("manifest not found: {}", path.display())]
  NotFound { path: PathBuf },

  /// The manifest exists but could not be read.
  #[error("failed to read manifest {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The manifest is not valid JSON of the expected shape.
  #[error("failed to parse manifest {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// A module name appears twice in `kernelModules`.
  #[error("module '{0}' is declared more than once in kernelModules")]
  DuplicateModule(String),

  /// `kernelModules` is empty.
  #[error("no kernel modules declared in {}", path.display())]
  NoKernelModules { path: PathBuf },

  /// `kernelModules` lacks the module holding the linker scripts and the image.
  #[error("kernelModules in {} must include '{}'", path.display(), KERNEL_MODULE_DIR)]
  MissingKernelModule { path: PathBuf },

  #[error("invalid module name '{name}' in {}", path.display())]
  InvalidModuleName { path: PathBuf, name: String },

  /// A file or image name the script cannot carry as one word.
  #[error("invalid file name '{name}' in {}", path.display())]
  InvalidFileName { path: PathBuf, name: String },

  /// A `subdirs` entry that is not a single child directory name.
  #[error("invalid subdirectory '{name}' in {}: expected a single directory name", path.display())]
  InvalidSubdir { path: PathBuf, name: String },

  /// A subdirectory resolves to a directory already being walked.
  #[error("subdirectory cycle: {} is reached again while walking it", dir.display())]
  SubdirCycle { dir: PathBuf },
}
