//! The module model.
//!
//! A [`Module`] is one independently compiled unit: its manifest tree
//! flattened into ordered source lists, a dependency set and the set of
//! output directories its leaves require. Modules are immutable once built.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::artifact::{build_dir, module_source_dir};
use crate::manifest::{ManifestError, ManifestNode, ManifestWalker};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
  name: String,
  asm_files: Vec<PathBuf>,
  compiled_files: Vec<PathBuf>,
  dependencies: BTreeSet<String>,
  output_dirs: BTreeSet<PathBuf>,
  compiler_args: Vec<String>,
}

impl Module {
  /// Walk the manifest tree rooted at `src/<name>` and build the module.
  pub fn load(name: &str, walker: &ManifestWalker) -> Result<Self, ManifestError> {
    let tree = walker.load(&module_source_dir(name))?;
    let module = Self::from_tree(name, &tree);
    debug!(
      module = name,
      asm = module.asm_files.len(),
      compiled = module.compiled_files.len(),
      dependencies = module.dependencies.len(),
      "loaded module"
    );
    Ok(module)
  }

  /// Flatten a walked tree in pre-order. Dependencies are collapsed into a
  /// set; every leaf contributes its mirrored build directory.
  pub fn from_tree(name: impl Into<String>, tree: &ManifestNode) -> Self {
    let mut module = Self {
      name: name.into(),
      asm_files: Vec::new(),
      compiled_files: Vec::new(),
      dependencies: BTreeSet::new(),
      output_dirs: BTreeSet::new(),
      compiler_args: Vec::new(),
    };

    for node in tree.iter() {
      let sources = node.sources();
      module.asm_files.extend(sources.asm_files.iter().cloned());
      module.compiled_files.extend(sources.compiled_files.iter().cloned());
      module.dependencies.extend(sources.dependencies.iter().cloned());
      module.compiler_args.extend(sources.compiler_args.iter().cloned());

      if node.is_leaf() {
        module.output_dirs.insert(build_dir(node.dir()));
      }
    }

    module
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn asm_files(&self) -> &[PathBuf] {
    &self.asm_files
  }

  pub fn compiled_files(&self) -> &[PathBuf] {
    &self.compiled_files
  }

  pub fn dependencies(&self) -> &BTreeSet<String> {
    &self.dependencies
  }

  pub fn output_dirs(&self) -> &BTreeSet<PathBuf> {
    &self.output_dirs
  }

  pub fn compiler_args(&self) -> &[String] {
    &self.compiler_args
  }

  pub fn has_assembly(&self) -> bool {
    !self.asm_files.is_empty()
  }

  /// Whether `dir` is one of the module's output directories.
  pub fn owns_output_dir(&self, dir: &Path) -> bool {
    self.output_dirs.contains(dir)
  }
}
