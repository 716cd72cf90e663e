//! Recursive manifest loading.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use crate::artifact::src_root;
use crate::config::{BuildConfig, ManifestMode};
use crate::consts::{ARCH_SUBDIR, MANIFEST_FILENAME};
use crate::platform::arch::Arch;

use super::types::{ManifestError, ManifestFile, ManifestNode, SourceSet, TopManifest};

/// Loads manifest trees below a project root.
///
/// Reads manifest files and nothing else; directories are reported
/// root-relative so the results do not depend on where the project lives.
#[derive(Debug, Clone)]
pub struct ManifestWalker {
  root: PathBuf,
  arch: Arch,
  mode: ManifestMode,
}

impl ManifestWalker {
  pub fn new(root: impl Into<PathBuf>, arch: Arch, mode: ManifestMode) -> Self {
    Self {
      root: root.into(),
      arch,
      mode,
    }
  }

  pub fn from_config(config: &BuildConfig) -> Self {
    Self::new(&config.root, config.arch, config.manifest_mode)
  }

  /// Read the top-level manifest at `src/build.json`.
  ///
  /// Always strict: without it there is nothing to generate.
  pub fn load_top(&self) -> Result<TopManifest, ManifestError> {
    let path = self.manifest_path(&src_root());
    let top: TopManifest = read_json(&path)?.ok_or_else(|| ManifestError::NotFound { path: path.clone() })?;
    top.validate(&path)?;
    Ok(top)
  }

  /// Load the manifest in `dir` (root-relative) and every declared child.
  ///
  /// A child named `arch` is visited as `arch-<target arch>`.
  pub fn load(&self, dir: &Path) -> Result<ManifestNode, ManifestError> {
    self.load_tree(dir, &mut Vec::new())
  }

  /// `ancestors` holds the canonical directories on the current walk path;
  /// meeting one again (through a symlink) is a cycle.
  fn load_tree(&self, dir: &Path, ancestors: &mut Vec<PathBuf>) -> Result<ManifestNode, ManifestError> {
    let canonical = fs::canonicalize(self.root.join(dir)).ok();
    if let Some(real) = &canonical {
      if ancestors.contains(real) {
        return Err(ManifestError::SubdirCycle { dir: dir.to_path_buf() });
      }
      ancestors.push(real.clone());
    }

    let node = self.load_node(dir, ancestors);

    if canonical.is_some() {
      ancestors.pop();
    }
    node
  }

  fn load_node(&self, dir: &Path, ancestors: &mut Vec<PathBuf>) -> Result<ManifestNode, ManifestError> {
    let path = self.manifest_path(dir);
    let file = match read_json::<ManifestFile>(&path)? {
      Some(file) => file,
      None if self.mode == ManifestMode::Lenient => {
        warn!(path = %path.display(), "manifest missing, treating directory as empty leaf");
        ManifestFile::default()
      }
      None => return Err(ManifestError::NotFound { path }),
    };
    file.validate(&path)?;

    debug!(dir = %dir.display(), leaf = file.subdirs.is_none(), "loaded manifest");

    let sources = SourceSet::from_manifest(dir, &file);
    let Some(subdirs) = file.subdirs else {
      return Ok(ManifestNode::Leaf {
        dir: dir.to_path_buf(),
        sources,
      });
    };

    let children = subdirs
      .iter()
      .map(|name| self.load_tree(&dir.join(self.resolve_subdir(name)), ancestors))
      .collect::<Result<Vec<_>, _>>()?;

    Ok(ManifestNode::Group {
      dir: dir.to_path_buf(),
      sources,
      children,
    })
  }

  fn resolve_subdir(&self, name: &str) -> String {
    if name == ARCH_SUBDIR {
      let resolved = self.arch.subdir();
      trace!(from = name, to = %resolved, "substituted arch subdirectory");
      resolved
    } else {
      name.to_string()
    }
  }

  fn manifest_path(&self, dir: &Path) -> PathBuf {
    self.root.join(dir).join(MANIFEST_FILENAME)
  }
}

/// Parse a JSON file, returning `Ok(None)` if it does not exist.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ManifestError> {
  let content = match fs::read_to_string(path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
    Err(source) => {
      return Err(ManifestError::Read {
        path: path.to_path_buf(),
        source,
      });
    }
  };

  serde_json::from_str(&content).map(Some).map_err(|source| ManifestError::Parse {
    path: path.to_path_buf(),
    source,
  })
}
