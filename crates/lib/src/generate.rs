//! Build-script generation.
//!
//! [`Generator::load`] reads the top-level manifest, builds one [`Module`]
//! per declared kernel module and validates the dependency graph. Any error
//! surfaces there, before rule text exists. [`Generator::script`] then emits
//! the complete script, and [`write_script`] replaces the output file
//! atomically so a failed run never leaves a partial script behind.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::BuildConfig;
use crate::consts::APP_NAME;
use crate::graph::{GraphError, ModuleGraph};
use crate::manifest::{ManifestError, ManifestWalker, TopManifest};
use crate::module::Module;
use crate::script::{RuleEmitter, Script};

/// Errors that abort generation.
#[derive(Debug, Error)]
pub enum GenerateError {
  #[error(transparent)]
  Manifest(#[from] ManifestError),

  #[error(transparent)]
  Graph(#[from] GraphError),

  /// The script could not be written.
  #[error("failed to write build script {}: {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Summary of a successful [`configure`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureResult {
  pub script_path: PathBuf,
  pub module_count: usize,
  pub rule_count: usize,
}

/// Loaded and validated input for one generation run.
#[derive(Debug)]
pub struct Generator {
  config: BuildConfig,
  top: TopManifest,
  modules: Vec<Module>,
  graph: ModuleGraph,
}

impl Generator {
  /// Load every declared module and validate their dependencies.
  pub fn load(config: BuildConfig) -> Result<Self, GenerateError> {
    let walker = ManifestWalker::from_config(&config);
    let top = walker.load_top()?;

    let modules = top
      .kernel_modules
      .iter()
      .map(|name| Module::load(name, &walker))
      .collect::<Result<Vec<_>, _>>()?;

    let graph = ModuleGraph::new(&modules)?;

    info!(
      modules = modules.len(),
      arch = %config.arch,
      opt_level = %config.opt_level,
      "loaded kernel modules"
    );

    Ok(Self {
      config,
      top,
      modules,
      graph,
    })
  }

  pub fn config(&self) -> &BuildConfig {
    &self.config
  }

  /// Modules in declaration (link) order.
  pub fn modules(&self) -> &[Module] {
    &self.modules
  }

  pub fn graph(&self) -> &ModuleGraph {
    &self.graph
  }

  pub fn image_name(&self) -> &str {
    self.top.image_name()
  }

  /// Emit the complete script: `all` and `clean`, one rule group per
  /// module in declaration order, the kernel link, and the optional run rule.
  pub fn script(&self) -> Script {
    let emitter = RuleEmitter::new(&self.config);
    let image_name = self.image_name();

    let mut script = Script::new(format!("Generated by {APP_NAME}, do not modify"));
    script.extend(emitter.preamble(image_name));

    for module in &self.modules {
      debug!(module = module.name(), "emitting module rules");
      script.comment(format!("Module: {}", module.name()));
      script.extend(emitter.module_rules(module));
    }

    script.comment("Kernel");
    script.push(emitter.kernel_link_rule(&self.modules, image_name));
    script.push(emitter.kernel_alias_rule(image_name));
    script.extend(emitter.run_rule(image_name));

    script
  }

  /// Rendered script text.
  pub fn render(&self) -> String {
    self.script().to_string()
  }
}

/// Mode of a newly created script, before the umask.
#[cfg(unix)]
const SCRIPT_MODE: u32 = 0o644;

/// Write `contents` to `path` atomically: the text goes to a temporary file
/// in the same directory, which is then renamed over the destination.
///
/// A new script is created readable by everyone (subject to the umask); an
/// existing script keeps its permissions.
pub fn write_script(path: &Path, contents: &str) -> Result<(), GenerateError> {
  let write_err = |source: io::Error| GenerateError::Write {
    path: path.to_path_buf(),
    source,
  };

  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };

  let mut temp = script_builder().tempfile_in(dir).map_err(write_err)?;
  temp.write_all(contents.as_bytes()).map_err(write_err)?;
  temp.flush().map_err(write_err)?;

  if let Ok(existing) = fs::metadata(path) {
    temp.as_file().set_permissions(existing.permissions()).map_err(write_err)?;
  }
  temp.persist(path).map_err(|e| write_err(e.error))?;

  Ok(())
}

#[cfg(unix)]
fn script_builder() -> Builder<'static, 'static> {
  use std::os::unix::fs::PermissionsExt;

  let mut builder = Builder::new();
  builder.permissions(fs::Permissions::from_mode(SCRIPT_MODE));
  builder
}

#[cfg(not(unix))]
fn script_builder() -> Builder<'static, 'static> {
  Builder::new()
}

/// Load, generate and write the script to `output` in one step.
pub fn configure(config: BuildConfig, output: &Path) -> Result<ConfigureResult, GenerateError> {
  let generator = Generator::load(config)?;
  let script = generator.script();
  write_script(output, &script.to_string())?;

  let result = ConfigureResult {
    script_path: output.to_path_buf(),
    module_count: generator.modules().len(),
    rule_count: script.rules().count(),
  };
  info!(path = %output.display(), rules = result.rule_count, "wrote build script");

  Ok(result)
}
