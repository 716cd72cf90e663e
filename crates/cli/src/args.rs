//! Configuration arguments shared by the generating subcommands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use kgen_lib::config::{BuildConfig, ManifestMode, OptLevel};
use kgen_lib::platform::arch::Arch;
use kgen_lib::platform::os::Os;
use kgen_lib::platform::{default_arch, default_toolchain_prefix};
use kgen_lib::toolchain::Toolchain;

#[derive(Debug, Args)]
pub struct ConfigArgs {
  /// Project root containing `src/build.json`
  #[arg(long, default_value = ".")]
  pub root: PathBuf,

  /// Target architecture: x86_64 or aarch64 (default: host architecture, else x86_64)
  #[arg(long)]
  pub arch: Option<Arch>,

  /// Optimization level
  #[arg(long = "opt", default_value_t = 3, value_parser = clap::value_parser!(u8).range(0..=3))]
  pub opt_level: u8,

  /// Toolchain binary prefix (default: <arch>-linux-gnu- on Linux, <arch>-elf- on macOS)
  #[arg(long = "pref", alias = "prefix")]
  pub prefix: Option<String>,

  /// Treat directories without a manifest as empty leaves
  #[arg(long)]
  pub lenient: bool,

  /// Don't look tools up on PATH; emit bare prefixed names
  #[arg(long)]
  pub skip_tool_check: bool,
}

impl ConfigArgs {
  pub fn arch(&self) -> Arch {
    self.arch.unwrap_or_else(default_arch)
  }

  pub fn prefix(&self) -> Result<String> {
    if let Some(prefix) = &self.prefix {
      return Ok(prefix.clone());
    }
    let os = Os::current().context("unsupported host OS; pass --pref explicitly")?;
    Ok(default_toolchain_prefix(self.arch(), os))
  }

  /// Build the generation config. Tools are located on PATH only when
  /// `locate_tools` is set and `--skip-tool-check` was not given.
  pub fn resolve(&self, locate_tools: bool) -> Result<BuildConfig> {
    let root = dunce::canonicalize(&self.root)
      .with_context(|| format!("Project root not found: {}", self.root.display()))?;
    let opt_level = OptLevel::try_from(self.opt_level)?;
    let prefix = self.prefix()?;

    let toolchain = if locate_tools && !self.skip_tool_check {
      Toolchain::locate(&prefix)?
    } else {
      Toolchain::with_prefix(&prefix)
    };
    debug!(?toolchain, "resolved toolchain");

    let mode = if self.lenient {
      ManifestMode::Lenient
    } else {
      ManifestMode::Strict
    };

    Ok(
      BuildConfig::new(root, self.arch(), toolchain)
        .with_opt_level(opt_level)
        .with_manifest_mode(mode),
    )
  }
}
