//! Implementation of the `kgen configure` command.
//!
//! Loads the project's manifests, generates the build script and replaces
//! the previous script atomically.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use kgen_lib::consts::SCRIPT_FILENAME;
use kgen_lib::generate::{Generator, write_script};

use crate::args::ConfigArgs;
use crate::output::{format_duration, print_stat, print_success};

pub fn cmd_configure(args: &ConfigArgs, output: Option<&Path>, no_run: bool, stdout: bool) -> Result<()> {
  let start = Instant::now();
  let config = args.resolve(true)?.with_run_rule(!no_run);

  let script_path = match output {
    Some(path) => path.to_path_buf(),
    None => config.root().join(SCRIPT_FILENAME),
  };

  let generator = Generator::load(config).context("Failed to load build manifests")?;
  let script = generator.script();

  if stdout {
    print!("{script}");
    return Ok(());
  }

  write_script(&script_path, &script.to_string())?;

  print_success(&format!("Wrote {}", script_path.display()));
  print_stat("Architecture", generator.config().arch.as_str());
  print_stat("Optimization", &generator.config().opt_level.to_string());
  print_stat("Modules", &generator.modules().len().to_string());
  print_stat("Rules", &script.rules().count().to_string());
  print_stat("Image", generator.image_name());
  print_stat("Time", &format_duration(start.elapsed()));

  Ok(())
}
