//! Implementation of the `kgen modules` command.
//!
//! Shows what generation would build: each declared module with its
//! dependencies, dependents and source counts.

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use kgen_lib::artifact::script_path;
use kgen_lib::generate::Generator;
use kgen_lib::module::Module;

use crate::args::ConfigArgs;
use crate::output::{print_info, print_json, symbols};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ModulesOutput {
  arch: String,
  image_name: String,
  modules: Vec<ModuleSummary>,
  build_order: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ModuleSummary {
  name: String,
  dependencies: Vec<String>,
  dependents: Vec<String>,
  asm_files: usize,
  compiled_files: usize,
  output_dirs: Vec<String>,
}

impl ModuleSummary {
  fn new(module: &Module, generator: &Generator) -> Self {
    Self {
      name: module.name().to_string(),
      dependencies: module.dependencies().iter().cloned().collect(),
      dependents: generator.graph().dependents(module.name()),
      asm_files: module.asm_files().len(),
      compiled_files: module.compiled_files().len(),
      output_dirs: module.output_dirs().iter().map(|d| script_path(d)).collect(),
    }
  }
}

pub fn cmd_modules(args: &ConfigArgs, json: bool) -> Result<()> {
  let config = args.resolve(false)?;
  let generator = Generator::load(config).context("Failed to load build manifests")?;

  let output = ModulesOutput {
    arch: generator.config().arch.to_string(),
    image_name: generator.image_name().to_string(),
    modules: generator
      .modules()
      .iter()
      .map(|m| ModuleSummary::new(m, &generator))
      .collect(),
    build_order: generator.graph().build_order(),
  };

  if json {
    return print_json(&output);
  }

  print_info(&format!(
    "{} module(s) for {} {} {}",
    output.modules.len(),
    output.arch,
    symbols::ARROW,
    output.image_name
  ));
  for module in &output.modules {
    println!();
    println!("  {}", module.name.if_supports_color(Stream::Stdout, |s| s.bold()));
    if !module.dependencies.is_empty() {
      println!("    depends on: {}", module.dependencies.join(", "));
    }
    if !module.dependents.is_empty() {
      println!("    needed by:  {}", module.dependents.join(", "));
    }
    println!(
      "    sources:    {} compiled, {} assembly",
      module.compiled_files, module.asm_files
    );
  }
  println!();
  println!("Build order: {}", output.build_order.join(" "));

  Ok(())
}
