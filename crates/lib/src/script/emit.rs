//! Rule synthesis.
//!
//! Each module becomes a chain of rules whose prerequisites encode the
//! artifact pipeline:
//!
//! ```text
//! .build_dirs ─┬─> lib<m>.rlib ──> <m>.rust.o ─┐
//!              └─> <m>.asm.o ──────────────────┴─> <m>.mod ──> kernel image
//! ```
//!
//! The marker rule is the only rule that creates directories, and every
//! rule writing into a module's build tree depends on it (directly, or
//! through the library), so a parallel recipe engine cannot race directory
//! creation against file writes.

use std::path::Path;

use crate::artifact::{
  archive_member_name, assembly_object_path, build_dirs_marker_path, build_root, crate_root_path,
  intermediate_archive_name, kernel_image_path, kernel_linker_script, library_path, module_build_dir,
  module_image_path, module_linker_script, pretty_target, relocatable_object_path, script_path,
};
use crate::config::BuildConfig;
use crate::module::Module;

use super::types::Rule;

/// Linker flags for the final image: no startup runtime, 4 KiB page alignment.
const KERNEL_LINK_FLAGS: &str = "-nostdlib -z max-page-size=0x1000";

/// Synthesizes rules for one configuration.
#[derive(Debug, Clone, Copy)]
pub struct RuleEmitter<'a> {
  config: &'a BuildConfig,
}

impl<'a> RuleEmitter<'a> {
  pub fn new(config: &'a BuildConfig) -> Self {
    Self { config }
  }

  /// `all` (builds the image alias) and `clean` (removes the build tree).
  pub fn preamble(&self, image_name: &str) -> Vec<Rule> {
    vec![
      Rule::phony("all").prerequisite(image_name),
      Rule::phony("clean")
        .command("@echo \"Removing build dirs\"")
        .command(format!("@rm -rf {}", script_path(&build_root()))),
    ]
  }

  /// Every rule for `module`, in pipeline order.
  pub fn module_rules(&self, module: &Module) -> Vec<Rule> {
    let mut rules = vec![
      self.build_dirs_rule(module),
      self.compile_rule(module),
      self.extract_rule(module),
    ];
    rules.extend(self.assemble_rule(module));
    rules.push(self.module_link_rule(module));
    rules.push(self.module_alias_rule(module));
    rules
  }

  /// Creates the module's output directories, then touches the marker.
  pub fn build_dirs_rule(&self, module: &Module) -> Rule {
    let marker = script_path(&build_dirs_marker_path(module.name()));

    // A module whose root groups only empty children has no leaf directory,
    // but its artifacts still land in the module build dir.
    let dirs: Vec<String> = if module.output_dirs().is_empty() {
      vec![script_path(&module_build_dir(module.name()))]
    } else {
      module.output_dirs().iter().map(|dir| script_path(dir)).collect()
    };

    Rule::new(marker.clone())
      .command(format!("@echo \"Creating build dirs for '{}'\"", module.name()))
      .command(format!("@mkdir -p {}", dirs.join(" ")))
      .command(format!("@touch {marker}"))
  }

  /// Compiles the crate root into the module library.
  pub fn compile_rule(&self, module: &Module) -> Rule {
    let name = module.name();
    let target = library_path(name);
    let arch = self.config.arch;

    let mut command = vec![
      tool(&self.config.toolchain.compiler),
      format!("--crate-name {name}"),
      "--crate-type rlib".to_string(),
      format!("--target {}", arch.target_triple()),
      format!("-C opt-level={}", self.config.opt_level),
      "-C panic=abort".to_string(),
      format!("--cfg {}", arch.cfg_flag()),
      "--sysroot /dev/null".to_string(),
    ];
    command.extend(module.compiler_args().iter().cloned());
    command.extend(
      module
        .dependencies()
        .iter()
        .map(|dep| format!("-L {}", script_path(&module_build_dir(dep)))),
    );
    command.push(script_path(&crate_root_path(name)));
    command.push(format!("-o {}", script_path(&target)));

    Rule::new(script_path(&target))
      .prerequisite(script_path(&build_dirs_marker_path(name)))
      .prerequisites(module.dependencies().iter().map(|dep| script_path(&library_path(dep))))
      .prerequisites(module.compiled_files().iter().map(|file| script_path(file)))
      .command(echo_creating(&target))
      .command(format!("@{}", command.join(" ")))
  }

  /// Turns the library into one relocatable object: convert to a plain
  /// archive, extract its single member, move it into place and drop the
  /// intermediate archive.
  pub fn extract_rule(&self, module: &Module) -> Rule {
    let name = module.name();
    let source = library_path(name);
    let target = relocatable_object_path(name);
    let build_dir = module_build_dir(name);
    let archive = intermediate_archive_name(name);
    let member = archive_member_name(name);
    let tools = &self.config.toolchain;

    Rule::new(script_path(&target))
      .prerequisite(script_path(&source))
      .command(echo_creating(&target))
      .command(format!(
        "@{} {} {} 2> /dev/null",
        tool(&tools.objcopy),
        script_path(&source),
        script_path(&build_dir.join(&archive))
      ))
      .command(format!(
        "@cd {} && {} -x {archive} {member}",
        script_path(&build_dir),
        tool(&tools.archiver)
      ))
      .command(format!(
        "@mv {} {}",
        script_path(&build_dir.join(&member)),
        script_path(&target)
      ))
      .command(format!("@rm {}", script_path(&build_dir.join(&archive))))
  }

  /// Assembles all assembly sources, in order, with one invocation. `None`
  /// for modules without assembly.
  pub fn assemble_rule(&self, module: &Module) -> Option<Rule> {
    if !module.has_assembly() {
      return None;
    }

    let target = assembly_object_path(module.name());
    let sources: Vec<String> = module.asm_files().iter().map(|file| script_path(file)).collect();

    Some(
      Rule::new(script_path(&target))
        .prerequisite(script_path(&build_dirs_marker_path(module.name())))
        .prerequisites(sources.iter().cloned())
        .command(echo_creating(&target))
        .command(format!(
          "@{} {} -o {}",
          tool(&self.config.toolchain.assembler),
          sources.join(" "),
          script_path(&target)
        )),
    )
  }

  /// Links the module's objects into a relocatable module image.
  pub fn module_link_rule(&self, module: &Module) -> Rule {
    let name = module.name();
    let target = module_image_path(name);

    let mut objects = Vec::new();
    if module.has_assembly() {
      objects.push(script_path(&assembly_object_path(name)));
    }
    objects.push(script_path(&relocatable_object_path(name)));

    Rule::new(script_path(&target))
      .prerequisites(objects.iter().cloned())
      .command(echo_creating(&target))
      .command(format!(
        "@{} -r -T {} {} -o {}",
        tool(&self.config.toolchain.linker),
        script_path(&module_linker_script()),
        objects.join(" "),
        script_path(&target)
      ))
  }

  /// `<name>.mod` shorthand for building one module.
  pub fn module_alias_rule(&self, module: &Module) -> Rule {
    Rule::phony(format!("{}.mod", module.name())).prerequisite(script_path(&module_image_path(module.name())))
  }

  /// Links every module image, in declaration order, into the kernel image.
  pub fn kernel_link_rule(&self, modules: &[Module], image_name: &str) -> Rule {
    let target = kernel_image_path(image_name);
    let images: Vec<String> = modules
      .iter()
      .map(|module| script_path(&module_image_path(module.name())))
      .collect();

    Rule::new(script_path(&target))
      .prerequisites(images.iter().cloned())
      .command(echo_creating(&target))
      .command(format!(
        "@{} {KERNEL_LINK_FLAGS} -T {} {} -o {}",
        tool(&self.config.toolchain.linker),
        script_path(&kernel_linker_script(self.config.arch)),
        images.join(" "),
        script_path(&target)
      ))
  }

  /// `<image name>` shorthand for the kernel image, the target of `all`.
  pub fn kernel_alias_rule(&self, image_name: &str) -> Rule {
    Rule::phony(image_name).prerequisite(script_path(&kernel_image_path(image_name)))
  }

  /// Boots the image in the architecture's emulator, if enabled.
  pub fn run_rule(&self, image_name: &str) -> Option<Rule> {
    if !self.config.run_rule {
      return None;
    }

    let arch = self.config.arch;
    let image = script_path(&kernel_image_path(image_name));
    Some(Rule::phony("run").prerequisite(image.clone()).command(format!(
      "@{} {} -kernel {image}",
      arch.emulator(),
      arch.emulator_flags().join(" ")
    )))
  }
}

fn tool(path: &Path) -> String {
  path.display().to_string()
}

fn echo_creating(target: &Path) -> String {
  format!("@echo \"Creating '{}'\"", pretty_target(target))
}
