//! Generation scenarios.

use std::fs;

use kgen_lib::generate::{GenerateError, Generator, configure};
use kgen_lib::graph::GraphError;
use kgen_lib::manifest::ManifestError;
use kgen_lib::platform::arch::Arch;

use super::common::Project;

#[test]
fn core_kernel_example() {
  let project = Project::core_kernel();
  let script = project.script(Arch::X86_64).unwrap();

  let core_compile = script.rule("build/src/core/libcore.rlib").unwrap();
  assert_eq!(
    core_compile.prerequisites,
    vec!["build/src/core/.build_dirs", "src/core/lib.rs", "src/core/option.rs"]
  );

  let kernel_compile = script.rule("build/src/kernel/libkernel.rlib").unwrap();
  assert!(kernel_compile.has_prerequisite("build/src/core/libcore.rlib"));
  assert!(kernel_compile.recipe[1].contains("-L build/src/core "));

  let kernel_link = script.rule("build/src/kernel/kernel.mod").unwrap();
  assert!(kernel_link.has_prerequisite("build/src/kernel/kernel.rust.o"));
  assert!(kernel_link.has_prerequisite("build/src/kernel/kernel.asm.o"));

  let image = script.rule("build/src/kernel/kernel.ki").unwrap();
  assert_eq!(
    image.prerequisites,
    vec!["build/src/core/core.mod", "build/src/kernel/kernel.mod"]
  );
}

#[test]
fn arch_subdirectory_follows_target() {
  let project = Project::core_kernel();
  let script = project.script(Arch::Aarch64).unwrap();

  let assemble = script.rule("build/src/kernel/kernel.asm.o").unwrap();
  assert!(assemble.has_prerequisite("src/kernel/arch-aarch64/boot.s"));
  assert!(!assemble.has_prerequisite("src/kernel/arch-x86_64/boot.s"));

  let marker = script.rule("build/src/kernel/.build_dirs").unwrap();
  assert_eq!(marker.recipe[1], "@mkdir -p build/src/kernel/arch-aarch64");

  let kernel = script.rule("build/src/kernel/kernel.ki").unwrap();
  assert!(kernel.recipe[1].contains("-T src/kernel/arch-aarch64/kernel.lds"));
}

#[test]
fn two_architectures_in_one_process_do_not_interfere() {
  let project = Project::core_kernel();

  let x86 = project.script(Arch::X86_64).unwrap().to_string();
  let arm = project.script(Arch::Aarch64).unwrap().to_string();
  let x86_again = project.script(Arch::X86_64).unwrap().to_string();

  assert_eq!(x86, x86_again);
  assert!(x86.contains("arch-x86_64"));
  assert!(!x86.contains("arch-aarch64"));
  assert!(arm.contains("arch-aarch64"));
  assert!(!arm.contains("arch-x86_64"));
}

#[test]
fn unresolved_dependency_fails_without_writing() {
  let project = Project::core_kernel();
  project.manifest(
    "src/kernel",
    r#"{ "rustFiles": ["lib.rs"], "dependencies": ["core", "net"], "subdirs": ["arch"] }"#,
  );

  let err = configure(project.config(Arch::X86_64), &project.output()).unwrap_err();

  match err {
    GenerateError::Graph(GraphError::UnresolvedDependency { module, dependency }) => {
      assert_eq!(module, "kernel");
      assert_eq!(dependency, "net");
    }
    other => panic!("unexpected error: {other}"),
  }
  assert!(!project.output().exists());
}

#[test]
fn failed_generation_keeps_previous_script() {
  let project = Project::core_kernel();
  configure(project.config(Arch::X86_64), &project.output()).unwrap();
  let before = fs::read_to_string(project.output()).unwrap();

  project.manifest("src/core", "{ broken");
  let err = configure(project.config(Arch::X86_64), &project.output()).unwrap_err();

  assert!(matches!(err, GenerateError::Manifest(ManifestError::Parse { .. })));
  assert_eq!(fs::read_to_string(project.output()).unwrap(), before);
}

#[test]
fn dependency_cycle_is_rejected() {
  let project = Project::new();
  project.manifest("src", r#"{ "kernelModules": ["a", "b", "kernel"] }"#);
  project.manifest("src/a", r#"{ "rustFiles": ["lib.rs"], "dependencies": ["b"] }"#);
  project.manifest("src/b", r#"{ "rustFiles": ["lib.rs"], "dependencies": ["a"] }"#);
  project.manifest("src/kernel", r#"{ "rustFiles": ["lib.rs"], "dependencies": ["a"] }"#);

  let err = Generator::load(project.config(Arch::X86_64)).unwrap_err();
  assert!(matches!(err, GenerateError::Graph(GraphError::Cycle(_))));
}

#[test]
fn missing_arch_manifest_depends_on_mode() {
  let project = Project::new();
  project.manifest("src", r#"{ "kernelModules": ["kernel"] }"#);
  project.manifest("src/kernel", r#"{ "rustFiles": ["lib.rs"], "subdirs": ["arch"] }"#);

  let strict = Generator::load(project.config(Arch::Aarch64)).unwrap_err();
  assert!(matches!(strict, GenerateError::Manifest(ManifestError::NotFound { .. })));

  let lenient = Generator::load(project.lenient_config(Arch::Aarch64)).unwrap();
  let module = &lenient.modules()[0];
  assert_eq!(module.output_dirs().len(), 1);
  assert!(!module.has_assembly());
}

#[test]
fn duplicate_kernel_module_is_rejected() {
  let project = Project::core_kernel();
  project.manifest("src", r#"{ "kernelModules": ["core", "kernel", "core"] }"#);

  let err = project.script(Arch::X86_64).unwrap_err();
  assert!(matches!(
    err,
    GenerateError::Manifest(ManifestError::DuplicateModule(ref name)) if name == "core"
  ));
}

#[test]
fn configure_writes_rendered_script() {
  let project = Project::core_kernel();
  let result = configure(project.config(Arch::X86_64), &project.output()).unwrap();

  let written = fs::read_to_string(&result.script_path).unwrap();
  let expected = project.script(Arch::X86_64).unwrap().to_string();
  assert_eq!(written, expected);
  assert!(written.contains("\nclean:\n\t@echo \"Removing build dirs\"\n\t@rm -rf build\n"));
  assert!(written.contains("\n.PHONY: run\nrun: build/src/kernel/kernel.ki\n"));
}

#[test]
fn project_without_kernel_module_fails_without_writing() {
  let project = Project::new();
  project.manifest("src", r#"{ "kernelModules": ["core"] }"#);
  project.manifest("src/core", r#"{ "rustFiles": ["lib.rs"] }"#);

  let err = configure(project.config(Arch::X86_64), &project.output()).unwrap_err();

  assert!(matches!(err, GenerateError::Manifest(ManifestError::MissingKernelModule { .. })));
  assert!(!project.output().exists());
}

#[test]
fn self_referencing_subdir_fails_instead_of_recursing() {
  let project = Project::core_kernel();
  project.manifest("src/core", r#"{ "rustFiles": ["lib.rs"], "subdirs": ["."] }"#);

  let err = Generator::load(project.config(Arch::X86_64)).unwrap_err();
  assert!(matches!(
    err,
    GenerateError::Manifest(ManifestError::InvalidSubdir { name, .. }) if name == "."
  ));
}

#[test]
fn every_output_directory_is_created_by_some_marker_rule() {
  let project = Project::core_kernel();
  let script = project.script(Arch::X86_64).unwrap();

  let created: Vec<&str> = script
    .rules()
    .filter(|rule| rule.target.ends_with("/.build_dirs"))
    .flat_map(|rule| rule.recipe.iter())
    .filter_map(|line| line.strip_prefix("@mkdir -p "))
    .flat_map(|dirs| dirs.split(' '))
    .collect();

  let image = script.rule("build/src/kernel/kernel.ki").unwrap();
  let image_dir = image.target.rsplit_once('/').unwrap().0;
  // `mkdir -p` also creates every parent of a listed directory.
  let covered = created
    .iter()
    .any(|dir| *dir == image_dir || dir.starts_with(&format!("{image_dir}/")));
  assert!(covered, "{image_dir} not created by {created:?}");
}
