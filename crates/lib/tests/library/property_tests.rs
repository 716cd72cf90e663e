//! Structural properties of emitted scripts.

use kgen_lib::artifact::{assembly_object_path, build_dirs_marker_path, module_image_path, script_path};
use kgen_lib::generate::Generator;
use kgen_lib::platform::arch::Arch;
use kgen_lib::script::Script;

use super::common::Project;

/// Three modules with a diamond-free chain, nested grouping nodes and an
/// empty leaf.
fn layered_project() -> Project {
  let project = Project::new();
  project.manifest("src", r#"{ "kernelModules": ["core", "mm", "kernel"] }"#);
  project.manifest("src/core", r#"{ "rustFiles": ["lib.rs"] }"#);
  project.manifest(
    "src/mm",
    r#"{ "rustFiles": ["lib.rs"], "dependencies": ["core"], "subdirs": ["paging", "heap"] }"#,
  );
  project.manifest("src/mm/paging", r#"{ "rustFiles": ["table.rs"], "dependencies": ["core"] }"#);
  project.manifest("src/mm/heap", "{}");
  project.manifest(
    "src/kernel",
    r#"{ "rustFiles": ["lib.rs"], "dependencies": ["mm", "core"], "subdirs": ["arch"] }"#,
  );
  project.manifest(
    "src/kernel/arch-x86_64",
    r#"{ "asmFiles": ["boot.s", "isr.s"], "rustFiles": ["boot.rs"] }"#,
  );
  project
}

fn generate(project: &Project) -> (Generator, Script) {
  let generator = Generator::load(project.config(Arch::X86_64)).unwrap();
  let script = generator.script();
  (generator, script)
}

#[test]
fn marker_rules_are_prerequisite_free_and_precede_their_users() {
  let project = layered_project();
  let (generator, script) = generate(&project);

  for module in generator.modules() {
    let marker = script_path(&build_dirs_marker_path(module.name()));
    let marker_pos = script.position(&marker).unwrap();
    assert!(script.rule(&marker).unwrap().prerequisites.is_empty());

    let dirs: Vec<String> = module.output_dirs().iter().map(|d| script_path(d)).collect();
    for (pos, rule) in script.rules().enumerate() {
      let writes_into_dir = dirs
        .iter()
        .any(|dir| rule.target.starts_with(&format!("{dir}/")) && rule.target != marker);
      let references_dir = rule.prerequisites.iter().any(|p| dirs.iter().any(|dir| p.starts_with(dir.as_str())));
      if writes_into_dir || references_dir {
        assert!(marker_pos < pos, "{} emitted before {marker}", rule.target);
      }
    }
  }
}

#[test]
fn empty_leaf_gets_an_output_directory() {
  let project = layered_project();
  let (_, script) = generate(&project);

  let marker = script.rule("build/src/mm/.build_dirs").unwrap();
  assert_eq!(marker.recipe[1], "@mkdir -p build/src/mm/heap build/src/mm/paging");
}

#[test]
fn kernel_link_lists_every_module_image_once_in_order() {
  let project = layered_project();
  let (generator, script) = generate(&project);

  let expected: Vec<String> = generator
    .modules()
    .iter()
    .map(|m| script_path(&module_image_path(m.name())))
    .collect();
  let rule = script.rule("build/src/kernel/kernel.ki").unwrap();

  assert_eq!(rule.prerequisites, expected);
  assert_eq!(
    rule.prerequisites,
    vec!["build/src/core/core.mod", "build/src/mm/mm.mod", "build/src/kernel/kernel.mod"]
  );
}

#[test]
fn modules_without_assembly_never_reference_an_assembly_object() {
  let project = layered_project();
  let (generator, script) = generate(&project);

  for module in generator.modules().iter().filter(|m| !m.has_assembly()) {
    let asm = script_path(&assembly_object_path(module.name()));
    assert!(script.rule(&asm).is_none());
    assert!(script.rules().all(|r| !r.has_prerequisite(&asm)));
  }

  let kernel_link = script.rule("build/src/kernel/kernel.mod").unwrap();
  assert!(kernel_link.has_prerequisite("build/src/kernel/kernel.asm.o"));
}

#[test]
fn collapsed_dependencies_appear_once() {
  let project = layered_project();
  let (_, script) = generate(&project);

  let mm = script.rule("build/src/mm/libmm.rlib").unwrap();
  let core_refs = mm
    .prerequisites
    .iter()
    .filter(|p| p.as_str() == "build/src/core/libcore.rlib")
    .count();
  assert_eq!(core_refs, 1);
  assert_eq!(mm.recipe[1].matches("-L build/src/core").count(), 1);
}

#[test]
fn generation_is_idempotent() {
  let project = layered_project();

  let first = Generator::load(project.config(Arch::X86_64)).unwrap().render();
  let second = Generator::load(project.config(Arch::X86_64)).unwrap().render();
  assert_eq!(first, second);
}

#[test]
fn assembly_order_is_preserved() {
  let project = layered_project();
  let (_, script) = generate(&project);

  let rule = script.rule("build/src/kernel/kernel.asm.o").unwrap();
  assert!(
    rule.recipe[1].contains("src/kernel/arch-x86_64/boot.s src/kernel/arch-x86_64/isr.s -o"),
    "{}",
    rule.recipe[1]
  );
}
