//! kgen-lib: compiles kernel build manifests into build scripts.
//!
//! This crate turns a tree of per-directory `build.json` manifests into a
//! dependency-ordered, Make-compatible script:
//! - `manifest`: manifest types and the recursive tree walker
//! - `module`: one buildable unit flattened from its manifest tree
//! - `artifact`: canonical output path of every artifact
//! - `script`: rule document model and rule synthesis
//! - `generate`: the orchestrator tying the above together
//!
//! Generation never runs a build step; the emitted script is executed by an
//! external recipe engine.

pub mod artifact;
pub mod config;
pub mod consts;
pub mod generate;
pub mod graph;
pub mod manifest;
pub mod module;
pub mod platform;
pub mod script;
pub mod toolchain;
pub mod util;
