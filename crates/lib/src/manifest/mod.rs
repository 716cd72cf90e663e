//! Per-directory build manifests.
//!
//! Every source directory carries a `build.json` describing its sources and
//! (optionally) its child directories. The walker reads a module's tree of
//! manifests into a typed [`ManifestNode`] tree, which the module model then
//! flattens.

mod types;
mod walk;

pub use types::*;
pub use walk::ManifestWalker;
