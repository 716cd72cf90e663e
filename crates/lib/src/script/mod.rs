//! Build-script document model and rule synthesis.

mod emit;
mod types;

pub use emit::RuleEmitter;
pub use types::*;
