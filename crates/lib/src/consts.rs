//! Fixed names shared across the generator.

pub const APP_NAME: &str = "kgen";

/// Per-directory manifest file name.
pub const MANIFEST_FILENAME: &str = "build.json";

/// Default name of the emitted build script, written at the project root.
pub const SCRIPT_FILENAME: &str = "Makefile";

/// Source tree directory, relative to the project root.
pub const SRC_DIR: &str = "src";

/// Build output tree directory, relative to the project root.
pub const BUILD_DIR: &str = "build";

/// Crate root compiled for every module.
pub const CRATE_ROOT_FILE: &str = "lib.rs";

/// Marker file touched once a module's output directories exist.
pub const BUILD_DIRS_MARKER: &str = ".build_dirs";

/// Directory holding the linker scripts (under the source tree).
pub const KERNEL_MODULE_DIR: &str = "kernel";

pub const MODULE_LINKER_SCRIPT: &str = "module.lds";

pub const KERNEL_LINKER_SCRIPT: &str = "kernel.lds";

/// Kernel image name used when the top-level manifest does not set `imageName`.
pub const DEFAULT_IMAGE_NAME: &str = "kernel.ki";

/// Subdirectory name rewritten to `arch-<arch>` during the tree walk.
pub const ARCH_SUBDIR: &str = "arch";
