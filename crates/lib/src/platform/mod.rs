pub mod arch;
pub mod os;

use arch::Arch;
use os::Os;
use std::fmt;

/// Host platform identifier combining architecture and OS (e.g., "x86_64-linux")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
  pub arch: Arch,
  pub os: Os,
}

impl Platform {
  /// Create a new platform identifier
  pub fn new(arch: Arch, os: Os) -> Self {
    Self { arch, os }
  }

  /// Detect the host platform at runtime
  ///
  /// Returns `None` if the OS or architecture is not supported
  pub fn current() -> Option<Self> {
    Some(Self {
      arch: Arch::current()?,
      os: Os::current()?,
    })
  }

  /// Returns the platform triple string (e.g., "aarch64-darwin")
  pub fn triple(&self) -> String {
    format!("{}-{}", self.arch, self.os)
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.triple())
  }
}

/// Returns the platform triple for the host (e.g., "aarch64-darwin")
///
/// Returns `None` if the host platform is not supported
pub fn platform_triple() -> Option<String> {
  Platform::current().map(|p| p.triple())
}

/// Architecture to target when none is requested: the host's, else x86_64.
pub fn default_arch() -> Arch {
  Arch::current().unwrap_or(Arch::X86_64)
}

/// Cross-toolchain binary prefix for `target` when built on `host`.
pub fn default_toolchain_prefix(target: Arch, host: Os) -> String {
  format!("{}{}", target, host.binutils_infix())
}
