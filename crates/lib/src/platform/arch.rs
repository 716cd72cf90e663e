use std::fmt;
use std::str::FromStr;

use crate::consts::ARCH_SUBDIR;

/// Target architectures a kernel can be generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
  X86_64,
  Aarch64,
}

impl Arch {
  pub const ALL: [Arch; 2] = [Arch::X86_64, Arch::Aarch64];

  /// Detect the host CPU architecture at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86_64" => Some(Self::X86_64),
      "aarch64" => Some(Self::Aarch64),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::Aarch64 => "aarch64",
    }
  }

  /// Compiler target triple for kernel code.
  pub fn target_triple(&self) -> String {
    format!("{}-unknown-linux-gnu", self.as_str())
  }

  /// Name of the conditional-compilation flag set for this architecture.
  pub fn cfg_flag(&self) -> String {
    format!("arch_{}", self.as_str())
  }

  /// Directory an `arch` manifest subdirectory is rewritten to.
  pub fn subdir(&self) -> String {
    format!("{}-{}", ARCH_SUBDIR, self.as_str())
  }

  /// Emulator binary used by the run rule.
  pub fn emulator(&self) -> String {
    format!("qemu-system-{}", self.as_str())
  }

  /// Emulator flags placed before `-kernel <image>`.
  pub fn emulator_flags(&self) -> &'static [&'static str] {
    match self {
      Self::X86_64 => &["-serial", "stdio", "-display", "none"],
      Self::Aarch64 => &["-machine", "virt", "-cpu", "cortex-a57", "-nographic"],
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Error returned when parsing an unknown architecture name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported architecture '{0}' (expected one of: x86_64, aarch64)")]
pub struct UnknownArch(pub String);

impl FromStr for Arch {
  type Err = UnknownArch;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|arch| arch.as_str() == s)
      .ok_or_else(|| UnknownArch(s.to_string()))
  }
}

/// Returns the host CPU architecture
///
/// Returns `None` if the architecture is not supported
pub fn arch() -> Option<Arch> {
  Arch::current()
}
