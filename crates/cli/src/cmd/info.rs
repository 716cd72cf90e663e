use anyhow::Result;

use kgen_lib::config::OptLevel;
use kgen_lib::platform::os::Os;
use kgen_lib::platform::{default_arch, default_toolchain_prefix, platform_triple};

use crate::output::print_stat;

pub fn cmd_info() -> Result<()> {
  println!("System:");
  match platform_triple() {
    Some(triple) => print_stat("Platform", &triple),
    None => println!("Could not detect platform."),
  }

  let arch = default_arch();
  print_stat("Default arch", arch.as_str());
  if let Some(os) = Os::current() {
    print_stat("Default prefix", &default_toolchain_prefix(arch, os));
  }
  print_stat("Default opt level", &OptLevel::default().to_string());

  Ok(())
}
