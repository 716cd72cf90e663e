mod configure;
mod info;
mod modules;

pub use configure::cmd_configure;
pub use info::cmd_info;
pub use modules::cmd_modules;
