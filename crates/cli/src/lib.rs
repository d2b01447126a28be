//! liftlog CLI library: commands, configuration and helpers

pub mod cmd;
pub mod system_config;
pub mod util;
