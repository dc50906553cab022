mod commands;
mod config_cmd;
mod rewrite;
mod run;
mod utils;

pub use commands::{Cli, Commands};
pub use config_cmd::handle_config;
pub use rewrite::rewrite_document;
pub use run::run_proxy;
pub use utils::load_config;
