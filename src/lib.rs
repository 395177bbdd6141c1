#[macro_use]
extern crate lazy_static;

pub mod cli_config;
pub mod config;
pub mod genex;
pub mod list_file;
pub mod logger;
pub mod program_actions;
pub mod targets;
