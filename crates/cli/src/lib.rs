//! `milkstock` command-line front end.
//!
//! `cli` holds the clap surface and dispatches subcommands; `menu` is the
//! interactive numbered menu. Both only talk to the domain through
//! `milkstock_infra::CommandDispatcher` and the report functions.

pub mod cli;
pub mod menu;

pub use cli::{run, Cli, Command};
pub use menu::Menu;
