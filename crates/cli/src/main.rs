use std::io;

use clap::Parser;

use milkstock_cli::{run, Cli};
use milkstock_infra::Config;

fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();
    let mut config = Config::from_env()?;
    cli.apply_overrides(&mut config);

    milkstock_observability::init(config.log_format);
    tracing::debug!(data_file = %config.data_file.display(), "starting");

    let today = chrono::Local::now().date_naive();
    let stdin = io::stdin();
    run(cli.command.take(), &config, today, stdin.lock(), io::stdout().lock())
}
