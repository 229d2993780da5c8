use std::process::ExitCode;

use charm_helpers_sync::cli::{self, Cli};
use clap::Parser;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let subscriber = cli::logging_subscriber(cli.debug);

    tracing::subscriber::with_default(subscriber, || match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::from(err.exit_code())
        }
    })
}
