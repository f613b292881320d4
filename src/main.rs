use clap::Parser;
use install_jdk::cli::{Cli, CommandHandler};
use install_jdk::core::constants::install::LOG_FILTER_ENV;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let handler = match CommandHandler::new() {
        Ok(handler) => handler,
        Err(e) => {
            eprint!("{}", e.user_message());
            process::exit(1);
        }
    };

    if let Err(e) = handler.handle_command(cli.command).await {
        eprint!("{}", e.user_message());
        process::exit(1);
    }
}
