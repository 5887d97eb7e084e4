//! `postline` - send mail from the command line.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postline=info,postline_mail=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let options = config::resolve_options(&cli.config).await?;
    debug!(?options, "Resolved mail options");

    match cli.command {
        Command::Send(args) => commands::send(options, args).await,
        Command::Properties => commands::properties(&options),
        Command::Options => {
            commands::show_options(&options);
            Ok(())
        }
        Command::Check => commands::check(options).await,
    }
}
