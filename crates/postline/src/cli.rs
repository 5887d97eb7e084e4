//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "postline", version, about = "Send mail through a configured SMTP server")]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send one message.
    Send(SendArgs),
    /// Print the normalised property bag as JSON.
    Properties,
    /// Print the effective client options.
    Options,
    /// Connect to the configured server and report whether it accepts us.
    Check,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    #[arg(
        long,
        global = true,
        help = "JSON file with mail properties (default: <config dir>/postline/options.json)"
    )]
    pub options_file: Option<PathBuf>,
    #[arg(
        long = "set",
        global = true,
        value_name = "KEY=VALUE",
        action = ArgAction::Append,
        help = "Override a mail property (repeatable)"
    )]
    pub overrides: Vec<String>,
}

#[derive(Debug, Args)]
pub struct SendArgs {
    #[arg(long, help = "Sender address, optionally as 'Name <addr>'")]
    pub from: String,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "Recipient addresses")]
    pub to: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "CC addresses")]
    pub cc: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "BCC addresses")]
    pub bcc: Vec<String>,
    #[arg(long, visible_alias = "subj", default_value = "", help = "Email subject")]
    pub subject: String,
    #[arg(long, conflicts_with = "text_file", help = "Inline body text")]
    pub text: Option<String>,
    #[arg(long, help = "Read body from file")]
    pub text_file: Option<PathBuf>,
    #[arg(long, default_value = "plain", help = "Body subtype: plain or html")]
    pub subtype: String,
    #[arg(long, help = "Compose and validate without contacting the server")]
    pub dry_run: bool,
}
