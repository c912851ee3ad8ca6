//! CLI argument definitions for the plexor client.

use clap::{Parser, Subcommand};
use plexor::Entry;

/// Command-line interface for the plexor push client.
#[derive(Parser, Debug)]
#[command(
    name = "plexor",
    about = "Publish to and query a Realplexor-style push server",
    disable_help_subcommand = true
)]
pub(crate) struct Cli {
    /// The server command to run.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Server commands.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Publishes a payload to one or more channels.
    Publish {
        /// Payload as JSON; text that is not valid JSON is sent as a string.
        #[arg(long, value_name = "JSON")]
        data: String,
        /// Channel that receives the event even without a matching reader.
        #[arg(long = "select", value_name = "ID")]
        selected: Vec<String>,
        /// Recipients written as `id` or `cursor:id`.
        #[arg(value_name = "ENTRY", required = true, num_args = 1..)]
        entries: Vec<Entry>,
    },
    /// Lists channels that currently have listeners.
    Online {
        /// Only report channels starting with one of these prefixes.
        #[arg(value_name = "PREFIX")]
        prefixes: Vec<String>,
    },
    /// Waits for events newer than a stream position.
    Watch {
        /// Stream position to resume from.
        #[arg(long = "from", value_name = "POS", default_value_t = 0)]
        from_position: u64,
        /// Only report channels starting with one of these prefixes.
        #[arg(value_name = "PREFIX")]
        prefixes: Vec<String>,
    },
}
