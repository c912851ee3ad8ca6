//! Executes parsed commands against a client.

use std::io::Write;

use plexor::{Client, Transport};
use serde_json::Value;
use tracing::debug;

use crate::AppError;
use crate::cli::CliCommand;
use crate::output::{write_events, write_identifiers, write_publish_response};

/// Interprets `--data` as JSON, sending anything else as a JSON string.
pub(crate) fn parse_payload(data: &str) -> Value {
    serde_json::from_str(data).unwrap_or_else(|_| Value::String(data.to_owned()))
}

fn as_strs(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}

pub(crate) fn execute<T, W>(
    command: &CliCommand,
    client: &Client<T>,
    stdout: &mut W,
) -> Result<(), AppError>
where
    T: Transport,
    W: Write,
{
    match command {
        CliCommand::Publish {
            data,
            selected,
            entries,
        } => {
            let payload = parse_payload(data);
            debug!(entries = entries.len(), "publishing event");
            let response = client.send_event(entries, &payload, &as_strs(selected))?;
            write_publish_response(stdout, response.as_deref())
        }
        CliCommand::Online { prefixes } => {
            let identifiers = client.online(&as_strs(prefixes))?;
            write_identifiers(stdout, &identifiers)
        }
        CliCommand::Watch {
            from_position,
            prefixes,
        } => {
            let filter = as_strs(prefixes);
            let events = client.watch(
                *from_position,
                (!filter.is_empty()).then_some(filter.as_slice()),
            )?;
            write_events(stdout, &events)
        }
    }
}
