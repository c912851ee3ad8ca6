//! Renders command results on stdout.

use std::io::Write;

use plexor::Event;

use crate::AppError;

/// Writes the publish response body, if the server sent one.
pub(crate) fn write_publish_response<W: Write>(
    stdout: &mut W,
    body: Option<&str>,
) -> Result<(), AppError> {
    if let Some(text) = body.filter(|text| !text.is_empty()) {
        writeln!(stdout, "{text}").map_err(AppError::WriteOutput)?;
    }
    stdout.flush().map_err(AppError::WriteOutput)
}

/// Writes one identifier per line.
pub(crate) fn write_identifiers<W: Write>(
    stdout: &mut W,
    identifiers: &[String],
) -> Result<(), AppError> {
    for identifier in identifiers {
        writeln!(stdout, "{identifier}").map_err(AppError::WriteOutput)?;
    }
    stdout.flush().map_err(AppError::WriteOutput)
}

/// Writes one JSON object per event and line.
pub(crate) fn write_events<W: Write>(stdout: &mut W, events: &[Event]) -> Result<(), AppError> {
    for event in events {
        serde_json::to_writer(&mut *stdout, event).map_err(AppError::SerialiseEvent)?;
        stdout.write_all(b"\n").map_err(AppError::WriteOutput)?;
    }
    stdout.flush().map_err(AppError::WriteOutput)
}
