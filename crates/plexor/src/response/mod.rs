//! Decoders for `online` and `watch` response bodies.

use serde::Serialize;
use tracing::warn;

use crate::identifier::{Namespace, is_word_byte};

/// One event reported by a `watch` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Event name, such as `add` or `update`.
    pub event: String,
    /// Server-assigned stream position; opaque to the client.
    pub position: String,
    /// Channel identifier, with the namespace removed.
    pub id: String,
}

/// Parses one `watch` line of the form `<event> <position>:<id>`.
///
/// Leading and trailing whitespace is ignored. The event name must be a word,
/// at least one whitespace character must follow it, the position runs up to
/// the first `:` and the identifier may not contain whitespace.
#[must_use]
pub fn parse_watch_line(line: &str) -> Option<Event> {
    let trimmed = line.trim_start();
    let word_end = trimmed
        .bytes()
        .position(|byte| !is_word_byte(byte))
        .unwrap_or(trimmed.len());
    let (event, rest) = trimmed.split_at(word_end);
    if event.is_empty() || !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let (position, tail) = rest.trim_start().split_once(':')?;
    let id = tail.trim_end();
    if position.is_empty() || id.is_empty() || id.contains(char::is_whitespace) {
        return None;
    }

    Some(Event {
        event: event.to_owned(),
        position: position.to_owned(),
        id: id.to_owned(),
    })
}

/// Decodes a `watch` response body into events, in line order.
///
/// Lines that do not parse are logged and skipped; blank lines are ignored.
#[must_use]
pub fn decode_watch(namespace: &Namespace, body: &str) -> Vec<Event> {
    if body.is_empty() {
        return Vec::new();
    }

    body.split('\n')
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parsed = parse_watch_line(line);
            if parsed.is_none() {
                warn!(line, "cannot parse watch event");
            }
            parsed
        })
        .map(|event| Event {
            id: namespace.strip(&event.id).to_owned(),
            ..event
        })
        .collect()
}

/// Decodes an `online` response body: a comma-separated identifier list.
#[must_use]
pub fn decode_online(namespace: &Namespace, body: &str) -> Vec<String> {
    if body.is_empty() {
        return Vec::new();
    }

    body.split(',')
        .map(|id| namespace.strip(id).to_owned())
        .collect()
}
