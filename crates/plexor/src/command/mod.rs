//! Encoders turning typed commands into `(identifier field, body)` pairs.
//!
//! Publishing carries the recipient list in the request header and the JSON
//! payload in the body. The `online` and `watch` queries leave the header
//! field empty and send a space-separated command line as the body.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::PlexorError;
use crate::identifier::Namespace;

/// A publish recipient, optionally carrying the reader's cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Deliver to the channel without cursor information.
    Plain(String),
    /// Deliver to the channel, telling the server how far the reader got.
    WithCursor {
        /// Channel identifier.
        id: String,
        /// Client-side read offset; rejected at send time when negative.
        cursor: i64,
    },
}

impl Entry {
    /// Builds a plain entry.
    pub fn plain(id: impl Into<String>) -> Self {
        Self::Plain(id.into())
    }

    /// Builds an entry carrying a cursor.
    pub fn with_cursor(id: impl Into<String>, cursor: i64) -> Self {
        Self::WithCursor {
            id: id.into(),
            cursor,
        }
    }

    /// The channel identifier, before namespacing.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Plain(id) | Self::WithCursor { id, .. } => id,
        }
    }

    fn encode(&self, namespace: &Namespace) -> Result<String, PlexorError> {
        match self {
            Self::Plain(id) => namespace.apply(id),
            Self::WithCursor { id, cursor } => {
                let wire_id = namespace.apply(id)?;
                if *cursor < 0 {
                    return Err(PlexorError::InvalidCursor {
                        identifier: id.clone(),
                        cursor: cursor.to_string(),
                    });
                }
                Ok(format!("{cursor}:{wire_id}"))
            }
        }
    }
}

/// Parses `id` or `cursor:id`, the order used on the wire.
impl FromStr for Entry {
    type Err = PlexorError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let Some((cursor_text, id)) = text.split_once(':') else {
            return Ok(Self::plain(text));
        };
        cursor_text
            .parse::<i64>()
            .ok()
            .filter(|cursor| *cursor >= 0)
            .map(|cursor| Self::with_cursor(id, cursor))
            .ok_or_else(|| PlexorError::InvalidCursor {
                identifier: id.to_owned(),
                cursor: cursor_text.to_owned(),
            })
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(id) => formatter.write_str(id),
            Self::WithCursor { id, cursor } => write!(formatter, "{cursor}:{id}"),
        }
    }
}

/// A request ready for the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Text placed after `<sender>=` in the `X-Realplexor` header.
    pub identifier_field: String,
    /// Request body.
    pub body: String,
}

impl Request {
    fn query(body: String) -> Self {
        Self {
            identifier_field: String::new(),
            body,
        }
    }
}

/// Serialised forms of payloads that count as "nothing to send".
const EMPTY_PAYLOADS: [&str; 4] = ["null", "\"\"", "[]", "{}"];

/// Encodes a publish request.
///
/// Returns `Ok(None)` when the payload serialises to an empty value
/// (`null`, `""`, `[]` or `{}`); such calls never reach the network.
/// Selected identifiers are appended once, after every entry.
///
/// # Errors
///
/// Returns [`PlexorError::SerialisePayload`] when the payload cannot be
/// encoded, and validation errors for bad identifiers or cursors.
pub fn encode_publish<P>(
    namespace: &Namespace,
    entries: &[Entry],
    payload: &P,
    selected: &[&str],
) -> Result<Option<Request>, PlexorError>
where
    P: Serialize + ?Sized,
{
    let body = serde_json::to_string(payload).map_err(PlexorError::SerialisePayload)?;
    if EMPTY_PAYLOADS.contains(&body.as_str()) {
        return Ok(None);
    }

    let mut items = Vec::with_capacity(entries.len() + selected.len());
    for entry in entries {
        items.push(entry.encode(namespace)?);
    }
    for id in selected {
        items.push(format!("*{}", namespace.apply(id)?));
    }

    Ok(Some(Request {
        identifier_field: items.join(","),
        body,
    }))
}

/// Encodes an `online` query.
///
/// Prefixes are namespaced only when a namespace is active and the list is
/// non-empty; an empty list asks about every identifier the server knows.
///
/// # Errors
///
/// Returns [`PlexorError::InvalidIdentifier`] for a prefix that is not a word.
pub fn encode_online(namespace: &Namespace, prefixes: &[&str]) -> Result<Request, PlexorError> {
    let mut body = String::from("online");
    for prefix in prefixes {
        body.push(' ');
        body.push_str(&namespace.apply(prefix)?);
    }
    Ok(Request::query(body))
}

/// Encodes a `watch` query starting at `from_position`.
///
/// With an active namespace an absent prefix list becomes an empty one, so
/// the command line always ends in a separator in that case.
///
/// # Errors
///
/// Returns [`PlexorError::InvalidIdentifier`] for a prefix that is not a word.
pub fn encode_watch(
    namespace: &Namespace,
    from_position: u64,
    prefixes: Option<&[&str]>,
) -> Result<Request, PlexorError> {
    let mut body = format!("watch {from_position}");
    let effective = match prefixes {
        Some(list) => Some(list),
        None if namespace.is_active() => Some(&[][..]),
        None => None,
    };
    if let Some(list) = effective {
        let wire: Vec<String> = list
            .iter()
            .map(|prefix| namespace.apply(prefix))
            .collect::<Result<_, _>>()?;
        body.push(' ');
        body.push_str(&wire.join(" "));
    }
    Ok(Request::query(body))
}
