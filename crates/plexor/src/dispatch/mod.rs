//! Request framing and response validation.
//!
//! The server speaks a minimal HTTP dialect: a `POST` with the routing data
//! in an `X-Realplexor` header, answered by a status line, a
//! `Content-Length` header and a body of exactly that many bytes. Everything
//! above this module deals only in "identifier field and body in, body text
//! out".

use tracing::debug;

use crate::client::ClientConfig;
use crate::command::Request;
use crate::error::PlexorError;
use crate::transport::Transport;

/// Header carrying the sender identifier, credentials and recipients.
pub const ROUTING_HEADER: &str = "X-Realplexor";

/// Sends requests through a [`Transport`] and validates the replies.
#[derive(Debug, Default, Clone)]
pub struct Dispatcher<T> {
    transport: T,
}

impl<T> Dispatcher<T> {
    /// Creates a dispatcher over `transport`.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }
}

impl<T: Transport> Dispatcher<T> {
    /// Performs one exchange and returns the validated response body.
    ///
    /// A response without a header/body separator yields an empty body.
    ///
    /// # Errors
    ///
    /// Propagates transport failures and any framing error reported by
    /// [`parse_response`].
    pub fn dispatch(&self, config: &ClientConfig, request: &Request) -> Result<String, PlexorError> {
        let wire = build_request(config, request);
        debug!(
            endpoint = %config.endpoint(),
            body_bytes = request.body.len(),
            "dispatching request"
        );
        let raw = self.transport.exchange(config.endpoint(), wire.as_bytes())?;
        let body = parse_response(&raw)?;
        debug!(response_bytes = body.len(), "request completed");
        Ok(body)
    }
}

/// Renders the request exactly as it is written to the socket.
#[must_use]
pub fn build_request(config: &ClientConfig, request: &Request) -> String {
    let credentials = config
        .credentials()
        .map(|credentials| format!("{}:{}@", credentials.login(), credentials.password()))
        .unwrap_or_default();
    format!(
        "POST / HTTP/1.1\r\nHOST: {host}\r\nContent-Length: {length}\r\n{ROUTING_HEADER}: {identifier}={credentials}{field}\r\n\r\n{body}",
        host = config.endpoint().host,
        length = request.body.len(),
        identifier = config.identifier(),
        field = request.identifier_field,
        body = request.body,
    )
}

/// Validates a raw response and extracts its body.
///
/// An empty response, or one with no blank line separating headers from a
/// body, yields an empty string.
///
/// # Errors
///
/// Returns [`PlexorError::MalformedStatusLine`],
/// [`PlexorError::RequestFailed`], [`PlexorError::MissingContentLength`],
/// [`PlexorError::LengthMismatch`] or [`PlexorError::InvalidEncoding`] when the
/// framing is wrong.
pub fn parse_response(raw: &[u8]) -> Result<String, PlexorError> {
    let Some((head, body)) = split_head(raw) else {
        return Ok(String::new());
    };
    let head_text = String::from_utf8_lossy(head);

    let status_line = head_text.lines().next().unwrap_or_default();
    let status =
        parse_status_line(status_line).ok_or_else(|| PlexorError::MalformedStatusLine {
            line: status_line.to_owned(),
        })?;
    if status != 200 {
        return Err(PlexorError::RequestFailed { status });
    }

    let expected = head_text
        .lines()
        .find_map(content_length)
        .ok_or(PlexorError::MissingContentLength)?;
    if expected != body.len() {
        return Err(PlexorError::LengthMismatch {
            expected,
            received: body.len(),
        });
    }

    String::from_utf8(body.to_vec()).map_err(PlexorError::InvalidEncoding)
}

/// Splits at the first blank line, accepting `\n\n`, `\r\n\r\n` and mixes.
fn split_head(raw: &[u8]) -> Option<(&[u8], &[u8])> {
    raw.iter()
        .enumerate()
        .filter(|(_, byte)| **byte == b'\n')
        .find_map(|(index, _)| {
            let (head, rest) = raw.split_at(index + 1);
            rest.strip_prefix(b"\n")
                .or_else(|| rest.strip_prefix(b"\r\n"))
                .map(|body| (head, body))
        })
}

/// Parses `HTTP[/<major>.<minor>] <code> <reason>` and returns the code.
fn parse_status_line(line: &str) -> Option<u16> {
    let after_protocol = line.strip_prefix("HTTP")?;
    let after_version = match after_protocol.strip_prefix('/') {
        Some(versioned) => {
            let end = versioned
                .find(|character: char| !(character.is_ascii_digit() || character == '.'))
                .unwrap_or(versioned.len());
            let (version, tail) = versioned.split_at(end);
            if !is_version(version) {
                return None;
            }
            tail
        }
        None => after_protocol,
    };
    if !after_version.starts_with(char::is_whitespace) {
        return None;
    }

    let (code, reason) = after_version.trim_start().split_at_checked(3)?;
    let reason_starts_with_word = reason
        .trim_start()
        .starts_with(|character: char| character.is_ascii_alphanumeric() || character == '_');
    if !code.bytes().all(|byte| byte.is_ascii_digit()) || !reason_starts_with_word {
        return None;
    }
    code.parse().ok()
}

fn is_version(text: &str) -> bool {
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_digit());
    text.split_once('.')
        .is_some_and(|(major, minor)| all_digits(major) && all_digits(minor))
}

/// Reads a `Content-Length` header line, tolerating case and spacing.
fn content_length(line: &str) -> Option<usize> {
    let (name, value) = line.split_once(':')?;
    if !name.trim().eq_ignore_ascii_case("content-length") {
        return None;
    }
    let digits = value.trim_start();
    let end = digits
        .find(|character: char| !character.is_ascii_digit())
        .unwrap_or(digits.len());
    digits.split_at(end).0.parse().ok()
}
