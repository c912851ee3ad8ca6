//! Identifier validation and tenant namespacing.
//!
//! Every identifier handed to the client must be a non-empty run of ASCII
//! letters, digits and underscores. When a [`Namespace`] is active the
//! identifier is prefixed before it reaches the wire, and the same prefix is
//! removed from identifiers the server sends back.

use crate::error::PlexorError;

/// Checks that `raw` is a non-empty run of ASCII word characters.
///
/// # Errors
///
/// Returns [`PlexorError::InvalidIdentifier`] when `raw` is empty or holds
/// any other character.
pub fn validate_identifier(raw: &str) -> Result<(), PlexorError> {
    if is_word(raw) {
        Ok(())
    } else {
        Err(PlexorError::InvalidIdentifier {
            identifier: raw.to_owned(),
        })
    }
}

pub(crate) fn is_word(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(is_word_byte)
}

pub(crate) const fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Optional prefix isolating one tenant's identifiers on a shared server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace(Option<String>);

impl Namespace {
    /// Creates a namespace; `None` disables namespacing.
    #[must_use]
    pub const fn new(prefix: Option<String>) -> Self {
        Self(prefix)
    }

    /// A namespace that leaves identifiers untouched.
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }

    /// Returns true when identifiers are being prefixed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.0.is_some()
    }

    /// The configured prefix, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Validates `raw` and returns the identifier as it must appear on the
    /// wire.
    ///
    /// # Errors
    ///
    /// Returns [`PlexorError::InvalidIdentifier`] when `raw` is not a word.
    pub fn apply(&self, raw: &str) -> Result<String, PlexorError> {
        validate_identifier(raw)?;
        Ok(self.prefix_unchecked(raw))
    }

    /// Removes the namespace from the start of a server-supplied identifier.
    ///
    /// Identifiers that do not begin with the namespace are returned as-is.
    #[must_use]
    pub fn strip<'a>(&self, wire_id: &'a str) -> &'a str {
        match self.prefix() {
            Some(prefix) => wire_id.strip_prefix(prefix).unwrap_or(wire_id),
            None => wire_id,
        }
    }

    /// Folds a login into the namespace: `login + "_" + previous`.
    pub(crate) fn with_login(&self, login: &str) -> Self {
        let previous = self.prefix().unwrap_or_default();
        Self(Some(format!("{login}_{previous}")))
    }

    fn prefix_unchecked(&self, raw: &str) -> String {
        match self.prefix() {
            Some(prefix) => format!("{prefix}{raw}"),
            None => raw.to_owned(),
        }
    }
}

impl From<Option<String>> for Namespace {
    fn from(prefix: Option<String>) -> Self {
        Self::new(prefix)
    }
}
