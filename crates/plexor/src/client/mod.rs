//! The public client: configuration plus the three server commands.
//!
//! ```no_run
//! use plexor::{Client, ClientConfig, Entry};
//!
//! # fn main() -> Result<(), plexor::PlexorError> {
//! let mut client = Client::new(ClientConfig::new("127.0.0.1", 10010).with_namespace("chat_"));
//! client.logon("tenant", "secret")?;
//! client.send_event(&[Entry::plain("room1")], "hello", &[])?;
//! let online = client.online(&[])?;
//! let events = client.watch(0, None)?;
//! # let _ = (online, events);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use serde::Serialize;

use crate::command::{Entry, encode_online, encode_publish, encode_watch};
use crate::dispatch::Dispatcher;
use crate::error::PlexorError;
use crate::identifier::Namespace;
use crate::response::{Event, decode_online, decode_watch};
use crate::transport::{Endpoint, TcpTransport, Transport};

/// Host used by [`ClientConfig::default`].
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Port used by [`ClientConfig::default`].
pub const DEFAULT_PORT: u16 = 10010;
/// Sender identifier used unless overridden.
pub const DEFAULT_IDENTIFIER: &str = "identifier";

/// Login and password sent with every request after [`ClientConfig::logon`].
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    login: String,
    password: String,
}

impl Credentials {
    /// Account login.
    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }

    /// Account password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Connection and identity settings for one [`Client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    endpoint: Endpoint,
    identifier: String,
    namespace: Namespace,
    credentials: Option<Credentials>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl ClientConfig {
    /// Targets `host:port` with the default sender identifier and no
    /// namespace.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            endpoint: Endpoint::new(host, port),
            identifier: DEFAULT_IDENTIFIER.to_owned(),
            namespace: Namespace::none(),
            credentials: None,
        }
    }

    /// Overrides the sender identifier announced in request headers.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Prefixes every channel identifier with `namespace`.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Namespace::new(Some(namespace.into()));
        self
    }

    /// Bounds the TCP handshake.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.endpoint.connect_timeout = timeout;
        self
    }

    /// Bounds each blocking read and write, including the `watch` long poll.
    #[must_use]
    pub const fn with_io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.endpoint.io_timeout = timeout;
        self
    }

    /// Stores credentials and folds the login into the namespace, which
    /// becomes `login + "_" + previous namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`PlexorError::AlreadyLoggedOn`] when credentials are already
    /// present; the namespace is left untouched in that case.
    pub fn logon(
        &mut self,
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<(), PlexorError> {
        if let Some(existing) = &self.credentials {
            return Err(PlexorError::AlreadyLoggedOn {
                login: existing.login.clone(),
            });
        }
        let login_name: String = login.into();
        self.namespace = self.namespace.with_login(&login_name);
        self.credentials = Some(Credentials {
            login: login_name,
            password: password.into(),
        });
        Ok(())
    }

    /// Server address and timeouts.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Sender identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Current namespace.
    #[must_use]
    pub const fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Credentials set by [`ClientConfig::logon`].
    #[must_use]
    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }
}

/// Client for the push server. Each command performs exactly one exchange.
#[derive(Debug, Clone)]
pub struct Client<T = TcpTransport> {
    config: ClientConfig,
    dispatcher: Dispatcher<T>,
}

impl Client<TcpTransport> {
    /// Creates a client that talks TCP.
    #[must_use]
    pub const fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, TcpTransport)
    }
}

impl<T> Client<T> {
    /// Creates a client over a custom transport.
    #[must_use]
    pub const fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            dispatcher: Dispatcher::new(transport),
        }
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Logs on; see [`ClientConfig::logon`].
    ///
    /// # Errors
    ///
    /// Returns [`PlexorError::AlreadyLoggedOn`] on a second call.
    pub fn logon(
        &mut self,
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<(), PlexorError> {
        self.config.logon(login, password)
    }
}

impl<T: Transport> Client<T> {
    /// Publishes `payload` to `entries`, also forcing delivery to `selected`.
    ///
    /// Returns `Ok(None)` without touching the network when the payload is
    /// empty, otherwise the server's response body.
    ///
    /// # Errors
    ///
    /// Validation errors are raised before any connection is opened;
    /// transport and framing errors abort the call.
    pub fn send_event<P>(
        &self,
        entries: &[Entry],
        payload: &P,
        selected: &[&str],
    ) -> Result<Option<String>, PlexorError>
    where
        P: Serialize + ?Sized,
    {
        let Some(request) = encode_publish(self.config.namespace(), entries, payload, selected)?
        else {
            return Ok(None);
        };
        self.dispatcher.dispatch(&self.config, &request).map(Some)
    }

    /// Lists identifiers with active subscribers, optionally filtered by
    /// prefix.
    ///
    /// # Errors
    ///
    /// Returns [`PlexorError::InvalidIdentifier`] for a bad prefix, or any
    /// transport or framing error.
    pub fn online(&self, prefixes: &[&str]) -> Result<Vec<String>, PlexorError> {
        let request = encode_online(self.config.namespace(), prefixes)?;
        let body = self.dispatcher.dispatch(&self.config, &request)?;
        Ok(decode_online(self.config.namespace(), &body))
    }

    /// Waits for events after `from_position`, optionally filtered by prefix.
    ///
    /// The server holds the request open until an event arrives or its own
    /// timeout expires; configure an I/O timeout to bound the wait locally.
    ///
    /// # Errors
    ///
    /// Returns [`PlexorError::InvalidIdentifier`] for a bad prefix, or any
    /// transport or framing error. Malformed event lines are skipped.
    pub fn watch(
        &self,
        from_position: u64,
        prefixes: Option<&[&str]>,
    ) -> Result<Vec<Event>, PlexorError> {
        let request = encode_watch(self.config.namespace(), from_position, prefixes)?;
        let body = self.dispatcher.dispatch(&self.config, &request)?;
        Ok(decode_watch(self.config.namespace(), &body))
    }
}
