//! Blocking client for Realplexor-style push notification servers.
//!
//! The server keeps per-channel event queues. Publishers post JSON payloads
//! to channel identifiers, and readers long-poll with `watch` from a stream
//! position. `online` reports which channels currently have listeners. All
//! identifiers may be isolated under a tenant namespace.
//!
//! # Architecture
//!
//! A [`Client`] command validates and namespaces identifiers
//! ([`identifier`]), encodes an identifier field and body ([`command`]),
//! hands them to the [`Dispatcher`] which frames the request and validates
//! the reply over a [`Transport`], and finally decodes the body
//! ([`response`]). Each call opens exactly one connection and is never
//! retried.

pub mod client;
pub mod command;
pub mod dispatch;
pub mod error;
pub mod identifier;
pub mod response;
pub mod transport;


pub use self::client::{Client, ClientConfig, Credentials};
pub use self::command::{Entry, Request};
pub use self::dispatch::Dispatcher;
pub use self::error::PlexorError;
pub use self::identifier::{Namespace, validate_identifier};
pub use self::response::Event;
pub use self::transport::{Endpoint, TcpTransport, Transport};
