//! Socket transport for the dispatcher.
//!
//! Every exchange opens a fresh TCP connection, writes the whole request,
//! half-closes the socket and reads until the server hangs up. The
//! [`Transport`] trait is the seam tests use to observe requests without a
//! network.

use std::fmt;
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use crate::error::PlexorError;

/// Where and how patiently to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Host name or address.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Upper bound for establishing the connection.
    pub connect_timeout: Option<Duration>,
    /// Upper bound for each blocking read or write.
    pub io_timeout: Option<Duration>,
}

impl Endpoint {
    /// Builds an endpoint without timeouts.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: None,
            io_timeout: None,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.host, self.port)
    }
}

/// Performs one request/response exchange with the server.
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    /// Sends `request` and returns every byte the server wrote back.
    ///
    /// # Errors
    ///
    /// Returns a [`PlexorError`] when resolving, connecting, writing or
    /// reading fails.
    fn exchange(&self, endpoint: &Endpoint, request: &[u8]) -> Result<Vec<u8>, PlexorError>;
}

/// Production transport over blocking TCP sockets.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpTransport;

impl Transport for TcpTransport {
    fn exchange(&self, endpoint: &Endpoint, request: &[u8]) -> Result<Vec<u8>, PlexorError> {
        let mut stream = connect(endpoint)?;
        stream
            .set_read_timeout(endpoint.io_timeout)
            .and_then(|()| stream.set_write_timeout(endpoint.io_timeout))
            .map_err(|source| PlexorError::Connect {
                endpoint: endpoint.to_string(),
                source: Arc::new(source),
            })?;

        stream
            .write_all(request)
            .and_then(|()| stream.flush())
            .and_then(|()| stream.shutdown(Shutdown::Write))
            .map_err(|source| PlexorError::SendRequest(Arc::new(source)))?;

        let mut response = Vec::new();
        stream
            .read_to_end(&mut response)
            .map_err(|source| PlexorError::ReadResponse(Arc::new(source)))?;
        Ok(response)
    }
}

fn connect(endpoint: &Endpoint) -> Result<TcpStream, PlexorError> {
    let address = resolve_tcp_address(&endpoint.host, endpoint.port).map_err(|source| {
        PlexorError::Resolve {
            endpoint: endpoint.to_string(),
            source: Arc::new(source),
        }
    })?;

    let connected = match endpoint.connect_timeout {
        Some(timeout) => TcpStream::connect_timeout(&address, timeout),
        None => TcpStream::connect(address),
    };
    connected.map_err(|source| PlexorError::Connect {
        endpoint: endpoint.to_string(),
        source: Arc::new(source),
    })
}

fn resolve_tcp_address(host: &str, port: u16) -> io::Result<SocketAddr> {
    let mut addrs = (host, port).to_socket_addrs()?;
    addrs
        .find(|addr| matches!(addr, SocketAddr::V4(_) | SocketAddr::V6(_)))
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses"))
}
