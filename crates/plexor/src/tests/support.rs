//! Test support: a one-shot fake push server and canned responses.
//!
//! The fake server accepts a single connection, records the request bytes
//! up to the client's half-close, replies with canned bytes and hangs up,
//! mirroring how the real server answers one command per connection.

use std::cell::RefCell;
use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use rstest::fixture;

use crate::{Client, ClientConfig, Entry, Event, PlexorError};

/// Builds a well-formed `200 OK` response around `body`.
pub(crate) fn ok_response(body: &str) -> Vec<u8> {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
    .into_bytes()
}

/// A fake server that accepts one connection and replies with canned bytes.
pub(crate) struct FakeServer {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    result: Arc<Mutex<Option<Result<()>>>>,
    finished: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FakeServer {
    /// Spawns a server on an ephemeral port.
    ///
    /// The server stops waiting once [`FakeServer::take_requests`] signals
    /// that the client call has returned; a connection made by that call is
    /// already queued and still gets accepted. Two seconds is the upper bound
    /// either way.
    pub(crate) fn spawn(response: Vec<u8>) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake server")?;
        listener
            .set_nonblocking(true)
            .context("fake server nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let result: Arc<Mutex<Option<Result<()>>>> = Arc::new(Mutex::new(None));
        let finished = Arc::new(AtomicBool::new(false));
        let requests_clone = Arc::clone(&requests);
        let result_clone = Arc::clone(&result);
        let finished_clone = Arc::clone(&finished);
        let handle = thread::spawn(move || {
            let outcome =
                Self::serve_client(&listener, &response, &requests_clone, &finished_clone);
            if let Ok(mut guard) = result_clone.lock() {
                *guard = Some(outcome);
            }
        });
        Ok(Self {
            port,
            requests,
            result,
            finished,
            handle: Some(handle),
        })
    }

    pub(crate) const fn port(&self) -> u16 {
        self.port
    }

    /// Waits for the server thread and returns the recorded requests.
    pub(crate) fn take_requests(&mut self) -> Result<Vec<String>> {
        self.finished.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake server thread panicked"))?;
        }
        if let Some(outcome) = self
            .result
            .lock()
            .map_err(|error| anyhow!("lock fake server result: {error}"))?
            .take()
        {
            outcome.context("fake server failed")?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    fn serve_client(
        listener: &TcpListener,
        response: &[u8],
        requests: &Arc<Mutex<Vec<String>>>,
        finished: &AtomicBool,
    ) -> Result<()> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            // Read the flag before polling so a queued connection is seen.
            let give_up = finished.load(Ordering::SeqCst) || Instant::now() >= deadline;
            match listener.accept() {
                Ok((stream, _)) => {
                    stream
                        .set_nonblocking(false)
                        .context("blocking accepted stream")?;
                    return Self::answer(stream, response, requests);
                }
                Err(ref error) if error.kind() == io::ErrorKind::WouldBlock && !give_up => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(ref error) if error.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(error) => return Err(error).context("accept connection"),
            }
        }
    }

    fn answer(
        mut stream: TcpStream,
        response: &[u8],
        requests: &Arc<Mutex<Vec<String>>>,
    ) -> Result<()> {
        let mut request = Vec::new();
        stream
            .read_to_end(&mut request)
            .context("read request until half-close")?;
        requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?
            .push(String::from_utf8_lossy(&request).into_owned());
        stream.write_all(response).context("write response")?;
        stream.flush().context("flush response")
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        self.finished.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Outcome of the last command run by a [`TestWorld`].
pub(crate) enum Outcome {
    Published(Option<String>),
    Online(Vec<String>),
    Events(Vec<Event>),
    Failed(PlexorError),
}

/// Behavioural test state: client settings, server and captured results.
#[derive(Default)]
pub(crate) struct TestWorld {
    pub namespace: Option<String>,
    pub server: Option<FakeServer>,
    pub outcome: Option<Outcome>,
    pub requests: Vec<String>,
}

impl TestWorld {
    pub(crate) fn start_server(&mut self, response: Vec<u8>) -> Result<()> {
        self.server = Some(FakeServer::spawn(response)?);
        Ok(())
    }

    fn client(&self) -> Result<Client> {
        let port = self
            .server
            .as_ref()
            .map(FakeServer::port)
            .context("fake server not started")?;
        let mut config =
            ClientConfig::new("127.0.0.1", port).with_connect_timeout(Some(Duration::from_secs(2)));
        if let Some(namespace) = &self.namespace {
            config = config.with_namespace(namespace.clone());
        }
        Ok(Client::new(config))
    }

    fn finish(&mut self, outcome: Result<Outcome, PlexorError>) -> Result<()> {
        self.outcome = Some(outcome.unwrap_or_else(Outcome::Failed));
        if let Some(server) = self.server.as_mut() {
            self.requests = server.take_requests()?;
        }
        self.server = None;
        Ok(())
    }

    pub(crate) fn publish(&mut self, payload: &str, id: &str) -> Result<()> {
        let client = self.client()?;
        let outcome = client
            .send_event(&[Entry::plain(id)], payload, &[])
            .map(Outcome::Published);
        self.finish(outcome)
    }

    pub(crate) fn query_online(&mut self) -> Result<()> {
        let client = self.client()?;
        let outcome = client.online(&[]).map(Outcome::Online);
        self.finish(outcome)
    }

    pub(crate) fn watch(&mut self, from_position: u64) -> Result<()> {
        let client = self.client()?;
        let outcome = client.watch(from_position, None).map(Outcome::Events);
        self.finish(outcome)
    }

    pub(crate) fn routing_header(&self) -> Result<&str> {
        let request = self.requests.first().context("no request recorded")?;
        request
            .lines()
            .find_map(|line| line.strip_prefix("X-Realplexor: "))
            .context("routing header missing")
    }
}

#[fixture]
pub(crate) fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}
