//! Helpers for driving the CLI runtime in-process.

use std::ffi::OsString;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::process::ExitCode;
use std::thread;

use anyhow::{Context, Result, anyhow};
use plexor_config::Config;

use crate::{AppError, ConfigLoader, IoStreams, run_with_loader};

/// Serves a fixed configuration regardless of the arguments.
pub(crate) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(crate) const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Result of one in-process CLI run.
pub(crate) struct CliRun {
    pub exit_code: ExitCode,
    pub stdout: String,
    pub stderr: String,
}

pub(crate) fn run_cli(config: Config, args: &[&str]) -> CliRun {
    let loader = StaticConfigLoader::new(config);
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let exit_code = {
        let mut io = IoStreams::new(&mut stdout, &mut stderr);
        let arguments = std::iter::once("plexor")
            .chain(args.iter().copied())
            .map(OsString::from);
        run_with_loader(arguments, &mut io, &loader)
    };
    CliRun {
        exit_code,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    }
}

/// One-shot server replying with a `200 OK` around `body`.
pub(crate) struct OneShotServer {
    port: u16,
    handle: thread::JoinHandle<Result<String>>,
}

impl OneShotServer {
    pub(crate) fn spawn(body: &str) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind one-shot server")?;
        let port = listener.local_addr().context("local addr")?.port();
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        );
        let handle = thread::spawn(move || -> Result<String> {
            let (mut stream, _) = listener.accept().context("accept connection")?;
            let mut request = Vec::new();
            stream
                .read_to_end(&mut request)
                .context("read request until half-close")?;
            stream
                .write_all(response.as_bytes())
                .context("write response")?;
            Ok(String::from_utf8_lossy(&request).into_owned())
        });
        Ok(Self { port, handle })
    }

    pub(crate) fn config(&self) -> Config {
        Config {
            port: self.port,
            ..Config::default()
        }
    }

    /// Waits for the exchange and returns the raw request text.
    pub(crate) fn request(self) -> Result<String> {
        self.handle
            .join()
            .map_err(|_| anyhow!("one-shot server thread panicked"))?
    }
}
