//! CLI entrypoint for the plexor push client.
//!
//! The binary delegates to [`plexor_cli::run`], which loads configuration,
//! parses the command, talks to the push server and renders the result.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    plexor_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
