//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use plexor::PlexorError;
use plexor_config::CredentialsError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("invalid credentials: {0}")]
    Credentials(#[from] CredentialsError),
    #[error(transparent)]
    Client(#[from] PlexorError),
    #[error("failed to initialise logging: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to serialise event: {0}")]
    SerialiseEvent(serde_json::Error),
    #[error("failed to write output: {0}")]
    WriteOutput(io::Error),
}
