use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Output formats understood by the CLI log subscriber.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per log record.
    #[default]
    Json,
    /// Terse single-line text for interactive use.
    Compact,
}
