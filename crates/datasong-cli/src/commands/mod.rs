//! CLI command implementations

pub mod bands;
pub mod generate;
pub mod play;

use datasong_core::SongError;
use serde::Serialize;

/// Exit status for configuration errors.
pub const EXIT_CONFIG_ERROR: u8 = 2;

/// Exit status for every other failure.
pub const EXIT_FAILURE: u8 = 1;

/// Code reported for errors that did not come from the core library.
pub const CLI_ERROR_CODE: &str = "CLI_001";

/// Finds the [`SongError`] anywhere in an error chain.
pub fn song_error(err: &anyhow::Error) -> Option<&SongError> {
    err.chain().find_map(|cause| cause.downcast_ref::<SongError>())
}

/// Process exit status for a failed command.
pub fn exit_status(err: &anyhow::Error) -> u8 {
    match song_error(err) {
        Some(e) if e.is_config_error() => EXIT_CONFIG_ERROR,
        _ => EXIT_FAILURE,
    }
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (`SONG_0xx`, or `CLI_001`)
    pub code: String,
    /// Full error message including context
    pub message: String,
}

impl JsonError {
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let code = song_error(err).map_or(CLI_ERROR_CODE, SongError::code);
        Self {
            code: code.to_string(),
            message: format!("{:#}", err),
        }
    }
}
