//! CLI error handling with user-friendly messages.

use std::fmt;
use std::process;

use opsmap::api::ApiError;

/// CLI-specific errors with user-friendly messages.
///
/// Per-dataset fetch failures are not errors here; the session reports
/// those inline and keeps going. Only startup problems are fatal.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Campus options could not be fetched
    Api(ApiError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Api(_) = self {
            eprintln!();
            eprintln!("Check that:");
            eprintln!("  1. --base-url points at the facility-operations API root");
            eprintln!("  2. The backend is reachable from this machine");
        }

        process::exit(1);
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            Self::Api(e) => write!(f, "Backend request failed: {}", e),
        }
    }
}

impl From<ApiError> for CliError {
    fn from(e: ApiError) -> Self {
        Self::Api(e)
    }
}
