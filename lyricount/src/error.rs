//! Error types for lyricount
//!
//! Empty-but-valid outcomes (`NoMatch`, `NoWorksFound`) are variants here so
//! callers can branch on them, but [`Error::is_empty_result`] lets the binary
//! report them as a normal, zero-status termination.

use thiserror::Error;

/// Pipeline error type
#[derive(Debug, Error)]
pub enum Error {
    /// Caller-supplied input violates a precondition
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Artist search completed but found nothing
    #[error("No artists found matching '{0}'")]
    NoMatch(String),

    /// The selected artist has no works in the catalog
    #[error("No works found for artist '{0}'")]
    NoWorksFound(String),

    /// Selector picked a position outside `[1, count]`
    #[error("Selection {selected} is out of range (choose 1-{count})")]
    SelectionOutOfRange { selected: usize, count: usize },

    /// Several candidates matched and no selector was supplied
    #[error("{0} artists matched; a selection is required")]
    SelectionRequired(usize),

    /// Remote call could not complete (network, status, payload)
    #[error("{service} request failed: {message}")]
    TransportFailure {
        service: &'static str,
        message: String,
    },

    /// Cancellation was requested while the pipeline was running
    #[error("Operation cancelled")]
    Cancelled,

    /// lyricount-common error (configuration, IO)
    #[error("Common error: {0}")]
    Common(#[from] lyricount_common::Error),
}

impl Error {
    pub fn transport(service: &'static str, message: impl Into<String>) -> Self {
        Error::TransportFailure {
            service,
            message: message.into(),
        }
    }

    /// True for outcomes that are valid but empty
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Error::NoMatch(_) | Error::NoWorksFound(_))
    }

    /// True for failures that must abort a whole run
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::TransportFailure { .. })
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;
