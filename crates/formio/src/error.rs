use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the FormIO client.
#[derive(Error, Debug)]
pub enum Error {
    /// The configured base URL is not an absolute http(s) URL.
    #[error("invalid FormIO URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// FormIO answered with a non-success status.
    #[error("status {status}: {message}")]
    Api { status: StatusCode, message: String },

    /// A login or registration succeeded without returning a JWT.
    #[error("response did not include an x-jwt-token header")]
    MissingToken,

    /// An id or path segment was empty, `.` or `..`.
    #[error("invalid resource id {0:?}")]
    InvalidId(String),

    /// Pagination was requested with a zero page size.
    #[error("limit must be at least 1")]
    InvalidLimit,
}

impl Error {
    /// HTTP status reported by FormIO, if the failure came from the API.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
