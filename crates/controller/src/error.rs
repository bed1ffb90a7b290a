//! Ways in which a call to the controller can fail.
use reqwest::StatusCode;

/// The reason an API call did not succeed.
///
/// A login-required response that was resolved by logging in again is never reported.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never produced a response, or the response body could not be read.
    #[error("Could not reach the controller")]
    Transport(#[from] reqwest::Error),
    /// The response body was not the expected envelope, or `data` did not fit the destination.
    #[error("Could not decode {status} response")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },
    /// The controller answered 200 but reported a logical failure.
    #[error("Controller returned non-ok code {code:?} ({message})")]
    Application { code: String, message: String },
    /// Any other unsuccessful HTTP status.
    #[error("HTTP response {status}")]
    Status { status: StatusCode },
    /// The session expired and logging in again failed.
    #[error("Could not log in again after the session expired")]
    Login(#[source] Box<Error>),
    /// A path segment, such as a site or network id, would not address a single level.
    #[error("Invalid path segment {segment:?}")]
    Path { segment: String },
}

impl Error {
    /// The HTTP status associated with this error, if the controller responded at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Transport(e) => e.status(),
            Self::Decode { status, .. } | Self::Status { status } => Some(*status),
            Self::Application { .. } => Some(StatusCode::OK),
            Self::Login(e) => e.status(),
            Self::Path { .. } => None,
        }
    }
}
