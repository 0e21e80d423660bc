use thiserror::Error;

/// Errors surfaced by the capture/speech pipeline.
///
/// Nothing here is fatal to the process: device and capability failures
/// degrade to text-only flows, transport failures become error-flagged
/// transcript messages, and validation failures are reported before any
/// network call is issued.
#[derive(Debug, Error)]
pub enum Error {
    /// Camera/microphone permission denied or no device available.
    #[error("device access failed: {0}")]
    DeviceAccess(String),

    /// The runtime has no recognition or synthesis engine.
    #[error("{0} is not supported in this runtime")]
    UnsupportedCapability(&'static str),

    /// Recording requested without an active media stream.
    #[error("no active media stream")]
    RecordingState,

    /// Backend call failed (connection, non-2xx, malformed body).
    #[error("transport failure: {0}")]
    Transport(String),

    /// Local precondition failure; no backend call was made.
    #[error("{0}")]
    Validation(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
