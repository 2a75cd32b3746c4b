use thiserror::Error;

/// Errors that can occur while running the handshake
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Consumer went away before the handshake completed
    #[error("consumer disconnected before the handshake completed")]
    ConsumerDisconnected,

    /// Producer went away before the handshake completed
    #[error("producer disconnected before the handshake completed")]
    ProducerDisconnected,

    /// The other end of a channel was dropped
    #[error("channel peer disconnected")]
    Disconnected,

    /// Operation invoked on a side that already reached a terminal state
    #[error("side already terminated")]
    AlreadyTerminated,

    /// Persisting a snapshot failed
    #[error("io error: {0}")]
    Io(String),
}

impl Error {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Error::ConsumerDisconnected => "consumer_disconnected",
            Error::ProducerDisconnected => "producer_disconnected",
            Error::Disconnected => "disconnected",
            Error::AlreadyTerminated => "already_terminated",
            Error::Io(_) => "io",
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
