//! Error types for the manzai compositor and its collaborators

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No clips to compose")]
    EmptyInput,

    #[error("Clip {index}: cannot decode synthesized audio: {reason}")]
    ClipDecode { index: usize, reason: String },

    #[error("Clip {index}: invalid clip: {reason}")]
    InvalidClip { index: usize, reason: String },

    #[error("Synthesis engine returned {status} from /{endpoint}")]
    EngineStatus { endpoint: &'static str, status: u16 },

    #[error("Clip {index}: synthesis failed: {source}")]
    ClipSynthesis {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Audio encoding error: {0}")]
    AudioError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Attach the failing clip index to a collaborator error.
    pub fn for_clip(self, index: usize) -> Self {
        match self {
            err @ (Error::ClipSynthesis { .. }
            | Error::ClipDecode { .. }
            | Error::InvalidClip { .. }) => err,
            other => Error::ClipSynthesis {
                index,
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, looking through clip wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::ClipSynthesis { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether the synthesis engine could not be reached or timed out.
    pub fn is_engine_unavailable(&self) -> bool {
        match self.root() {
            Error::HttpError(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}
