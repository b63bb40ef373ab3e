//! Error types for the sticky-notes core library.

use thiserror::Error;

/// All errors that can occur within the sticky-notes core library.
#[derive(Debug, Error)]
pub enum StickyNotesError {
    /// The remote store rejected the session credential, or no credential
    /// was available. The session's logout hook has already been invoked.
    #[error("Unauthorized")]
    Unauthorized,

    /// The remote store answered with a non-success status other than 401.
    #[error("Remote error ({status}): {message}")]
    Remote {
        /// HTTP status code returned by the store.
        status: u16,
        /// The store's `detail` message, or the raw body if it had none.
        message: String,
    },

    /// The request never produced a response (connection refused, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response body could not be decoded into the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A reorder request was not a permutation of the current collection.
    #[error("Invalid reorder: {0}")]
    InvalidReorder(String),

    /// A note ID was not present in the current collection.
    #[error("Note not found: {0}")]
    NoteNotFound(i64),

    /// Input was rejected before reaching the network.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// The client configuration could not be used.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration JSON could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias that pins the error type to [`StickyNotesError`].
pub type Result<T> = std::result::Result<T, StickyNotesError>;

impl StickyNotesError {
    /// Returns `true` for failures that originate from talking to the remote store.
    ///
    /// Local precondition failures (`InvalidReorder`, `NoteNotFound`,
    /// `ValidationFailed`) and `Unauthorized` are excluded.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Remote { .. } | Self::Transport(_) | Self::Decode(_)
        )
    }

    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => "Your session has expired, please log in again".to_string(),
            Self::Remote { message, .. } => message.clone(),
            Self::Transport(_) => "Could not reach the notes server".to_string(),
            Self::Decode(_) => "The notes server sent an unexpected response".to_string(),
            Self::InvalidReorder(_) => "The notes changed while you were reordering them".to_string(),
            Self::NoteNotFound(_) => "Note no longer exists".to_string(),
            Self::ValidationFailed(msg) => msg.clone(),
            Self::Config(msg) => format!("Settings error: {msg}"),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
        }
    }
}
