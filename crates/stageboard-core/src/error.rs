use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("A drag of card {card_id} is already in progress")]
    SessionActive { card_id: String },

    #[error("Card {card_id} is waiting for transition confirmation")]
    GatePending { card_id: String },

    #[error("No transition is waiting for confirmation")]
    NoPendingTransition,

    #[error("Reorder rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl BoardError {
    /// Whether the error came from the persistence side of the boundary
    /// rather than from misuse of the engine.
    pub fn is_persistence_failure(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Io(_) | Self::Serialization(_) | Self::Rejected { .. }
        )
    }
}
