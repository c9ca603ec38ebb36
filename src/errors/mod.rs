use thiserror::Error;

/// Broad classes of failure, as seen by the caller driving a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad caller input; nothing was written.
    Input,
    /// A player reference could not be mapped to a roster entry.
    Resolution,
    /// The underlying store failed.
    Store,
}

#[derive(Debug, Error)]
pub enum LadderError {
    #[error("No players assigned")]
    EmptyPlayerPool,

    #[error("Field count must be at least 1, got {0}")]
    InvalidFieldCount(u32),

    #[error("Invalid score '{value}' for field {field}")]
    InvalidScore { field: u32, value: String },

    #[error("Invalid field number '{0}'")]
    InvalidFieldNumber(String),

    #[error("Invalid score report '{0}', expected FIELD:A-B")]
    InvalidScoreReport(String),

    #[error("No scores to submit")]
    NoScores,

    #[error("No match on field {field} in session {session_id}")]
    UnknownField { session_id: i64, field: u32 },

    #[error("Field {0} reported more than once")]
    DuplicateField(u32),

    #[error("Scores for field {0} were already submitted")]
    AlreadySubmitted(u32),

    #[error("No session has been scheduled yet")]
    NoSession,

    #[error("Session {0} does not exist")]
    UnknownSession(i64),

    #[error("Player name must not be empty")]
    EmptyPlayerName,

    #[error("Player '{0}' already exists")]
    DuplicatePlayer(String),

    #[error("Unknown player '{0}'")]
    UnknownPlayer(String),

    #[error("Unknown player id {0}")]
    UnknownPlayerId(i64),

    #[error(transparent)]
    Store(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl LadderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LadderError::UnknownPlayer(_) | LadderError::UnknownPlayerId(_) => {
                ErrorKind::Resolution
            }
            LadderError::Store(_) | LadderError::Sqlite(_) => ErrorKind::Store,
            _ => ErrorKind::Input,
        }
    }
}

pub type Result<T> = std::result::Result<T, LadderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(LadderError::EmptyPlayerPool.kind(), ErrorKind::Input);
        assert_eq!(LadderError::DuplicateField(2).kind(), ErrorKind::Input);
        assert_eq!(
            LadderError::UnknownPlayer("Ana".to_string()).kind(),
            ErrorKind::Resolution
        );
        assert_eq!(LadderError::UnknownPlayerId(7).kind(), ErrorKind::Resolution);
        assert_eq!(
            LadderError::Store(anyhow::anyhow!("disk full")).kind(),
            ErrorKind::Store
        );
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err = LadderError::from(anyhow::anyhow!("Failed to insert match"));
        assert_eq!(err.to_string(), "Failed to insert match");
    }
}
