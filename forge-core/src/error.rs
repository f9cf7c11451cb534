use thiserror::Error;

pub type Result<T> = std::result::Result<T, ForgeError>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ForgeError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("A mesocycle named \"{0}\" already exists")]
    DuplicateName(String),

    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("All seven days of the week are already in use")]
    NoDaysAvailable,

    #[error("Record feedback for {0} before logging more sets")]
    FeedbackPending(String),

    #[error("A previous submission is still in progress")]
    SubmissionPending,

    #[error("Not allowed: {0}")]
    Forbidden(String),

    #[error("Invalid email or password")]
    Unauthorized,

    #[error("Storage unavailable: {0}")]
    Backend(#[from] sqlx::Error),

    #[error("Malformed stored data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// The shared async runtime behind the foreign bindings could not start.
    #[cfg(feature = "uniffi")]
    #[error("Runtime unavailable: {0}")]
    Runtime(String),
}

impl ForgeError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        ForgeError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// True for failures of the storage layer rather than of the request.
    pub fn is_backend(&self) -> bool {
        matches!(self, ForgeError::Backend(_))
    }
}
