use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Temporary provider unavailability (HTTP 503). The only retryable class.
    #[error("Provider overloaded: {0}")]
    TransientProvider(String),

    #[error("Provider error: {0}")]
    TerminalProvider(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn transient(msg: impl Into<String>) -> Self {
        Self::TransientProvider(msg.into())
    }

    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::TerminalProvider(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Classify a provider failure by its status code.
    ///
    /// A 503 status is a transient overload. Any other status is classified
    /// by its message, so a gateway reporting an upstream 503 is retried too.
    pub fn from_provider_status(status: u16, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        if status == 503 {
            Self::TransientProvider(format!("[503 Service Unavailable] {detail}"))
        } else {
            Self::from_provider_message(format!("[{status}] {detail}"))
        }
    }

    /// Classify a free-form provider error message. A `503` anywhere in the
    /// message marks it as transient overload.
    pub fn from_provider_message(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        if msg.contains("503") {
            Self::TransientProvider(msg)
        } else {
            Self::TerminalProvider(msg)
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientProvider(_))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Short class name used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "validation",
            Self::Configuration(_) => "configuration",
            Self::TransientProvider(_) => "transient_provider",
            Self::TerminalProvider(_) => "terminal_provider",
            Self::Network(_) => "network",
            Self::NotFound(_) => "not_found",
            Self::StorageError(_) => "storage",
            Self::IoError(_) => "io",
            Self::Internal(_) => "internal",
        }
    }
}
