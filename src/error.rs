use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    // Caller errors
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    // Registry errors
    #[error("Chain node not found: {0}")]
    NodeNotFound(String),

    #[error("Chain node {0} has no configured balance type")]
    BalanceTypeMissing(i32),

    #[error("Unsupported balance source: {0}")]
    UnsupportedSource(String),

    // Provider errors
    #[error("Balance fetch failed: {0}")]
    ProviderFetchFailed(String),

    #[error("Balance fetch timed out after {0}s")]
    FetchTimeout(u64),

    // Evaluation errors
    #[error("Requirement could not be resolved: {0}")]
    RequirementUnresolved(#[source] Box<GateError>),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // System errors
    #[error("Health check failed: {0}")]
    HealthCheck(String),
}

impl GateError {
    /// Check if error is retryable (transient network conditions).
    pub fn is_retryable(&self) -> bool {
        match self {
            GateError::ProviderFetchFailed(_) | GateError::FetchTimeout(_) => true,
            GateError::RequirementUnresolved(cause) => cause.is_retryable(),
            _ => false,
        }
    }

    /// Get error category for logging/metrics.
    pub fn category(&self) -> &'static str {
        match self {
            GateError::InvalidArguments(_) | GateError::InvalidAddress(_) => "caller",

            GateError::NodeNotFound(_)
            | GateError::BalanceTypeMissing(_)
            | GateError::UnsupportedSource(_) => "registry",

            GateError::ProviderFetchFailed(_) | GateError::FetchTimeout(_) => "provider",

            GateError::RequirementUnresolved(_) => "evaluation",

            GateError::Database(_) => "storage",

            GateError::HealthCheck(_) => "system",
        }
    }
}

// Result type alias for convenience
pub type GateResult<T> = Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(GateError::ProviderFetchFailed("rpc down".into()).is_retryable());
        assert!(GateError::FetchTimeout(10).is_retryable());
        assert!(!GateError::NodeNotFound("node id 4".into()).is_retryable());
        assert!(!GateError::InvalidArguments("bad".into()).is_retryable());
    }

    #[test]
    fn test_unresolved_requirement_inherits_retryability() {
        let transient =
            GateError::RequirementUnresolved(Box::new(GateError::FetchTimeout(10)));
        assert!(transient.is_retryable());
        assert_eq!(transient.category(), "evaluation");

        let permanent =
            GateError::RequirementUnresolved(Box::new(GateError::NodeNotFound("x".into())));
        assert!(!permanent.is_retryable());
    }

    #[test]
    fn test_categories() {
        assert_eq!(GateError::InvalidAddress("0x".into()).category(), "caller");
        assert_eq!(GateError::BalanceTypeMissing(7).category(), "registry");
        assert_eq!(GateError::FetchTimeout(5).category(), "provider");
    }
}
