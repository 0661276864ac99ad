use {
    super::AuctionStatus,
    std::fmt::{
        Display,
        Formatter,
    },
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// An auction with the same id already exists, or the stored status no longer
    /// matches the expected prior status of a conditional update
    Conflict,
    /// The auction was not found
    NotFound,
    /// The storage backend could not be reached
    Unavailable,
    /// The calling context was cancelled
    Cancelled,
    /// The deadline of the calling context passed
    Timeout,
    /// The input or a persisted record has an invalid shape
    Malformed(String),
    /// The requested status change is not allowed
    InvalidTransition {
        from: AuctionStatus,
        to:   AuctionStatus,
    },
}

impl StoreError {
    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Conflict => "conflict",
            StoreError::NotFound => "not_found",
            StoreError::Unavailable => "unavailable",
            StoreError::Cancelled => "cancelled",
            StoreError::Timeout => "timeout",
            StoreError::Malformed(_) => "malformed",
            StoreError::InvalidTransition { .. } => "invalid_transition",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Conflict => write!(f, "Auction conflicts with the stored record"),
            StoreError::NotFound => write!(f, "Auction with the specified id was not found"),
            StoreError::Unavailable => write!(f, "Auction store is temporarily unavailable"),
            StoreError::Cancelled => write!(f, "Operation was cancelled"),
            StoreError::Timeout => write!(f, "Operation deadline exceeded"),
            StoreError::Malformed(msg) => write!(f, "Malformed input: {}", msg),
            StoreError::InvalidTransition { from, to } => {
                write!(f, "Invalid auction status transition: {} -> {}", from, to)
            }
        }
    }
}

impl std::error::Error for StoreError {}
