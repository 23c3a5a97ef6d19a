//! Error types for the bonification engine

use crate::{AccountId, Category, DesignId, JobId};

/// Errors that can occur in bonification operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BonificationError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("SLA metrics not set for {0}")]
    MetricsNotSet(JobId),

    #[error("SLA metrics inactive for {0}")]
    MetricsInactive(JobId),

    #[error("Job already evaluated: {0}")]
    AlreadyEvaluated(JobId),

    #[error("Job already completed: {0}")]
    JobAlreadyCompleted(JobId),

    #[error("No pending bonification for {0}")]
    NoPendingBonification(JobId),

    #[error("Performance score {score} below required {required}")]
    ScoreBelowThreshold { score: u32, required: u32 },

    #[error("Insufficient history for {category}: have {have}, need {need}")]
    InsufficientHistory {
        category: Category,
        have: usize,
        need: usize,
    },

    #[error("Insufficient pool: required {required}, available {available}")]
    InsufficientPool { required: u64, available: u64 },

    #[error("Design not registered: {0}")]
    DesignNotRegistered(DesignId),

    #[error("Design not active: {0}")]
    DesignInactive(DesignId),

    #[error("{account} already holds a license for {design}")]
    AlreadyLicensed { design: DesignId, account: AccountId },

    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    #[error("Bonification failed: {0}")]
    BonificationFailed(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(AccountId),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for bonification operations
pub type BonificationResult<T> = Result<T, BonificationError>;
