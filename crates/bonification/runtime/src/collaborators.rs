//! Collaborator interfaces consumed by the engine
//!
//! The scorer, the evaluator and the ledger talk to each other and to the
//! outside world only through these traits. In-memory implementations of
//! the identity and token collaborators are provided for tests and local
//! simulation.

use async_trait::async_trait;
use bonification_types::{
    AccountId, Amount, BonificationError, BonificationResult, DesignDetails, DesignId, JobId,
    LedgerReceipt,
};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use thiserror::Error;
use tracing::debug;

/// Why a performance score could not be produced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreUnavailable {
    #[error("scorer call timed out")]
    Timeout,
    #[error("scorer rejected the request: {0}")]
    Rejected(String),
}

/// Source of performance scores for the evaluator
#[async_trait]
pub trait ScoreProvider: Send + Sync {
    /// Compute the current score without mutating anything
    async fn calculate_performance_score(&self, job_id: JobId) -> Result<u32, ScoreUnavailable>;

    /// Compute, cache and complete the job, returning its score
    async fn evaluate_performance(&self, job_id: JobId) -> Result<u32, ScoreUnavailable>;
}

/// Design registry and pool ledger boundary
#[async_trait]
pub trait DesignRegistry: Send + Sync {
    async fn is_design_licensed(&self, design_id: &DesignId, account: &AccountId) -> bool;

    /// Details of a design; unknown designs report `registered == false`
    async fn design_details(&self, design_id: &DesignId) -> DesignDetails;

    /// Pay `amount` from the design's pool to `recipient`
    async fn process_bonification(
        &self,
        caller: &AccountId,
        design_id: &DesignId,
        recipient: &AccountId,
        amount: Amount,
        job_id: Option<JobId>,
    ) -> BonificationResult<LedgerReceipt>;
}

/// Identity collaborator deciding who may act as an operator
#[async_trait]
pub trait OperatorDirectory: Send + Sync {
    async fn is_operator_authenticated(&self, account: &AccountId) -> bool;
}

/// Fungible token movements
#[async_trait]
pub trait FundsTransfer: Send + Sync {
    async fn transfer(&self, from: &AccountId, to: &AccountId, amount: Amount)
        -> BonificationResult<()>;
}

/// Fixed set of authenticated operators
#[derive(Debug, Default)]
pub struct StaticOperatorDirectory {
    operators: RwLock<HashSet<AccountId>>,
}

impl StaticOperatorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operators(operators: impl IntoIterator<Item = AccountId>) -> Self {
        Self {
            operators: RwLock::new(operators.into_iter().collect()),
        }
    }

    pub fn authenticate(&self, account: AccountId) {
        if let Ok(mut operators) = self.operators.write() {
            operators.insert(account);
        }
    }

    pub fn revoke(&self, account: &AccountId) {
        if let Ok(mut operators) = self.operators.write() {
            operators.remove(account);
        }
    }
}

#[async_trait]
impl OperatorDirectory for StaticOperatorDirectory {
    async fn is_operator_authenticated(&self, account: &AccountId) -> bool {
        self.operators
            .read()
            .map(|operators| operators.contains(account))
            .unwrap_or(false)
    }
}

/// Balance map standing in for the token ledger
#[derive(Debug, Default)]
pub struct InMemoryTokenLedger {
    balances: RwLock<HashMap<AccountId, Amount>>,
}

impl InMemoryTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account out of thin air
    pub fn mint(&self, account: &AccountId, amount: Amount) -> BonificationResult<()> {
        let mut balances = self
            .balances
            .write()
            .map_err(|_| BonificationError::TransferFailed("token ledger poisoned".into()))?;
        let balance = balances.entry(account.clone()).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| BonificationError::TransferFailed("balance overflow".into()))?;
        Ok(())
    }

    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances
            .read()
            .ok()
            .and_then(|balances| balances.get(account).copied())
            .unwrap_or_default()
    }
}

#[async_trait]
impl FundsTransfer for InMemoryTokenLedger {
    async fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> BonificationResult<()> {
        let mut balances = self
            .balances
            .write()
            .map_err(|_| BonificationError::TransferFailed("token ledger poisoned".into()))?;

        let available = balances.get(from).copied().unwrap_or_default();
        let remaining = available.checked_sub(amount).ok_or_else(|| {
            BonificationError::TransferFailed(format!(
                "{} holds {}, cannot send {}",
                from, available, amount
            ))
        })?;
        if from == to {
            return Ok(());
        }
        let credited = balances
            .get(to)
            .copied()
            .unwrap_or_default()
            .checked_add(amount)
            .ok_or_else(|| BonificationError::TransferFailed("balance overflow".into()))?;

        balances.insert(from.clone(), remaining);
        balances.insert(to.clone(), credited);

        debug!(from = %from, to = %to, amount = amount.0, "Tokens transferred");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_operator_directory() {
        let directory = StaticOperatorDirectory::with_operators([AccountId::new("op-1")]);
        assert!(directory.is_operator_authenticated(&AccountId::new("op-1")).await);
        assert!(!directory.is_operator_authenticated(&AccountId::new("op-2")).await);

        directory.authenticate(AccountId::new("op-2"));
        assert!(directory.is_operator_authenticated(&AccountId::new("op-2")).await);

        directory.revoke(&AccountId::new("op-1"));
        assert!(!directory.is_operator_authenticated(&AccountId::new("op-1")).await);
    }

    #[tokio::test]
    async fn test_token_transfer() {
        let tokens = InMemoryTokenLedger::new();
        let alice = AccountId::new("alice");
        let bob = AccountId::new("bob");

        tokens.mint(&alice, Amount::new(100)).unwrap();
        tokens.transfer(&alice, &bob, Amount::new(40)).await.unwrap();
        assert_eq!(tokens.balance_of(&alice), Amount::new(60));
        assert_eq!(tokens.balance_of(&bob), Amount::new(40));

        // Over-spend fails and leaves balances untouched
        let result = tokens.transfer(&alice, &bob, Amount::new(61)).await;
        assert!(matches!(result, Err(BonificationError::TransferFailed(_))));
        assert_eq!(tokens.balance_of(&alice), Amount::new(60));
        assert_eq!(tokens.balance_of(&bob), Amount::new(40));
    }
}
