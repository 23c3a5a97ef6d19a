//! Ledger types: design pools, license splits and receipts
//!
//! A design pool holds the funds available for bonifications on jobs that
//! manufacture that design. It's a data structure, not an execution engine.

use crate::{AccountId, Amount, BonificationError, BonificationResult, DesignId, JobId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Share of every license sale routed into the design's pool
pub const LICENSE_BONUS_PERCENT: u64 = 10;

/// Per-design bonification pool
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DesignPool {
    pub design_id: DesignId,
    pub owner: AccountId,
    pub price: Amount,
    pub bonification_pool: Amount,
    pub total_licenses: u64,
    pub active: bool,
    pub licensees: BTreeSet<AccountId>,
    pub created_at: DateTime<Utc>,
}

impl DesignPool {
    pub fn new(design_id: DesignId, owner: AccountId, price: Amount) -> Self {
        Self {
            design_id,
            owner,
            price,
            bonification_pool: Amount::zero(),
            total_licenses: 0,
            active: true,
            licensees: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_pool(mut self, pool: Amount) -> Self {
        self.bonification_pool = pool;
        self
    }

    /// Credit the pool
    pub fn deposit(&mut self, amount: Amount) -> BonificationResult<()> {
        self.bonification_pool = self.bonification_pool.checked_add(amount).ok_or_else(|| {
            BonificationError::InvalidParameters(format!(
                "pool of {} would overflow",
                self.design_id
            ))
        })?;
        Ok(())
    }

    /// Debit the pool (returns error if insufficient)
    pub fn withdraw(&mut self, amount: Amount) -> BonificationResult<()> {
        self.bonification_pool =
            self.bonification_pool
                .checked_sub(amount)
                .ok_or(BonificationError::InsufficientPool {
                    required: amount.0,
                    available: self.bonification_pool.0,
                })?;
        Ok(())
    }

    pub fn is_licensed(&self, account: &AccountId) -> bool {
        self.licensees.contains(account)
    }

    pub fn details(&self) -> DesignDetails {
        DesignDetails {
            registered: true,
            owner: self.owner.clone(),
            price: self.price,
            pool: self.bonification_pool,
            license_count: self.total_licenses,
            active: self.active,
        }
    }
}

/// Read-only view of a design as seen by other components
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignDetails {
    pub registered: bool,
    pub owner: AccountId,
    pub price: Amount,
    pub pool: Amount,
    pub license_count: u64,
    pub active: bool,
}

impl DesignDetails {
    /// Details reported for an unknown design
    pub fn unregistered() -> Self {
        Self {
            registered: false,
            owner: AccountId::new(""),
            price: Amount::zero(),
            pool: Amount::zero(),
            license_count: 0,
            active: false,
        }
    }
}

/// How a license payment is divided
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseSplit {
    pub price: Amount,
    pub owner_amount: Amount,
    pub bonus_amount: Amount,
}

impl LicenseSplit {
    /// `owner_amount + bonus_amount == price` always holds
    pub fn of(price: Amount) -> Self {
        let bonus_amount = price.percent(LICENSE_BONUS_PERCENT);
        Self {
            price,
            owner_amount: Amount(price.0 - bonus_amount.0),
            bonus_amount,
        }
    }
}

/// Types of ledger operations
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerOperation {
    /// Design registered with an initial pool
    Registration,
    /// Bonus share of a license sale
    LicenseSale,
    /// Explicit pool top-up
    TopUp,
    /// Bonification paid to an operator
    Payout,
}

/// A receipt for a pool movement
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerReceipt {
    pub receipt_id: String,
    pub operation: LedgerOperation,
    pub design_id: DesignId,
    /// Counterparty: licensee, funder or payout recipient
    pub account: AccountId,
    pub amount: Amount,
    pub pool_after: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    pub timestamp: DateTime<Utc>,
}

impl LedgerReceipt {
    pub fn new(
        operation: LedgerOperation,
        design_id: DesignId,
        account: AccountId,
        amount: Amount,
        pool_after: Amount,
    ) -> Self {
        Self {
            receipt_id: uuid::Uuid::new_v4().to_string(),
            operation,
            design_id,
            account,
            amount,
            pool_after,
            job_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_job(mut self, job_id: JobId) -> Self {
        self.job_id = Some(job_id);
        self
    }
}
