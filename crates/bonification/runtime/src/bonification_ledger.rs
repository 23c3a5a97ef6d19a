//! Bonification Ledger - per-design pools and payouts
//!
//! Wraps the design pools with authorization checks, token movements and
//! receipts. Pool balances are backed one-to-one by tokens held in each
//! design's custody account. A pool only changes after the matching token
//! transfer succeeded, so a failed transfer never leaves a partial debit.

use crate::collaborators::{DesignRegistry, FundsTransfer};
use async_trait::async_trait;
use bonification_types::{
    AccountId, Amount, BonificationError, BonificationResult, DesignDetails, DesignId, DesignPool,
    JobId, LedgerOperation, LedgerReceipt, LicenseSplit,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Default)]
struct LedgerState {
    pools: HashMap<DesignId, DesignPool>,
    managers: HashSet<AccountId>,
    receipts: Vec<LedgerReceipt>,
    /// Custody tokens not backed by any pool after a failed refund
    stranded: HashMap<DesignId, Amount>,
}

impl LedgerState {
    fn pool(&self, design_id: &DesignId) -> BonificationResult<&DesignPool> {
        self.pools
            .get(design_id)
            .ok_or_else(|| BonificationError::DesignNotRegistered(design_id.clone()))
    }

    fn pool_mut(&mut self, design_id: &DesignId) -> BonificationResult<&mut DesignPool> {
        self.pools
            .get_mut(design_id)
            .ok_or_else(|| BonificationError::DesignNotRegistered(design_id.clone()))
    }
}

/// Manages design pools with authorization and receipts
pub struct BonificationLedger {
    admin: AccountId,
    funds: Arc<dyn FundsTransfer>,
    state: Mutex<LedgerState>,
}

impl BonificationLedger {
    pub fn new(admin: AccountId, funds: Arc<dyn FundsTransfer>) -> Self {
        Self {
            admin,
            funds,
            state: Mutex::new(LedgerState::default()),
        }
    }

    pub fn admin(&self) -> &AccountId {
        &self.admin
    }

    // --- Roles ---

    pub async fn add_bonification_manager(
        &self,
        caller: &AccountId,
        manager: AccountId,
    ) -> BonificationResult<()> {
        if caller != &self.admin {
            return Err(BonificationError::NotAuthorized(caller.clone()));
        }
        if manager.is_empty() {
            return Err(BonificationError::InvalidParameters(
                "manager identity must not be empty".into(),
            ));
        }
        info!(manager = %manager, "Bonification manager added");
        self.state.lock().await.managers.insert(manager);
        Ok(())
    }

    pub async fn remove_bonification_manager(
        &self,
        caller: &AccountId,
        manager: &AccountId,
    ) -> BonificationResult<()> {
        if caller != &self.admin {
            return Err(BonificationError::NotAuthorized(caller.clone()));
        }
        if !self.state.lock().await.managers.remove(manager) {
            return Err(BonificationError::NotFound(format!("manager {}", manager)));
        }
        info!(manager = %manager, "Bonification manager removed");
        Ok(())
    }

    pub async fn is_bonification_manager(&self, account: &AccountId) -> bool {
        self.state.lock().await.managers.contains(account)
    }

    // --- Design lifecycle ---

    /// Register a design, funding its pool from the owner's balance
    pub async fn register_design(
        &self,
        owner: &AccountId,
        design_id: DesignId,
        price: Amount,
        initial_pool: Amount,
    ) -> BonificationResult<()> {
        if owner.is_empty() || design_id.is_empty() {
            return Err(BonificationError::InvalidParameters(
                "owner and design identifier must not be empty".into(),
            ));
        }

        let mut state = self.state.lock().await;
        if state.pools.contains_key(&design_id) {
            return Err(BonificationError::InvalidParameters(format!(
                "design {} already registered",
                design_id
            )));
        }

        if !initial_pool.is_zero() {
            self.funds
                .transfer(owner, &AccountId::pool_of(&design_id), initial_pool)
                .await?;
        }

        let pool = DesignPool::new(design_id.clone(), owner.clone(), price).with_pool(initial_pool);
        state.pools.insert(design_id.clone(), pool);
        state.receipts.push(LedgerReceipt::new(
            LedgerOperation::Registration,
            design_id.clone(),
            owner.clone(),
            initial_pool,
            initial_pool,
        ));

        info!(
            design = %design_id,
            owner = %owner,
            price = price.0,
            pool = initial_pool.0,
            "Design registered"
        );
        Ok(())
    }

    /// Sell a license: the owner receives the price minus the pool share
    pub async fn purchase_license(
        &self,
        buyer: &AccountId,
        design_id: &DesignId,
    ) -> BonificationResult<LicenseSplit> {
        let mut state = self.state.lock().await;
        let pool = state.pool(design_id)?;
        if !pool.active {
            return Err(BonificationError::DesignInactive(design_id.clone()));
        }
        if pool.price.is_zero() {
            return Err(BonificationError::InvalidParameters(format!(
                "design {} is not for sale",
                design_id
            )));
        }
        if pool.is_licensed(buyer) {
            return Err(BonificationError::AlreadyLicensed {
                design: design_id.clone(),
                account: buyer.clone(),
            });
        }

        let split = LicenseSplit::of(pool.price);
        let owner = pool.owner.clone();
        let custody = AccountId::pool_of(design_id);

        // The whole price lands in custody first so the buyer is charged once
        self.funds.transfer(buyer, &custody, split.price).await?;
        if let Err(e) = self.funds.transfer(&custody, &owner, split.owner_amount).await {
            warn!(design = %design_id, buyer = %buyer, error = %e, "Owner payment failed, refunding buyer");
            if let Err(refund) = self.funds.transfer(&custody, buyer, split.price).await {
                let stranded = state.stranded.entry(design_id.clone()).or_default();
                *stranded = stranded.checked_add(split.price).unwrap_or(Amount(u64::MAX));
                warn!(
                    design = %design_id,
                    buyer = %buyer,
                    amount = split.price.0,
                    error = %refund,
                    "Refund failed, price left in custody"
                );
                return Err(BonificationError::TransferFailed(format!(
                    "owner payment failed ({}) and refund of {} to {} failed ({})",
                    e, split.price, buyer, refund
                )));
            }
            return Err(e);
        }

        let pool = state.pool_mut(design_id)?;
        pool.deposit(split.bonus_amount)?;
        pool.licensees.insert(buyer.clone());
        pool.total_licenses += 1;
        let pool_after = pool.bonification_pool;

        state.receipts.push(LedgerReceipt::new(
            LedgerOperation::LicenseSale,
            design_id.clone(),
            buyer.clone(),
            split.bonus_amount,
            pool_after,
        ));

        info!(
            design = %design_id,
            buyer = %buyer,
            owner_amount = split.owner_amount.0,
            bonus_amount = split.bonus_amount.0,
            "License purchased"
        );
        Ok(split)
    }

    /// Add funds to a design's pool
    pub async fn top_up_pool(
        &self,
        funder: &AccountId,
        design_id: &DesignId,
        amount: Amount,
    ) -> BonificationResult<Amount> {
        if amount.is_zero() {
            return Err(BonificationError::InvalidParameters(
                "top-up amount must be non-zero".into(),
            ));
        }

        let mut state = self.state.lock().await;
        state.pool(design_id)?;
        self.funds
            .transfer(funder, &AccountId::pool_of(design_id), amount)
            .await?;

        let pool = state.pool_mut(design_id)?;
        pool.deposit(amount)?;
        let pool_after = pool.bonification_pool;
        state.receipts.push(LedgerReceipt::new(
            LedgerOperation::TopUp,
            design_id.clone(),
            funder.clone(),
            amount,
            pool_after,
        ));

        info!(design = %design_id, funder = %funder, amount = amount.0, "Pool topped up");
        Ok(pool_after)
    }

    pub async fn set_design_active(
        &self,
        caller: &AccountId,
        design_id: &DesignId,
        active: bool,
    ) -> BonificationResult<()> {
        let mut state = self.state.lock().await;
        let pool = state.pool_mut(design_id)?;
        if caller != &pool.owner && caller != &self.admin {
            return Err(BonificationError::NotAuthorized(caller.clone()));
        }
        pool.active = active;
        info!(design = %design_id, active, "Design status changed");
        Ok(())
    }

    // --- Payouts ---

    /// Pay a bonification out of a design's pool
    pub async fn process_bonification(
        &self,
        caller: &AccountId,
        design_id: &DesignId,
        recipient: &AccountId,
        amount: Amount,
        job_id: Option<JobId>,
    ) -> BonificationResult<LedgerReceipt> {
        if amount.is_zero() {
            return Err(BonificationError::InvalidParameters(
                "bonification amount must be non-zero".into(),
            ));
        }
        if recipient.is_empty() {
            return Err(BonificationError::InvalidParameters(
                "recipient must not be empty".into(),
            ));
        }

        let mut state = self.state.lock().await;
        let pool = state.pool(design_id)?;

        let authorized =
            state.managers.contains(caller) || caller == &self.admin || caller == &pool.owner;
        if !authorized {
            warn!(caller = %caller, design = %design_id, "Unauthorized bonification attempt");
            return Err(BonificationError::NotAuthorized(caller.clone()));
        }

        if amount > pool.bonification_pool {
            warn!(
                design = %design_id,
                required = amount.0,
                available = pool.bonification_pool.0,
                "Bonification exceeds pool"
            );
            return Err(BonificationError::InsufficientPool {
                required: amount.0,
                available: pool.bonification_pool.0,
            });
        }

        if let Err(e) = self
            .funds
            .transfer(&AccountId::pool_of(design_id), recipient, amount)
            .await
        {
            warn!(design = %design_id, recipient = %recipient, error = %e, "Bonification transfer failed");
            return Err(BonificationError::BonificationFailed(e.to_string()));
        }

        let pool = state.pool_mut(design_id)?;
        pool.withdraw(amount)?;
        let mut receipt = LedgerReceipt::new(
            LedgerOperation::Payout,
            design_id.clone(),
            recipient.clone(),
            amount,
            pool.bonification_pool,
        );
        if let Some(job_id) = job_id {
            receipt = receipt.with_job(job_id);
        }
        state.receipts.push(receipt.clone());

        info!(
            design = %design_id,
            recipient = %recipient,
            amount = amount.0,
            pool_after = receipt.pool_after.0,
            "Bonification paid"
        );
        Ok(receipt)
    }

    // --- Queries ---

    pub async fn design(&self, design_id: &DesignId) -> Option<DesignPool> {
        self.state.lock().await.pools.get(design_id).cloned()
    }

    pub async fn pool_balance(&self, design_id: &DesignId) -> BonificationResult<Amount> {
        Ok(self.state.lock().await.pool(design_id)?.bonification_pool)
    }

    /// Custody tokens of a design that no pool or refund accounts for
    pub async fn stranded_custody(&self, design_id: &DesignId) -> Amount {
        self.state
            .lock()
            .await
            .stranded
            .get(design_id)
            .copied()
            .unwrap_or_default()
    }

    pub async fn receipts(&self) -> Vec<LedgerReceipt> {
        self.state.lock().await.receipts.clone()
    }

    pub async fn receipts_for(&self, design_id: &DesignId) -> Vec<LedgerReceipt> {
        self.state
            .lock()
            .await
            .receipts
            .iter()
            .filter(|r| &r.design_id == design_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DesignRegistry for BonificationLedger {
    async fn is_design_licensed(&self, design_id: &DesignId, account: &AccountId) -> bool {
        self.state
            .lock()
            .await
            .pools
            .get(design_id)
            .map(|pool| pool.is_licensed(account))
            .unwrap_or(false)
    }

    async fn design_details(&self, design_id: &DesignId) -> DesignDetails {
        self.state
            .lock()
            .await
            .pools
            .get(design_id)
            .map(DesignPool::details)
            .unwrap_or_else(DesignDetails::unregistered)
    }

    async fn process_bonification(
        &self,
        caller: &AccountId,
        design_id: &DesignId,
        recipient: &AccountId,
        amount: Amount,
        job_id: Option<JobId>,
    ) -> BonificationResult<LedgerReceipt> {
        BonificationLedger::process_bonification(self, caller, design_id, recipient, amount, job_id)
            .await
    }
}
