use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use forgeledger_accounting::{Account, JournalEntry, StatusFilter};
use forgeledger_core::{AccountId, DateRange, TenantId};

/// Ledger store operation error.
///
/// These are **infrastructure errors** (availability, isolation, uniqueness at the storage
/// layer) as opposed to domain errors (validation, invariants).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("tenant isolation violation: {0}")]
    TenantIsolation(String),
}

/// Journal read criteria. Every field is applied by the store, never implicitly.
#[derive(Debug, Clone, Default)]
pub struct JournalFilter {
    /// Applied to entries and, independently, to each entry's lines.
    pub status: StatusFilter,
    /// Inclusive window on the entry date.
    pub range: DateRange,
    /// Exact match on the entry's source module.
    pub source_module: Option<String>,
    /// When set, only lines against these accounts are returned, and entries left
    /// without any line are dropped.
    pub touching_accounts: Option<HashSet<AccountId>>,
}

impl JournalFilter {
    pub fn active() -> Self {
        Self::default()
    }

    pub fn within(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    pub fn from_source(mut self, source_module: impl Into<String>) -> Self {
        self.source_module = Some(source_module.into());
        self
    }

    pub fn touching(mut self, accounts: impl IntoIterator<Item = AccountId>) -> Self {
        self.touching_accounts = Some(accounts.into_iter().collect());
        self
    }
}

/// Tenant-scoped store of accounts and the append-only journal.
///
/// ## Tenant Isolation
///
/// Every call carries the tenant explicitly. Implementations must never return a record
/// from another tenant and must reject writes whose payload names a different tenant.
///
/// ## Append-only journal
///
/// Entries are appended once and never updated. Accounts are only deactivated or
/// soft-deleted, so lines stay resolvable.
pub trait LedgerStore: Send + Sync {
    fn accounts(
        &self,
        tenant_id: TenantId,
        status: StatusFilter,
    ) -> Result<Vec<Account>, StoreError>;

    /// Insert one account; `Conflict` when a live account already uses its code.
    fn insert_account(&self, tenant_id: TenantId, account: Account) -> Result<(), StoreError>;

    /// Atomically insert every candidate whose code has no live account yet.
    ///
    /// The existence check and the inserts form one unit of work. Returns the accounts
    /// actually created, in candidate order.
    fn insert_accounts_if_absent(
        &self,
        tenant_id: TenantId,
        candidates: Vec<Account>,
    ) -> Result<Vec<Account>, StoreError>;

    /// Toggle `is_active`. Reactivation fails with `Conflict` if the code is taken.
    fn set_account_active(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
        active: bool,
    ) -> Result<Account, StoreError>;

    fn soft_delete_account(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> Result<Account, StoreError>;

    fn journal_entries(
        &self,
        tenant_id: TenantId,
        filter: &JournalFilter,
    ) -> Result<Vec<JournalEntry>, StoreError>;

    fn append_entry(&self, tenant_id: TenantId, entry: JournalEntry) -> Result<(), StoreError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn accounts(
        &self,
        tenant_id: TenantId,
        status: StatusFilter,
    ) -> Result<Vec<Account>, StoreError> {
        (**self).accounts(tenant_id, status)
    }

    fn insert_account(&self, tenant_id: TenantId, account: Account) -> Result<(), StoreError> {
        (**self).insert_account(tenant_id, account)
    }

    fn insert_accounts_if_absent(
        &self,
        tenant_id: TenantId,
        candidates: Vec<Account>,
    ) -> Result<Vec<Account>, StoreError> {
        (**self).insert_accounts_if_absent(tenant_id, candidates)
    }

    fn set_account_active(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
        active: bool,
    ) -> Result<Account, StoreError> {
        (**self).set_account_active(tenant_id, account_id, active)
    }

    fn soft_delete_account(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> Result<Account, StoreError> {
        (**self).soft_delete_account(tenant_id, account_id)
    }

    fn journal_entries(
        &self,
        tenant_id: TenantId,
        filter: &JournalFilter,
    ) -> Result<Vec<JournalEntry>, StoreError> {
        (**self).journal_entries(tenant_id, filter)
    }

    fn append_entry(&self, tenant_id: TenantId, entry: JournalEntry) -> Result<(), StoreError> {
        (**self).append_entry(tenant_id, entry)
    }
}
