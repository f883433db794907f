use std::collections::HashMap;
use std::sync::RwLock;

use forgeledger_accounting::{Account, JournalEntry, RecordStatus, StatusFilter};
use forgeledger_core::{AccountId, TenantId};

use super::r#trait::{JournalFilter, LedgerStore, StoreError};

#[derive(Debug, Default)]
struct TenantLedger {
    accounts: Vec<Account>,
    entries: Vec<JournalEntry>,
}

impl TenantLedger {
    fn live_code_taken(&self, code: &str, except: Option<AccountId>) -> bool {
        self.accounts
            .iter()
            .any(|a| a.is_live() && a.code == code && Some(a.id) != except)
    }

    fn account_mut(&mut self, account_id: AccountId) -> Result<&mut Account, StoreError> {
        self.accounts
            .iter_mut()
            .find(|a| a.id == account_id)
            .ok_or_else(|| StoreError::NotFound(format!("account {account_id}")))
    }
}

/// In-memory, tenant-partitioned ledger store.
///
/// Intended for tests/dev. A single `RwLock` guards all tenants, so every write is
/// atomic with respect to readers.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    tenants: RwLock<HashMap<TenantId, TenantLedger>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("lock poisoned".to_string())
    }

    fn ensure_tenant(expected: TenantId, actual: TenantId, what: &str) -> Result<(), StoreError> {
        if expected != actual {
            return Err(StoreError::TenantIsolation(format!(
                "{what} belongs to tenant {actual}, not {expected}"
            )));
        }
        Ok(())
    }
}

fn project_entry(entry: &JournalEntry, filter: &JournalFilter) -> Option<JournalEntry> {
    if !filter.status.admits(entry.status) || !filter.range.contains(entry.date) {
        return None;
    }
    if let Some(module) = &filter.source_module {
        if entry.source_module != *module {
            return None;
        }
    }

    let lines: Vec<_> = entry
        .lines
        .iter()
        .filter(|l| filter.status.admits(l.status))
        .filter(|l| {
            filter
                .touching_accounts
                .as_ref()
                .is_none_or(|ids| ids.contains(&l.account_id))
        })
        .cloned()
        .collect();

    if filter.touching_accounts.is_some() && lines.is_empty() {
        return None;
    }

    Some(JournalEntry {
        lines,
        ..entry.clone()
    })
}

impl LedgerStore for InMemoryLedgerStore {
    fn accounts(
        &self,
        tenant_id: TenantId,
        status: StatusFilter,
    ) -> Result<Vec<Account>, StoreError> {
        let tenants = self.tenants.read().map_err(|_| Self::poisoned())?;
        Ok(tenants
            .get(&tenant_id)
            .map(|t| {
                t.accounts
                    .iter()
                    .filter(|a| status.admits(a.status))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn insert_account(&self, tenant_id: TenantId, account: Account) -> Result<(), StoreError> {
        Self::ensure_tenant(tenant_id, account.tenant_id, "account")?;

        let mut tenants = self.tenants.write().map_err(|_| Self::poisoned())?;
        let ledger = tenants.entry(tenant_id).or_default();

        if ledger.live_code_taken(&account.code, None) {
            return Err(StoreError::Conflict(format!(
                "account code '{}' already exists",
                account.code
            )));
        }

        ledger.accounts.push(account);
        Ok(())
    }

    fn insert_accounts_if_absent(
        &self,
        tenant_id: TenantId,
        candidates: Vec<Account>,
    ) -> Result<Vec<Account>, StoreError> {
        for c in &candidates {
            Self::ensure_tenant(tenant_id, c.tenant_id, "account")?;
        }

        let mut tenants = self.tenants.write().map_err(|_| Self::poisoned())?;
        let ledger = tenants.entry(tenant_id).or_default();

        let mut created = Vec::new();
        for candidate in candidates {
            if ledger.live_code_taken(&candidate.code, None) {
                continue;
            }
            ledger.accounts.push(candidate.clone());
            created.push(candidate);
        }

        Ok(created)
    }

    fn set_account_active(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
        active: bool,
    ) -> Result<Account, StoreError> {
        let mut tenants = self.tenants.write().map_err(|_| Self::poisoned())?;
        let ledger = tenants
            .get_mut(&tenant_id)
            .ok_or_else(|| StoreError::NotFound(format!("account {account_id}")))?;

        let code = ledger.account_mut(account_id)?.code.clone();
        if active && ledger.live_code_taken(&code, Some(account_id)) {
            return Err(StoreError::Conflict(format!(
                "account code '{code}' already exists"
            )));
        }

        let account = ledger.account_mut(account_id)?;
        account.is_active = active;
        Ok(account.clone())
    }

    fn soft_delete_account(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> Result<Account, StoreError> {
        let mut tenants = self.tenants.write().map_err(|_| Self::poisoned())?;
        let ledger = tenants
            .get_mut(&tenant_id)
            .ok_or_else(|| StoreError::NotFound(format!("account {account_id}")))?;

        let account = ledger.account_mut(account_id)?;
        account.status = RecordStatus::Deleted;
        Ok(account.clone())
    }

    fn journal_entries(
        &self,
        tenant_id: TenantId,
        filter: &JournalFilter,
    ) -> Result<Vec<JournalEntry>, StoreError> {
        let tenants = self.tenants.read().map_err(|_| Self::poisoned())?;
        Ok(tenants
            .get(&tenant_id)
            .map(|t| t.entries.iter().filter_map(|e| project_entry(e, filter)).collect())
            .unwrap_or_default())
    }

    fn append_entry(&self, tenant_id: TenantId, entry: JournalEntry) -> Result<(), StoreError> {
        Self::ensure_tenant(tenant_id, entry.tenant_id, "journal entry")?;

        let mut tenants = self.tenants.write().map_err(|_| Self::poisoned())?;
        let ledger = tenants.entry(tenant_id).or_default();

        if ledger.entries.iter().any(|e| e.id == entry.id) {
            return Err(StoreError::Conflict(format!(
                "journal entry {} already posted",
                entry.id
            )));
        }

        ledger.entries.push(entry);
        Ok(())
    }
}
