//! Chart of accounts maintenance and lookup.

use chrono::Utc;

use forgeledger_accounting::{Account, AccountIndex, AccountView, NewAccount, StatusFilter};
use forgeledger_core::{AccountId, CancellationToken, DomainError, TenantContext, TenantId};

use crate::services::error::{ServiceError, ServiceResult};
use crate::store::LedgerStore;

/// The tenant's chart of accounts.
#[derive(Debug)]
pub struct AccountRegistry<S> {
    store: S,
}

impl<S> AccountRegistry<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

/// Load every non-deleted account of the tenant into an id-indexed arena.
///
/// Deactivated accounts are included: their historical lines still count.
pub(crate) fn load_index<S: LedgerStore>(
    store: &S,
    tenant_id: TenantId,
) -> ServiceResult<AccountIndex> {
    Ok(AccountIndex::new(store.accounts(tenant_id, StatusFilter::ActiveOnly)?))
}

impl<S> AccountRegistry<S>
where
    S: LedgerStore,
{
    pub fn create_account(
        &self,
        ctx: &TenantContext,
        new: NewAccount,
        cancel: &CancellationToken,
    ) -> ServiceResult<AccountView> {
        let tenant_id = ctx.require_tenant()?;
        let _span = tracing::info_span!("create_account", %tenant_id, code = %new.code).entered();
        cancel.check()?;

        if let Some(parent_id) = new.parent_account_id {
            let index = load_index(&self.store, tenant_id)?;
            if index.get(&parent_id).is_none() {
                return Err(DomainError::not_found(format!("parent account {parent_id}")).into());
            }
        }

        let account = Account::open(tenant_id, new, Utc::now())?;
        let view = AccountView::from(&account);
        cancel.check()?;
        self.store.insert_account(tenant_id, account)?;

        tracing::info!(account_id = %view.id, "account created");
        Ok(view)
    }

    /// The live account with `code`.
    pub fn get_by_code(
        &self,
        ctx: &TenantContext,
        code: &str,
        cancel: &CancellationToken,
    ) -> ServiceResult<AccountView> {
        let tenant_id = ctx.require_tenant()?;
        cancel.check()?;

        let code = code.trim();
        let index = load_index(&self.store, tenant_id)?;
        let found = index.live_with_code(code).next().map(AccountView::from);
        found.ok_or_else(|| ServiceError::NotFound(format!("account code '{code}'")))
    }

    /// Every non-deleted account, sorted by code.
    pub fn list_accounts(
        &self,
        ctx: &TenantContext,
        cancel: &CancellationToken,
    ) -> ServiceResult<Vec<AccountView>> {
        let tenant_id = ctx.require_tenant()?;
        cancel.check()?;

        let mut accounts: Vec<AccountView> = self
            .store
            .accounts(tenant_id, StatusFilter::ActiveOnly)?
            .iter()
            .map(AccountView::from)
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }

    pub fn deactivate(
        &self,
        ctx: &TenantContext,
        account_id: AccountId,
        cancel: &CancellationToken,
    ) -> ServiceResult<AccountView> {
        self.set_active(ctx, account_id, false, cancel)
    }

    pub fn reactivate(
        &self,
        ctx: &TenantContext,
        account_id: AccountId,
        cancel: &CancellationToken,
    ) -> ServiceResult<AccountView> {
        self.set_active(ctx, account_id, true, cancel)
    }

    fn set_active(
        &self,
        ctx: &TenantContext,
        account_id: AccountId,
        active: bool,
        cancel: &CancellationToken,
    ) -> ServiceResult<AccountView> {
        let tenant_id = ctx.require_tenant()?;
        let _span =
            tracing::info_span!("set_account_active", %tenant_id, %account_id, active).entered();
        cancel.check()?;

        let account = self.store.set_account_active(tenant_id, account_id, active)?;
        Ok(AccountView::from(&account))
    }

    /// Soft-delete; the account disappears from statements and its code becomes reusable.
    pub fn soft_delete(
        &self,
        ctx: &TenantContext,
        account_id: AccountId,
        cancel: &CancellationToken,
    ) -> ServiceResult<()> {
        let tenant_id = ctx.require_tenant()?;
        let _span = tracing::info_span!("soft_delete_account", %tenant_id, %account_id).entered();
        cancel.check()?;

        self.store.soft_delete_account(tenant_id, account_id)?;
        tracing::info!("account soft-deleted");
        Ok(())
    }
}
