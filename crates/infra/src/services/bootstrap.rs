//! Idempotent seeding of the standard chart of accounts.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use forgeledger_accounting::{Account, AccountView, STANDARD_CHART, StatusFilter};
use forgeledger_core::{CancellationToken, TenantContext};

use crate::services::error::ServiceResult;
use crate::store::LedgerStore;

/// Outcome of [`ChartBootstrapper::import_standard_chart`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub created: usize,
    pub skipped: usize,
    /// Every live account of the tenant after the import, sorted by code.
    pub accounts: Vec<AccountView>,
}

#[derive(Debug)]
pub struct ChartBootstrapper<S> {
    store: S,
}

impl<S> ChartBootstrapper<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> ChartBootstrapper<S>
where
    S: LedgerStore,
{
    /// Seed the standard chart into the tenant.
    ///
    /// Seeds whose code already has a live account are skipped. The check and the inserts
    /// happen in one store unit of work, so an import is never half-applied. Running it
    /// again on the same tenant creates nothing.
    pub fn import_standard_chart(
        &self,
        ctx: &TenantContext,
        cancel: &CancellationToken,
    ) -> ServiceResult<ImportResult> {
        let tenant_id = ctx.require_tenant()?;
        let _span = tracing::info_span!("import_standard_chart", %tenant_id).entered();
        cancel.check()?;

        let now = Utc::now();
        let candidates = STANDARD_CHART
            .iter()
            .map(|seed| Account::open(tenant_id, seed.to_new_account(), now))
            .collect::<Result<Vec<_>, _>>()?;

        cancel.check()?;
        let created = self.store.insert_accounts_if_absent(tenant_id, candidates)?;

        let mut accounts: Vec<AccountView> = self
            .store
            .accounts(tenant_id, StatusFilter::ActiveOnly)?
            .iter()
            .filter(|a| a.is_live())
            .map(AccountView::from)
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));

        let result = ImportResult {
            created: created.len(),
            skipped: STANDARD_CHART.len() - created.len(),
            accounts,
        };

        tracing::info!(
            created = result.created,
            skipped = result.skipped,
            "standard chart imported"
        );
        Ok(result)
    }
}
