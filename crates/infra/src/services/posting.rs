//! Journal posting: the creation boundary where the balance invariant is enforced.

use chrono::Utc;

use forgeledger_accounting::{JournalEntry, PostJournalEntry};
use forgeledger_core::{CancellationToken, TenantContext};

use crate::services::error::ServiceResult;
use crate::services::registry::load_index;
use crate::store::LedgerStore;

/// Appends balanced journal entries to a tenant's ledger.
///
/// Upstream business modules (sales, purchasing, POS, ...) post through here; nothing
/// reaches the store without passing [`PostJournalEntry::into_entry`].
#[derive(Debug)]
pub struct JournalPoster<S> {
    store: S,
}

impl<S> JournalPoster<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> JournalPoster<S>
where
    S: LedgerStore,
{
    pub fn post(
        &self,
        ctx: &TenantContext,
        cmd: PostJournalEntry,
        cancel: &CancellationToken,
    ) -> ServiceResult<JournalEntry> {
        let tenant_id = ctx.require_tenant()?;
        let _span = tracing::info_span!(
            "post_journal_entry",
            %tenant_id,
            source_module = %cmd.source_module,
            date = %cmd.date,
        )
        .entered();
        cancel.check()?;

        if let Err(e) = cmd.validate() {
            tracing::warn!(error = %e, "journal entry rejected");
            return Err(e.into());
        }

        let accounts = load_index(&self.store, tenant_id)?;
        let entry = cmd.into_entry(tenant_id, &accounts, Utc::now())?;

        cancel.check()?;
        self.store.append_entry(tenant_id, entry.clone())?;

        tracing::info!(entry_id = %entry.id, total = %entry.total_debit(), "journal entry posted");
        Ok(entry)
    }
}
