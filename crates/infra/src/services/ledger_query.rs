//! Paginated, filterable journal listing.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use forgeledger_accounting::{AccountIndex, JournalEntry, StatusFilter};
use forgeledger_core::{
    AccountId, CancellationToken, DateRange, DomainError, JournalEntryId, TenantContext,
};

use crate::config::ReportingConfig;
use crate::services::error::ServiceResult;
use crate::store::{JournalFilter, LedgerStore};

/// Journal listing request. `None` fields are unfiltered / defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalQuery {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub source_module: Option<String>,
    /// 1-based; defaults to 1.
    pub page_no: Option<u32>,
    /// Defaults to the configured page size and is capped at the configured maximum.
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLineView {
    pub account_id: AccountId,
    pub account_code: String,
    pub account_name: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntryView {
    pub id: JournalEntryId,
    pub date: NaiveDate,
    pub reference: String,
    pub source_module: String,
    pub source_id: Option<Uuid>,
    pub description: Option<String>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub lines: Vec<JournalLineView>,
}

impl JournalEntryView {
    fn build(entry: &JournalEntry, accounts: &AccountIndex) -> Self {
        let lines = entry
            .active_lines()
            .map(|l| {
                let (code, name) = accounts
                    .get(&l.account_id)
                    .map(|a| (a.code.clone(), a.name.clone()))
                    .unwrap_or_default();
                JournalLineView {
                    account_id: l.account_id,
                    account_code: code,
                    account_name: name,
                    debit: l.debit,
                    credit: l.credit,
                    memo: l.memo.clone(),
                }
            })
            .collect();

        Self {
            id: entry.id,
            date: entry.date,
            reference: entry.reference.clone(),
            source_module: entry.source_module.clone(),
            source_id: entry.source_id,
            description: entry.description.clone(),
            total_debit: entry.total_debit(),
            total_credit: entry.total_credit(),
            lines,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalPage {
    pub items: Vec<JournalEntryView>,
    /// Size of the filtered set before pagination.
    pub total_count: u64,
    pub page_no: u32,
    pub page_size: u32,
}

#[derive(Debug)]
pub struct LedgerQueryService<S> {
    store: S,
    config: ReportingConfig,
}

impl<S> LedgerQueryService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: ReportingConfig::default(),
        }
    }

    /// Use `config` for page sizes; an invalid config is rejected up front.
    pub fn with_config(store: S, config: ReportingConfig) -> ServiceResult<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    fn page_params(&self, query: &JournalQuery) -> Result<(u32, u32), DomainError> {
        let page_no = query.page_no.unwrap_or(1);
        let page_size = query.page_size.unwrap_or(self.config.default_page_size);

        if page_no < 1 {
            return Err(DomainError::validation("page_no must be at least 1"));
        }
        if page_size < 1 {
            return Err(DomainError::validation("page_size must be at least 1"));
        }
        Ok((page_no, page_size.min(self.config.max_page_size)))
    }
}

impl<S> LedgerQueryService<S>
where
    S: LedgerStore,
{
    /// List non-deleted journal entries, newest first (date, then posting time).
    pub fn list_journal_entries(
        &self,
        ctx: &TenantContext,
        query: &JournalQuery,
        cancel: &CancellationToken,
    ) -> ServiceResult<JournalPage> {
        let tenant_id = ctx.require_tenant()?;
        let _span = tracing::info_span!(
            "list_journal_entries",
            %tenant_id,
            source_module = query.source_module.as_deref().unwrap_or("*"),
        )
        .entered();

        let range = DateRange::new(query.date_from, query.date_to)?;
        let (page_no, page_size) = self.page_params(query)?;
        cancel.check()?;

        let mut filter = JournalFilter::active().within(range);
        filter.source_module = query.source_module.clone();

        let mut entries = self.store.journal_entries(tenant_id, &filter)?;
        entries.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| b.id.cmp(&a.id))
        });
        let total_count = entries.len() as u64;

        // Historical lines may point at since-deleted accounts; resolve them too.
        let accounts =
            AccountIndex::new(self.store.accounts(tenant_id, StatusFilter::IncludeDeleted)?);

        let skip = (page_no as usize - 1).saturating_mul(page_size as usize);
        let mut items = Vec::with_capacity(page_size as usize);
        for entry in entries.iter().skip(skip).take(page_size as usize) {
            cancel.check()?;
            items.push(JournalEntryView::build(entry, &accounts));
        }
        cancel.check()?;

        tracing::debug!(
            total_count,
            returned = items.len(),
            page_no,
            page_size,
            "journal page built"
        );
        Ok(JournalPage {
            items,
            total_count,
            page_no,
            page_size,
        })
    }
}
