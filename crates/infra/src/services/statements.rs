//! Financial statement derivation over the journal.
//!
//! Each statement is an independent, read-only projection: accounts are loaded once per
//! call into an id-indexed arena, the matching journal lines are streamed through an
//! accumulator, and the report is assembled only after every line has been seen. A
//! cancelled call returns `Cancelled`, never a statement built from a subset of lines.

use std::collections::HashSet;

use chrono::NaiveDate;

use forgeledger_accounting::{
    AccountIndex, AccountTotals, BalanceSheet, CashFlow, CashFlowClassifier, ProfitAndLoss,
    TrialBalance,
};
use forgeledger_core::{AccountId, CancellationToken, DateRange, TenantContext, TenantId};

use crate::config::ReportingConfig;
use crate::services::error::ServiceResult;
use crate::services::registry::load_index;
use crate::store::{JournalFilter, LedgerStore};

#[derive(Debug)]
pub struct StatementEngine<S> {
    store: S,
    config: ReportingConfig,
    classifier: CashFlowClassifier,
}

impl<S> StatementEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: ReportingConfig::default(),
            classifier: CashFlowClassifier::default(),
        }
    }

    /// Use `config` for the cash account code and labels; an invalid config is rejected.
    pub fn with_config(store: S, config: ReportingConfig) -> ServiceResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            classifier: CashFlowClassifier::default(),
        })
    }

    /// Replace the source-module → cash-flow category table.
    pub fn with_classifier(mut self, classifier: CashFlowClassifier) -> Self {
        self.classifier = classifier;
        self
    }
}

impl<S> StatementEngine<S>
where
    S: LedgerStore,
{
    fn accumulate(
        &self,
        tenant_id: TenantId,
        range: DateRange,
        cancel: &CancellationToken,
    ) -> ServiceResult<(AccountIndex, AccountTotals)> {
        let accounts = load_index(&self.store, tenant_id)?;
        cancel.check()?;

        let entries = self
            .store
            .journal_entries(tenant_id, &JournalFilter::active().within(range))?;

        let mut totals = AccountTotals::new();
        for entry in &entries {
            cancel.check()?;
            for line in entry.active_lines() {
                totals.add(line);
            }
        }
        cancel.check()?;

        tracing::debug!(entries = entries.len(), accounts = accounts.len(), "journal aggregated");
        Ok((accounts, totals))
    }

    /// Assets, liabilities and equity as of `as_of_date` (inclusive), with net income
    /// folded into equity as a synthetic retained-earnings line.
    pub fn balance_sheet(
        &self,
        ctx: &TenantContext,
        as_of_date: NaiveDate,
        cancel: &CancellationToken,
    ) -> ServiceResult<BalanceSheet> {
        let tenant_id = ctx.require_tenant()?;
        let _span = tracing::info_span!("balance_sheet", %tenant_id, %as_of_date).entered();

        let (accounts, totals) = self.accumulate(tenant_id, DateRange::up_to(as_of_date), cancel)?;
        let sheet = BalanceSheet::from_totals(
            as_of_date,
            &totals,
            &accounts,
            &self.config.retained_earnings_label,
        );

        if !sheet.is_balanced() {
            tracing::warn!(
                assets = %sheet.total_assets,
                liabilities = %sheet.total_liabilities,
                equity = %sheet.total_equity,
                "balance sheet does not balance"
            );
        }
        tracing::debug!(
            assets = %sheet.total_assets,
            equity = %sheet.total_equity,
            "balance sheet derived"
        );
        Ok(sheet)
    }

    /// Revenue and expenses over `[from_date, to_date]`.
    pub fn profit_and_loss(
        &self,
        ctx: &TenantContext,
        from_date: NaiveDate,
        to_date: NaiveDate,
        cancel: &CancellationToken,
    ) -> ServiceResult<ProfitAndLoss> {
        let tenant_id = ctx.require_tenant()?;
        let _span =
            tracing::info_span!("profit_and_loss", %tenant_id, %from_date, %to_date).entered();
        let range = DateRange::between(from_date, to_date)?;

        let (accounts, totals) = self.accumulate(tenant_id, range, cancel)?;
        let pl = ProfitAndLoss::from_totals(from_date, to_date, &totals, &accounts);

        tracing::debug!(revenue = %pl.revenue, expenses = %pl.expenses, "profit and loss derived");
        Ok(pl)
    }

    /// Movements on the tenant's cash accounts over `[from_date, to_date]`, bucketed by
    /// the source module of each entry.
    ///
    /// Cash accounts are the live accounts whose code equals the configured cash code.
    /// A tenant without one gets an all-zero statement.
    pub fn cash_flow(
        &self,
        ctx: &TenantContext,
        from_date: NaiveDate,
        to_date: NaiveDate,
        cancel: &CancellationToken,
    ) -> ServiceResult<CashFlow> {
        let tenant_id = ctx.require_tenant()?;
        let _span = tracing::info_span!("cash_flow", %tenant_id, %from_date, %to_date).entered();
        let range = DateRange::between(from_date, to_date)?;
        cancel.check()?;

        let accounts = load_index(&self.store, tenant_id)?;
        let cash_accounts: HashSet<AccountId> = accounts
            .live_with_code(&self.config.cash_account_code)
            .map(|a| a.id)
            .collect();

        let mut flow = CashFlow::empty(from_date, to_date);
        if cash_accounts.is_empty() {
            tracing::debug!(
                code = %self.config.cash_account_code,
                "no cash account; empty cash flow"
            );
            return Ok(flow);
        }

        let filter = JournalFilter::active()
            .within(range)
            .touching(cash_accounts.iter().copied());
        let entries = self.store.journal_entries(tenant_id, &filter)?;

        for entry in &entries {
            cancel.check()?;
            let category = self.classifier.classify(&entry.source_module);
            for line in entry
                .active_lines()
                .filter(|l| cash_accounts.contains(&l.account_id))
            {
                flow.record(category, line.net());
            }
        }
        cancel.check()?;

        tracing::debug!(
            net_change = %flow.net_change(),
            entries = entries.len(),
            "cash flow derived"
        );
        Ok(flow)
    }

    /// Per-account debit/credit totals as of `as_of_date` (inclusive).
    pub fn trial_balance(
        &self,
        ctx: &TenantContext,
        as_of_date: NaiveDate,
        cancel: &CancellationToken,
    ) -> ServiceResult<TrialBalance> {
        let tenant_id = ctx.require_tenant()?;
        let _span = tracing::info_span!("trial_balance", %tenant_id, %as_of_date).entered();

        let (accounts, totals) = self.accumulate(tenant_id, DateRange::up_to(as_of_date), cancel)?;
        let tb = TrialBalance::from_totals(as_of_date, &totals, &accounts);

        tracing::debug!(
            debit = %tb.total_debit,
            credit = %tb.total_credit,
            "trial balance derived"
        );
        Ok(tb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use forgeledger_accounting::{
        AccountType, CashFlowCategory, NewAccount, NewJournalLine, PostJournalEntry,
        source_module,
    };
    use rust_decimal::Decimal;

    use crate::services::{AccountRegistry, ChartBootstrapper, JournalPoster, ServiceError};
    use crate::store::InMemoryLedgerStore;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    struct Books {
        store: Arc<InMemoryLedgerStore>,
        ctx: TenantContext,
        chart: Vec<forgeledger_accounting::AccountView>,
    }

    impl Books {
        fn seeded() -> Self {
            let store = Arc::new(InMemoryLedgerStore::new());
            let ctx = TenantContext::new(TenantId::new());
            let chart = ChartBootstrapper::new(store.clone())
                .import_standard_chart(&ctx, &CancellationToken::new())
                .unwrap()
                .accounts;
            Self { store, ctx, chart }
        }

        fn id(&self, code: &str) -> AccountId {
            self.chart.iter().find(|a| a.code == code).unwrap().id
        }

        fn post(&self, date: NaiveDate, module: &str, debit: &str, credit: &str, amount: Decimal) {
            JournalPoster::new(self.store.clone())
                .post(
                    &self.ctx,
                    PostJournalEntry::new(
                        date,
                        module,
                        vec![
                            NewJournalLine::debit(self.id(debit), amount),
                            NewJournalLine::credit(self.id(credit), amount),
                        ],
                    ),
                    &CancellationToken::new(),
                )
                .unwrap();
        }

        fn engine(&self) -> StatementEngine<Arc<InMemoryLedgerStore>> {
            StatementEngine::new(self.store.clone())
        }
    }

    #[test]
    fn balance_sheet_respects_as_of_date() {
        let books = Books::seeded();
        books.post(d(2024, 1, 5), source_module::SALE, "CASH", "REVENUE", Decimal::from(1000));
        books.post(d(2024, 2, 5), source_module::SALE, "CASH", "REVENUE", Decimal::from(500));

        let jan = books
            .engine()
            .balance_sheet(&books.ctx, d(2024, 1, 31), &CancellationToken::new())
            .unwrap();
        assert_eq!(jan.total_assets, Decimal::from(1000));

        let feb = books
            .engine()
            .balance_sheet(&books.ctx, d(2024, 2, 5), &CancellationToken::new())
            .unwrap();
        assert_eq!(feb.total_assets, Decimal::from(1500));
        assert!(feb.is_balanced());
    }

    #[test]
    fn balance_sheet_covers_every_account_type() {
        let books = Books::seeded();
        let cents = |c: i64| Decimal::new(c, 2);
        books.post(d(2024, 1, 1), source_module::ADJUSTMENT, "CASH", "EQUITY", cents(500_000));
        books.post(d(2024, 1, 2), source_module::PURCHASE, "INVENTORY", "AP", cents(120_050));
        books.post(d(2024, 1, 3), source_module::SALE, "AR", "REVENUE", cents(80_025));
        books.post(d(2024, 1, 3), source_module::SALE, "AR", "TAX", cents(8_003));
        books.post(d(2024, 1, 4), source_module::PAYMENT, "CASH", "AR", cents(50_000));
        books.post(d(2024, 1, 6), source_module::PURCHASE, "EXPENSE", "CASH", cents(10_010));

        let sheet = books
            .engine()
            .balance_sheet(&books.ctx, d(2024, 1, 31), &CancellationToken::new())
            .unwrap();

        assert!(sheet.is_balanced());
        assert_eq!(sheet.total_liabilities, cents(128_053));
        let retained = sheet.equity_lines.last().unwrap();
        assert_eq!(retained.amount, cents(70_015));
        assert_eq!(sheet.total_equity, cents(570_015));
    }

    #[test]
    fn profit_and_loss_over_empty_window_is_zero() {
        let books = Books::seeded();
        books.post(d(2024, 1, 5), source_module::SALE, "CASH", "REVENUE", Decimal::from(1000));

        let pl = books
            .engine()
            .profit_and_loss(&books.ctx, d(2023, 1, 1), d(2023, 12, 31), &CancellationToken::new())
            .unwrap();

        assert_eq!(pl.revenue, Decimal::ZERO);
        assert_eq!(pl.expenses, Decimal::ZERO);
        assert_eq!(pl.cogs, Decimal::ZERO);
        assert!(pl.revenue_lines.is_empty());
        assert!(pl.expense_lines.is_empty());
    }

    #[test]
    fn inverted_window_is_a_validation_error() {
        let books = Books::seeded();
        let err = books
            .engine()
            .profit_and_loss(&books.ctx, d(2024, 2, 1), d(2024, 1, 1), &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = books
            .engine()
            .cash_flow(&books.ctx, d(2024, 2, 1), d(2024, 1, 1), &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn cash_flow_without_cash_account_is_all_zero() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let ctx = TenantContext::new(TenantId::new());
        let cancel = CancellationToken::new();
        let registry = AccountRegistry::new(store.clone());
        let bank = registry
            .create_account(&ctx, NewAccount::new("BANK", "Bank", AccountType::Asset), &cancel)
            .unwrap();
        let sales = registry
            .create_account(&ctx, NewAccount::new("SALES", "Sales", AccountType::Revenue), &cancel)
            .unwrap();
        JournalPoster::new(store.clone())
            .post(
                &ctx,
                PostJournalEntry::new(
                    d(2024, 1, 5),
                    source_module::SALE,
                    vec![
                        NewJournalLine::debit(bank.id, Decimal::from(10)),
                        NewJournalLine::credit(sales.id, Decimal::from(10)),
                    ],
                ),
                &cancel,
            )
            .unwrap();

        let flow = StatementEngine::new(store)
            .cash_flow(&ctx, d(2024, 1, 1), d(2024, 1, 31), &cancel)
            .unwrap();
        assert_eq!(flow, CashFlow::empty(d(2024, 1, 1), d(2024, 1, 31)));
    }

    #[test]
    fn cash_flow_routes_every_default_module_to_operating() {
        let books = Books::seeded();
        books.post(d(2024, 1, 2), source_module::SALE, "CASH", "REVENUE", Decimal::from(700));
        books.post(d(2024, 1, 3), source_module::POS, "CASH", "REVENUE", Decimal::from(300));
        books.post(d(2024, 1, 4), source_module::PURCHASE, "INVENTORY", "CASH", Decimal::from(250));
        books.post(d(2024, 1, 5), "Loan", "CASH", "EQUITY", Decimal::from(5000));
        // Non-cash entry does not touch the statement.
        books.post(d(2024, 1, 6), source_module::SALE, "AR", "REVENUE", Decimal::from(999));

        let flow = books
            .engine()
            .cash_flow(&books.ctx, d(2024, 1, 1), d(2024, 1, 31), &CancellationToken::new())
            .unwrap();

        assert_eq!(flow.operating_inflow, Decimal::from(6000));
        assert_eq!(flow.operating_outflow, Decimal::from(250));
        assert_eq!(flow.investing_inflow + flow.investing_outflow, Decimal::ZERO);
        assert_eq!(flow.financing_inflow + flow.financing_outflow, Decimal::ZERO);
    }

    #[test]
    fn cash_flow_classifier_can_be_extended() {
        let books = Books::seeded();
        books.post(d(2024, 1, 5), "Loan", "CASH", "EQUITY", Decimal::from(5000));
        books.post(d(2024, 1, 6), "AssetPurchase", "INVENTORY", "CASH", Decimal::from(800));

        let engine = books.engine().with_classifier(
            CashFlowClassifier::default()
                .with_mapping("Loan", CashFlowCategory::Financing)
                .with_mapping("AssetPurchase", CashFlowCategory::Investing),
        );
        let flow = engine
            .cash_flow(&books.ctx, d(2024, 1, 1), d(2024, 1, 31), &CancellationToken::new())
            .unwrap();

        assert_eq!(flow.financing_inflow, Decimal::from(5000));
        assert_eq!(flow.investing_outflow, Decimal::from(800));
        assert_eq!(flow.operating_inflow, Decimal::ZERO);
        assert_eq!(flow.net_change(), Decimal::from(4200));
    }

    #[test]
    fn trial_balance_is_balanced_for_posted_entries() {
        let books = Books::seeded();
        books.post(d(2024, 1, 2), source_module::SALE, "CASH", "REVENUE", Decimal::from(700));
        books.post(d(2024, 1, 4), source_module::PURCHASE, "EXPENSE", "CASH", Decimal::from(250));

        let tb = books
            .engine()
            .trial_balance(&books.ctx, d(2024, 1, 31), &CancellationToken::new())
            .unwrap();

        assert!(tb.is_balanced());
        assert_eq!(tb.total_debit, Decimal::from(950));
        let cash = tb.lines.iter().find(|l| l.code == "CASH").unwrap();
        assert_eq!(cash.balance, Decimal::from(450));
    }

    #[test]
    fn statements_do_not_leak_across_tenants() {
        let books = Books::seeded();
        books.post(d(2024, 1, 5), source_module::SALE, "CASH", "REVENUE", Decimal::from(1000));

        let other = TenantContext::new(TenantId::new());
        let sheet = StatementEngine::new(books.store.clone())
            .balance_sheet(&other, d(2024, 1, 31), &CancellationToken::new())
            .unwrap();
        assert_eq!(sheet.total_assets, Decimal::ZERO);
        assert_eq!(sheet.equity_lines.len(), 1);
    }

    #[test]
    fn configured_cash_code_selects_cash_accounts() {
        let books = Books::seeded();
        books.post(d(2024, 1, 5), source_module::SALE, "AR", "REVENUE", Decimal::from(300));
        books.post(d(2024, 1, 9), source_module::PAYMENT, "CASH", "AR", Decimal::from(300));

        let config = ReportingConfig {
            cash_account_code: "AR".to_string(),
            ..ReportingConfig::default()
        };
        let flow = StatementEngine::with_config(books.store.clone(), config)
            .unwrap()
            .cash_flow(&books.ctx, d(2024, 1, 1), d(2024, 1, 31), &CancellationToken::new())
            .unwrap();

        assert_eq!(flow.operating_inflow, Decimal::from(300));
        assert_eq!(flow.operating_outflow, Decimal::from(300));
    }

    #[test]
    fn blank_cash_code_config_is_rejected() {
        let config = ReportingConfig {
            cash_account_code: "  ".to_string(),
            ..ReportingConfig::default()
        };
        let err = StatementEngine::with_config(InMemoryLedgerStore::new(), config).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn every_statement_requires_company() {
        let books = Books::seeded();
        let engine = books.engine();
        let anon = TenantContext::anonymous();
        let live = CancellationToken::new();
        let (from, to) = (d(2024, 1, 1), d(2024, 1, 31));

        let missing = |r: Result<(), ServiceError>| {
            assert!(matches!(r, Err(ServiceError::CompanyContextMissing)));
        };
        missing(engine.balance_sheet(&anon, to, &live).map(drop));
        missing(engine.profit_and_loss(&anon, from, to, &live).map(drop));
        missing(engine.cash_flow(&anon, from, to, &live).map(drop));
        missing(engine.trial_balance(&anon, to, &live).map(drop));
    }

    #[test]
    fn every_statement_honours_a_cancelled_token() {
        let books = Books::seeded();
        let engine = books.engine();
        let cancelled = CancellationToken::new();
        cancelled.cancel();
        let (ctx, from, to) = (&books.ctx, d(2024, 1, 1), d(2024, 1, 31));

        let aborted = |r: Result<(), ServiceError>| {
            assert!(matches!(r, Err(ServiceError::Cancelled)));
        };
        aborted(engine.balance_sheet(ctx, to, &cancelled).map(drop));
        aborted(engine.profit_and_loss(ctx, from, to, &cancelled).map(drop));
        aborted(engine.cash_flow(ctx, from, to, &cancelled).map(drop));
        aborted(engine.trial_balance(ctx, to, &cancelled).map(drop));
    }
}
