//! Financial statement shapes and the per-account accumulation they are derived from.
//!
//! Statements are projections: they are computed from journal lines joined against an
//! [`AccountIndex`] and are never stored.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use forgeledger_core::{AccountId, ValueObject};

use crate::account::{Account, AccountIndex, AccountType};
use crate::cash_flow::CashFlowCategory;
use crate::journal::JournalLine;

/// One account row of a statement section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    pub account_id: AccountId,
    pub code: String,
    pub name: String,
    pub amount: Decimal,
}

impl ValueObject for StatementLine {}

impl StatementLine {
    fn for_account(account: &Account, amount: Decimal) -> Self {
        Self {
            account_id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            amount,
        }
    }
}

/// Summed debit and credit of a set of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineTotals {
    pub debit: Decimal,
    pub credit: Decimal,
}

/// Debit/credit totals grouped by account, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct AccountTotals {
    totals: HashMap<AccountId, LineTotals>,
    order: Vec<AccountId>,
}

impl AccountTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, line: &JournalLine) {
        let entry = self.totals.entry(line.account_id).or_insert_with(|| {
            self.order.push(line.account_id);
            LineTotals::default()
        });
        entry.debit += line.debit;
        entry.credit += line.credit;
    }

    pub fn get(&self, account_id: &AccountId) -> Option<LineTotals> {
        self.totals.get(account_id).copied()
    }

    /// Accounts with activity joined to the index. Lines whose account cannot be
    /// resolved are dropped, like an inner join.
    pub fn joined<'a>(
        &'a self,
        accounts: &'a AccountIndex,
    ) -> impl Iterator<Item = (&'a Account, LineTotals)> + 'a {
        self.order.iter().filter_map(move |id| {
            let account = accounts.get(id)?;
            Some((account, self.totals[id]))
        })
    }

    /// Natural balance per account of `account_type`, keeping only balances `keep` accepts.
    /// Sorted by account code.
    pub fn section(
        &self,
        accounts: &AccountIndex,
        account_type: AccountType,
        keep: impl Fn(Decimal) -> bool,
    ) -> Vec<StatementLine> {
        let mut lines: Vec<StatementLine> = self
            .joined(accounts)
            .filter(|(a, _)| a.account_type == account_type)
            .map(|(a, t)| StatementLine::for_account(a, a.natural_balance(t.debit, t.credit)))
            .filter(|l| keep(l.amount))
            .collect();
        lines.sort_by(|a, b| a.code.cmp(&b.code));
        lines
    }

    /// Unfiltered sum of natural balances over every account of `account_type`.
    pub fn natural_total(&self, accounts: &AccountIndex, account_type: AccountType) -> Decimal {
        self.joined(accounts)
            .filter(|(a, _)| a.account_type == account_type)
            .map(|(a, t)| a.natural_balance(t.debit, t.credit))
            .sum()
    }
}

fn total(lines: &[StatementLine]) -> Decimal {
    lines.iter().map(|l| l.amount).sum()
}

/// Point-in-time statement of assets, liabilities and equity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub as_of_date: NaiveDate,
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub total_equity: Decimal,
    pub asset_lines: Vec<StatementLine>,
    pub liability_lines: Vec<StatementLine>,
    pub equity_lines: Vec<StatementLine>,
}

impl BalanceSheet {
    /// Build from totals of every line dated on or before `as_of_date`.
    ///
    /// Assets and liabilities only show positive balances; equity shows any non-zero
    /// balance. Net income (all revenue minus all expense, unfiltered) is appended as a
    /// synthetic equity line labelled `retained_earnings_label`.
    pub fn from_totals(
        as_of_date: NaiveDate,
        totals: &AccountTotals,
        accounts: &AccountIndex,
        retained_earnings_label: &str,
    ) -> Self {
        let asset_lines = totals.section(accounts, AccountType::Asset, |b| b > Decimal::ZERO);
        let liability_lines =
            totals.section(accounts, AccountType::Liability, |b| b > Decimal::ZERO);
        let mut equity_lines = totals.section(accounts, AccountType::Equity, |b| !b.is_zero());

        let revenue = totals.natural_total(accounts, AccountType::Revenue);
        let expense = totals.natural_total(accounts, AccountType::Expense);

        equity_lines.push(StatementLine {
            account_id: AccountId::SENTINEL,
            code: String::new(),
            name: retained_earnings_label.to_string(),
            amount: revenue - expense,
        });

        Self {
            as_of_date,
            total_assets: total(&asset_lines),
            total_liabilities: total(&liability_lines),
            total_equity: total(&equity_lines),
            asset_lines,
            liability_lines,
            equity_lines,
        }
    }

    /// `TotalAssets == TotalLiabilities + TotalEquity`.
    pub fn is_balanced(&self) -> bool {
        self.total_assets == self.total_liabilities + self.total_equity
    }
}

/// Revenue and expenses over an inclusive date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitAndLoss {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub revenue: Decimal,
    /// No cost-of-goods-sold classification exists yet; always zero.
    pub cogs: Decimal,
    pub expenses: Decimal,
    pub revenue_lines: Vec<StatementLine>,
    pub expense_lines: Vec<StatementLine>,
}

impl ProfitAndLoss {
    pub fn from_totals(
        from_date: NaiveDate,
        to_date: NaiveDate,
        totals: &AccountTotals,
        accounts: &AccountIndex,
    ) -> Self {
        let by_amount_desc = |lines: &mut Vec<StatementLine>| {
            lines.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.code.cmp(&b.code)));
        };

        let mut revenue_lines =
            totals.section(accounts, AccountType::Revenue, |b| b > Decimal::ZERO);
        let mut expense_lines =
            totals.section(accounts, AccountType::Expense, |b| b > Decimal::ZERO);
        by_amount_desc(&mut revenue_lines);
        by_amount_desc(&mut expense_lines);

        Self {
            from_date,
            to_date,
            revenue: total(&revenue_lines),
            cogs: Decimal::ZERO,
            expenses: total(&expense_lines),
            revenue_lines,
            expense_lines,
        }
    }

    pub fn net_profit(&self) -> Decimal {
        self.revenue - self.cogs - self.expenses
    }
}

/// Cash movements over an inclusive date window, split by category and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlow {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub operating_inflow: Decimal,
    pub operating_outflow: Decimal,
    pub investing_inflow: Decimal,
    pub investing_outflow: Decimal,
    pub financing_inflow: Decimal,
    pub financing_outflow: Decimal,
}

impl CashFlow {
    pub fn empty(from_date: NaiveDate, to_date: NaiveDate) -> Self {
        Self {
            from_date,
            to_date,
            operating_inflow: Decimal::ZERO,
            operating_outflow: Decimal::ZERO,
            investing_inflow: Decimal::ZERO,
            investing_outflow: Decimal::ZERO,
            financing_inflow: Decimal::ZERO,
            financing_outflow: Decimal::ZERO,
        }
    }

    /// Record one cash-account line's net (`debit - credit`) under `category`.
    /// Positive nets are inflows, negative nets are outflows (as absolute values).
    pub fn record(&mut self, category: CashFlowCategory, net: Decimal) {
        let (inflow, outflow) = match category {
            CashFlowCategory::Operating => {
                (&mut self.operating_inflow, &mut self.operating_outflow)
            }
            CashFlowCategory::Investing => {
                (&mut self.investing_inflow, &mut self.investing_outflow)
            }
            CashFlowCategory::Financing => {
                (&mut self.financing_inflow, &mut self.financing_outflow)
            }
        };
        if net > Decimal::ZERO {
            *inflow += net;
        } else if net < Decimal::ZERO {
            *outflow += net.abs();
        }
    }

    pub fn net_change(&self) -> Decimal {
        self.operating_inflow - self.operating_outflow + self.investing_inflow
            - self.investing_outflow
            + self.financing_inflow
            - self.financing_outflow
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceLine {
    pub account_id: AccountId,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub debit: Decimal,
    pub credit: Decimal,
    /// Natural balance under the account type's sign convention.
    pub balance: Decimal,
}

/// Per-account debit/credit totals up to a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    pub as_of_date: NaiveDate,
    pub lines: Vec<TrialBalanceLine>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
}

impl TrialBalance {
    pub fn from_totals(
        as_of_date: NaiveDate,
        totals: &AccountTotals,
        accounts: &AccountIndex,
    ) -> Self {
        let mut lines: Vec<TrialBalanceLine> = totals
            .joined(accounts)
            .map(|(a, t)| TrialBalanceLine {
                account_id: a.id,
                code: a.code.clone(),
                name: a.name.clone(),
                account_type: a.account_type,
                debit: t.debit,
                credit: t.credit,
                balance: a.natural_balance(t.debit, t.credit),
            })
            .collect();
        lines.sort_by(|a, b| a.code.cmp(&b.code));

        Self {
            as_of_date,
            total_debit: lines.iter().map(|l| l.debit).sum(),
            total_credit: lines.iter().map(|l| l.credit).sum(),
            lines,
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.total_debit == self.total_credit
    }
}
