//! Accounting module (double-entry general ledger and financial statements).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod account;
pub mod cash_flow;
pub mod chart;
pub mod journal;
pub mod statement;
pub mod status;

pub use account::{Account, AccountIndex, AccountType, AccountView, NewAccount};
pub use cash_flow::{CashFlowCategory, CashFlowClassifier};
pub use chart::{STANDARD_CHART, StandardAccount};
pub use journal::{JournalEntry, JournalLine, NewJournalLine, PostJournalEntry, source_module};
pub use statement::{
    AccountTotals, BalanceSheet, CashFlow, LineTotals, ProfitAndLoss, StatementLine,
    TrialBalance, TrialBalanceLine,
};
pub use status::{RecordStatus, StatusFilter};
