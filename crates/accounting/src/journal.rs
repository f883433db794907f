use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use forgeledger_core::{
    AccountId, DomainError, DomainResult, Entity, JournalEntryId, JournalLineId, TenantId,
};

use crate::account::AccountIndex;
use crate::status::RecordStatus;

/// Well-known source module tags. The field itself is free-form.
pub mod source_module {
    pub const SALE: &str = "Sale";
    pub const PURCHASE: &str = "Purchase";
    pub const ADJUSTMENT: &str = "Adjustment";
    pub const POS: &str = "POS";
    pub const PAYMENT: &str = "Payment";
}

/// One side of a posted journal entry (immutable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    pub id: JournalLineId,
    pub journal_entry_id: JournalEntryId,
    pub account_id: AccountId,
    pub debit: Decimal,
    pub credit: Decimal,
    pub memo: Option<String>,
    pub status: RecordStatus,
}

impl JournalLine {
    /// `debit - credit`; the cash-flow direction of a line against a cash account.
    pub fn net(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// A posted, balanced business event.
///
/// Append-only: entries and their lines are never updated after posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: JournalEntryId,
    pub tenant_id: TenantId,
    pub date: NaiveDate,
    pub reference: String,
    pub source_module: String,
    pub source_id: Option<Uuid>,
    pub description: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    pub fn active_lines(&self) -> impl Iterator<Item = &JournalLine> {
        self.lines
            .iter()
            .filter(|l| l.status == RecordStatus::Active)
    }

    pub fn total_debit(&self) -> Decimal {
        self.active_lines().map(|l| l.debit).sum()
    }

    pub fn total_credit(&self) -> Decimal {
        self.active_lines().map(|l| l.credit).sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.total_debit() == self.total_credit()
    }
}

impl Entity for JournalEntry {
    type Id = JournalEntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// Requested line of a journal entry that has not been posted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJournalLine {
    pub account_id: AccountId,
    pub debit: Decimal,
    pub credit: Decimal,
    pub memo: Option<String>,
}

impl NewJournalLine {
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            memo: None,
        }
    }

    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            memo: None,
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }
}

/// Command: post a journal entry into a tenant's ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostJournalEntry {
    pub date: NaiveDate,
    pub reference: String,
    pub source_module: String,
    pub source_id: Option<Uuid>,
    pub description: Option<String>,
    pub lines: Vec<NewJournalLine>,
}

impl PostJournalEntry {
    pub fn new(
        date: NaiveDate,
        source_module: impl Into<String>,
        lines: Vec<NewJournalLine>,
    ) -> Self {
        Self {
            date,
            reference: String::new(),
            source_module: source_module.into(),
            source_id: None,
            description: None,
            lines,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn with_source_id(mut self, source_id: Uuid) -> Self {
        self.source_id = Some(source_id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Shape and balance checks that need no account data.
    ///
    /// Stored lines carry at most one non-zero side. Posting is stricter: every new line
    /// must carry exactly one positive amount, so an all-zero line is rejected as
    /// `Validation` rather than stored as noise. An unbalanced entry is
    /// `InvariantViolation`.
    pub fn validate(&self) -> DomainResult<()> {
        if self.source_module.trim().is_empty() {
            return Err(DomainError::validation("source module must not be empty"));
        }

        if self.lines.len() < 2 {
            return Err(DomainError::validation(
                "journal entry must have at least two lines",
            ));
        }

        let mut debit_total = Decimal::ZERO;
        let mut credit_total = Decimal::ZERO;

        for (idx, line) in self.lines.iter().enumerate() {
            if line.debit.is_sign_negative() || line.credit.is_sign_negative() {
                return Err(DomainError::validation(format!(
                    "line {idx}: amounts must not be negative"
                )));
            }
            match (line.debit.is_zero(), line.credit.is_zero()) {
                (false, false) => {
                    return Err(DomainError::validation(format!(
                        "line {idx}: a line is either a debit or a credit, not both"
                    )));
                }
                (true, true) => {
                    return Err(DomainError::validation(format!(
                        "line {idx}: amount must be positive"
                    )));
                }
                _ => {}
            }
            debit_total += line.debit;
            credit_total += line.credit;
        }

        if debit_total != credit_total {
            return Err(DomainError::invariant(format!(
                "debits must equal credits (debits: {debit_total}, credits: {credit_total})"
            )));
        }

        Ok(())
    }

    /// Validate against the tenant's chart and build the immutable entry.
    ///
    /// Every referenced account must exist in `accounts`, belong to `tenant_id` and be live.
    pub fn into_entry(
        self,
        tenant_id: TenantId,
        accounts: &AccountIndex,
        created_at: DateTime<Utc>,
    ) -> DomainResult<JournalEntry> {
        self.validate()?;

        for line in &self.lines {
            match accounts.get(&line.account_id) {
                Some(a) if a.tenant_id == tenant_id && a.is_live() => {}
                Some(a) if a.tenant_id == tenant_id => {
                    return Err(DomainError::validation(format!(
                        "account {} is not active",
                        a.code
                    )));
                }
                _ => {
                    return Err(DomainError::not_found(format!(
                        "account {}",
                        line.account_id
                    )));
                }
            }
        }

        let entry_id = JournalEntryId::new();
        let lines = self
            .lines
            .into_iter()
            .map(|l| JournalLine {
                id: JournalLineId::new(),
                journal_entry_id: entry_id,
                account_id: l.account_id,
                debit: l.debit,
                credit: l.credit,
                memo: l.memo,
                status: RecordStatus::Active,
            })
            .collect();

        Ok(JournalEntry {
            id: entry_id,
            tenant_id,
            date: self.date,
            reference: self.reference,
            source_module: self.source_module.trim().to_string(),
            source_id: self.source_id,
            description: self.description,
            status: RecordStatus::Active,
            created_at,
            lines,
        })
    }
}
