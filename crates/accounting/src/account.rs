use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use forgeledger_core::{AccountId, DomainError, DomainResult, Entity, TenantId};

use crate::status::RecordStatus;

/// High-level account type (determines the natural balance side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl AccountType {
    pub const ALL: [AccountType; 5] = [
        AccountType::Asset,
        AccountType::Liability,
        AccountType::Equity,
        AccountType::Revenue,
        AccountType::Expense,
    ];

    /// Whether the account type grows on the debit side.
    pub fn is_debit_normal(self) -> bool {
        matches!(self, AccountType::Asset | AccountType::Expense)
    }

    /// Natural balance of summed debits/credits for this account type.
    ///
    /// Asset and Expense: `debit - credit`. Liability, Equity and Revenue: `credit - debit`.
    pub fn natural_balance(self, debit: Decimal, credit: Decimal) -> Decimal {
        if self.is_debit_normal() {
            debit - credit
        } else {
            credit - debit
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::Asset => "asset",
            AccountType::Liability => "liability",
            AccountType::Equity => "equity",
            AccountType::Revenue => "revenue",
            AccountType::Expense => "expense",
        }
    }
}

impl core::fmt::Display for AccountType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for AccountType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" => Ok(AccountType::Asset),
            "liability" => Ok(AccountType::Liability),
            "equity" => Ok(AccountType::Equity),
            "revenue" => Ok(AccountType::Revenue),
            "expense" => Ok(AccountType::Expense),
            _ => Err(DomainError::validation(
                "account type must be one of: asset, liability, equity, revenue, expense",
            )),
        }
    }
}

/// Input for creating an account in a tenant's chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub parent_account_id: Option<AccountId>,
}

impl NewAccount {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            account_type,
            parent_account_id: None,
        }
    }

    pub fn with_parent(mut self, parent: AccountId) -> Self {
        self.parent_account_id = Some(parent);
        self
    }
}

/// An account in a tenant's chart of accounts.
///
/// Accounts are only ever deactivated or soft-deleted; journal lines keep referencing them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub tenant_id: TenantId,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub parent_account_id: Option<AccountId>,
    pub is_active: bool,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Validate and build a fresh, active account.
    pub fn open(
        tenant_id: TenantId,
        new: NewAccount,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let code = new.code.trim().to_string();
        let name = new.name.trim().to_string();

        if code.is_empty() {
            return Err(DomainError::validation("account code must not be empty"));
        }
        if name.is_empty() {
            return Err(DomainError::validation("account name must not be empty"));
        }

        Ok(Self {
            id: AccountId::new(),
            tenant_id,
            code,
            name,
            account_type: new.account_type,
            parent_account_id: new.parent_account_id,
            is_active: true,
            status: RecordStatus::Active,
            created_at,
        })
    }

    /// Active and not soft-deleted. Codes are unique among live accounts of a tenant.
    pub fn is_live(&self) -> bool {
        self.is_active && self.status == RecordStatus::Active
    }

    pub fn natural_balance(&self, debit: Decimal, credit: Decimal) -> Decimal {
        self.account_type.natural_balance(debit, credit)
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// Outward-facing account shape (no tenant or audit fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: AccountId,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub parent_account_id: Option<AccountId>,
    pub is_active: bool,
}

impl From<&Account> for AccountView {
    fn from(a: &Account) -> Self {
        Self {
            id: a.id,
            code: a.code.clone(),
            name: a.name.clone(),
            account_type: a.account_type,
            parent_account_id: a.parent_account_id,
            is_active: a.is_active,
        }
    }
}

/// Id-indexed arena of a tenant's accounts, loaded once per statement.
///
/// Lines are joined against it in memory instead of resolving accounts one by one.
#[derive(Debug, Clone, Default)]
pub struct AccountIndex {
    accounts: Vec<Account>,
    by_id: HashMap<AccountId, usize>,
}

impl AccountIndex {
    pub fn new(accounts: Vec<Account>) -> Self {
        let by_id = accounts
            .iter()
            .enumerate()
            .map(|(idx, a)| (a.id, idx))
            .collect();
        Self { accounts, by_id }
    }

    pub fn get(&self, id: &AccountId) -> Option<&Account> {
        self.by_id.get(id).map(|&idx| &self.accounts[idx])
    }

    /// All live accounts carrying `code` (normally at most one).
    pub fn live_with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Account> + 'a {
        self.accounts
            .iter()
            .filter(move |a| a.is_live() && a.code == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(code: &str, account_type: AccountType) -> Account {
        Account::open(
            TenantId::new(),
            NewAccount::new(code, code, account_type),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn sign_convention_follows_account_type() {
        let debit = Decimal::from(300);
        let credit = Decimal::from(100);

        assert_eq!(AccountType::Asset.natural_balance(debit, credit), Decimal::from(200));
        assert_eq!(AccountType::Expense.natural_balance(debit, credit), Decimal::from(200));
        assert_eq!(AccountType::Liability.natural_balance(debit, credit), Decimal::from(-200));
        assert_eq!(AccountType::Equity.natural_balance(debit, credit), Decimal::from(-200));
        assert_eq!(AccountType::Revenue.natural_balance(debit, credit), Decimal::from(-200));
    }

    #[test]
    fn parses_account_type_case_insensitively() {
        assert_eq!("Revenue".parse::<AccountType>().unwrap(), AccountType::Revenue);
        assert_eq!(" LIABILITY ".parse::<AccountType>().unwrap(), AccountType::Liability);
        assert!("income".parse::<AccountType>().is_err());
    }

    #[test]
    fn open_trims_and_rejects_blank_fields() {
        let a = account("  CASH ", AccountType::Asset);
        assert_eq!(a.code, "CASH");
        assert!(a.is_live());

        let err = Account::open(
            TenantId::new(),
            NewAccount::new("   ", "Cash", AccountType::Asset),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn index_resolves_by_id_and_live_code() {
        let cash = account("CASH", AccountType::Asset);
        let mut old_cash = account("CASH", AccountType::Asset);
        old_cash.status = RecordStatus::Deleted;
        let ar = account("AR", AccountType::Asset);

        let index = AccountIndex::new(vec![cash.clone(), old_cash.clone(), ar.clone()]);

        assert_eq!(index.len(), 3);
        assert_eq!(index.get(&ar.id).map(|a| a.code.as_str()), Some("AR"));
        assert!(index.get(&AccountId::SENTINEL).is_none());

        let live: Vec<_> = index.live_with_code("CASH").map(|a| a.id).collect();
        assert_eq!(live, vec![cash.id]);
    }
}
