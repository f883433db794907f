//! Standard chart of accounts seeded into new tenants.

use crate::account::{AccountType, NewAccount};

/// One seed tuple of the standard chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardAccount {
    pub code: &'static str,
    pub name: &'static str,
    pub account_type: AccountType,
}

impl StandardAccount {
    pub fn to_new_account(&self) -> NewAccount {
        NewAccount::new(self.code, self.name, self.account_type)
    }
}

const fn seed(
    code: &'static str,
    name: &'static str,
    account_type: AccountType,
) -> StandardAccount {
    StandardAccount {
        code,
        name,
        account_type,
    }
}

/// Fixed, ordered seed list. `CASH` is also the code the cash-flow statement keys on.
pub const STANDARD_CHART: [StandardAccount; 8] = [
    seed("CASH", "Cash", AccountType::Asset),
    seed("AR", "Accounts Receivable", AccountType::Asset),
    seed("INVENTORY", "Inventory", AccountType::Asset),
    seed("AP", "Accounts Payable", AccountType::Liability),
    seed("TAX", "Tax Payable", AccountType::Liability),
    seed("REVENUE", "Sales Revenue", AccountType::Revenue),
    seed("EXPENSE", "Operating Expenses", AccountType::Expense),
    seed("EQUITY", "Owner's Equity", AccountType::Equity),
];
