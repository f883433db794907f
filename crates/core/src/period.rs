//! Inclusive calendar date windows used by statements and journal queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Inclusive date range `[from, to]`, either bound optional.
///
/// Construction rejects inverted ranges, so a `DateRange` in hand is always well-formed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DateRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl ValueObject for DateRange {}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> DomainResult<Self> {
        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err(DomainError::validation(format!(
                    "date range start {f} is after end {t}"
                )));
            }
        }
        Ok(Self { from, to })
    }

    /// Closed range; both bounds required.
    pub fn between(from: NaiveDate, to: NaiveDate) -> DomainResult<Self> {
        Self::new(Some(from), Some(to))
    }

    /// Everything up to and including `to`.
    pub fn up_to(to: NaiveDate) -> Self {
        Self {
            from: None,
            to: Some(to),
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    pub fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|f| date >= f) && self.to.is_none_or(|t| date <= t)
    }
}
