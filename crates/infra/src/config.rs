//! Reporting configuration.

use serde::Deserialize;

use forgeledger_core::{DomainError, DomainResult};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 500;
pub const CASH_ACCOUNT_CODE: &str = "CASH";
pub const RETAINED_EARNINGS_LABEL: &str = "Retained Earnings (Net Income)";

/// Knobs for the ledger query service and statement engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    /// Page size used when a journal query does not specify one.
    pub default_page_size: u32,
    /// Upper bound applied to any requested page size.
    pub max_page_size: u32,
    /// Account code that identifies cash accounts for the cash-flow statement.
    pub cash_account_code: String,
    /// Name of the synthetic net-income line on the balance sheet.
    pub retained_earnings_label: String,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            cash_account_code: CASH_ACCOUNT_CODE.to_string(),
            retained_earnings_label: RETAINED_EARNINGS_LABEL.to_string(),
        }
    }
}

impl ReportingConfig {
    /// Read overrides from `FORGELEDGER_*` environment variables.
    ///
    /// Unset variables keep their defaults. Unparsable, zero or blank values are logged and
    /// ignored; the combined result is validated.
    pub fn from_env() -> DomainResult<Self> {
        let config = Self::from_lookup(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        let page_size = |key: &str, default: u32| match lookup(key) {
            None => default,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(0) => {
                    tracing::warn!(key, "ignoring zero page size override");
                    default
                }
                Ok(size) => size,
                Err(e) => {
                    tracing::warn!(
                        key,
                        value = %raw,
                        error = %e,
                        "ignoring invalid page size override"
                    );
                    default
                }
            },
        };

        config.default_page_size =
            page_size("FORGELEDGER_DEFAULT_PAGE_SIZE", config.default_page_size);
        config.max_page_size = page_size("FORGELEDGER_MAX_PAGE_SIZE", config.max_page_size);

        match lookup("FORGELEDGER_CASH_ACCOUNT_CODE") {
            Some(code) if code.trim().is_empty() => {
                tracing::warn!("ignoring blank cash account code override");
            }
            Some(code) => config.cash_account_code = code.trim().to_string(),
            None => {}
        }
        if let Some(label) = lookup("FORGELEDGER_RETAINED_EARNINGS_LABEL") {
            config.retained_earnings_label = label;
        }

        config
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(raw: &str) -> DomainResult<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| DomainError::validation(format!("invalid reporting config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(DomainError::validation("page sizes must be positive"));
        }
        if self.default_page_size > self.max_page_size {
            return Err(DomainError::validation(
                "default_page_size must not exceed max_page_size",
            ));
        }
        if self.cash_account_code.trim().is_empty() {
            return Err(DomainError::validation("cash_account_code must not be empty"));
        }
        Ok(())
    }
}
