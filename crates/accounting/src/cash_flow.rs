//! Source-module → cash-flow category classification.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::journal::source_module;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashFlowCategory {
    Operating,
    Investing,
    Financing,
}

/// Lookup table from a journal entry's source module to its cash-flow category.
///
/// The default table routes every known module to `Operating`, and unknown modules fall
/// back to `Operating` as well, so Investing and Financing stay at zero until a mapping
/// is added with [`CashFlowClassifier::with_mapping`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashFlowClassifier {
    table: HashMap<String, CashFlowCategory>,
    fallback: CashFlowCategory,
}

impl Default for CashFlowClassifier {
    fn default() -> Self {
        let table = [
            source_module::SALE,
            source_module::POS,
            source_module::PAYMENT,
            source_module::PURCHASE,
            source_module::ADJUSTMENT,
        ]
        .into_iter()
        .map(|m| (m.to_string(), CashFlowCategory::Operating))
        .collect();

        Self {
            table,
            fallback: CashFlowCategory::Operating,
        }
    }
}

impl CashFlowClassifier {
    pub fn with_mapping(
        mut self,
        source_module: impl Into<String>,
        category: CashFlowCategory,
    ) -> Self {
        self.table.insert(source_module.into(), category);
        self
    }

    pub fn with_fallback(mut self, category: CashFlowCategory) -> Self {
        self.fallback = category;
        self
    }

    pub fn classify(&self, source_module: &str) -> CashFlowCategory {
        self.table.get(source_module).copied().unwrap_or(self.fallback)
    }
}
