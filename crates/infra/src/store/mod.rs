//! Tenant-partitioned ledger persistence boundary.

mod r#trait;
pub mod in_memory;

pub use in_memory::InMemoryLedgerStore;
pub use r#trait::{JournalFilter, LedgerStore, StoreError};
