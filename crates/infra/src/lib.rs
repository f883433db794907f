//! Infrastructure layer: ledger storage, reporting configuration and the tenant-scoped
//! services (chart bootstrap, posting, journal listing, financial statements).

pub mod config;
pub mod services;
pub mod store;


pub use config::ReportingConfig;
pub use services::{
    AccountRegistry, ChartBootstrapper, ImportResult, JournalEntryView, JournalLineView,
    JournalPage, JournalPoster, JournalQuery, LedgerQueryService, ServiceError, ServiceResult,
    StatementEngine,
};
pub use store::{InMemoryLedgerStore, JournalFilter, LedgerStore, StoreError};
