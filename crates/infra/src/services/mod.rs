//! Application services over a [`LedgerStore`](crate::store::LedgerStore).
//!
//! Every operation takes an explicit [`TenantContext`](forgeledger_core::TenantContext)
//! and a [`CancellationToken`](forgeledger_core::CancellationToken). Reads are stateless;
//! the only writes are chart maintenance and journal posting.

pub mod bootstrap;
pub mod error;
pub mod ledger_query;
pub mod posting;
pub mod registry;
pub mod statements;

pub use bootstrap::{ChartBootstrapper, ImportResult};
pub use error::{ServiceError, ServiceResult};
pub use ledger_query::{
    JournalEntryView, JournalLineView, JournalPage, JournalQuery, LedgerQueryService,
};
pub use posting::JournalPoster;
pub use registry::AccountRegistry;
pub use statements::StatementEngine;
