//! `forgeledger-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod cancel;
pub mod entity;
pub mod error;
pub mod id;
pub mod period;
pub mod tenant;
pub mod value_object;

pub use cancel::{CancellationToken, Cancelled};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AccountId, JournalEntryId, JournalLineId, TenantId, UserId};
pub use period::DateRange;
pub use tenant::TenantContext;
pub use value_object::ValueObject;
