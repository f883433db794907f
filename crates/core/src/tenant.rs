//! Explicit tenant scoping.

use crate::error::{DomainError, DomainResult};
use crate::id::{TenantId, UserId};

/// Tenant context for a request.
///
/// Immutable and passed explicitly into every ledger operation. A context without a
/// company is representable (e.g. an unauthenticated caller) so that operations can
/// reject it with [`DomainError::CompanyContextMissing`] instead of panicking.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct TenantContext {
    tenant_id: Option<TenantId>,
    user_id: Option<UserId>,
}

impl TenantContext {
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id: Some(tenant_id),
            user_id: None,
        }
    }

    /// Context with no company in scope.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Resolve the company in scope, or fail with `CompanyContextMissing`.
    pub fn require_tenant(&self) -> DomainResult<TenantId> {
        self.tenant_id.ok_or(DomainError::CompanyContextMissing)
    }
}

impl From<TenantId> for TenantContext {
    fn from(value: TenantId) -> Self {
        Self::new(value)
    }
}
