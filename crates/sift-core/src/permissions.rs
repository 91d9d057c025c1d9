//! Domain-level permission lookup

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Identity, Permission};

/// Resolves what a user may do inside a domain
#[async_trait]
pub trait DomainPermissionResolver: Send + Sync {
    async fn permission(&self, user_id: &str, domain: &str) -> Result<Permission>;
}

/// Resolver backed by a fixed table of grants
#[derive(Debug, Clone, Default)]
pub struct StaticDomainPermissions {
    grants: HashMap<(String, String), Permission>,
}

impl StaticDomainPermissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `permission` for `user_id` on `domain`, on top of earlier grants
    #[must_use]
    pub fn grant(
        mut self,
        user_id: impl Into<String>,
        domain: impl Into<String>,
        permission: Permission,
    ) -> Self {
        *self
            .grants
            .entry((user_id.into(), domain.into()))
            .or_default() |= permission;
        self
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

#[async_trait]
impl DomainPermissionResolver for StaticDomainPermissions {
    async fn permission(&self, user_id: &str, domain: &str) -> Result<Permission> {
        Ok(self
            .grants
            .get(&(user_id.to_string(), domain.to_string()))
            .copied()
            .unwrap_or_default())
    }
}

/// Effective permission of a caller on `domain`.
///
/// Admins get everything and anonymous callers nothing. Everyone else gets
/// the resolver's answer plus read access when the domain is in their
/// allowed view domains.
pub async fn resolve_domain_permission(
    resolver: Option<&dyn DomainPermissionResolver>,
    identity: Option<&Identity>,
    domain: &str,
) -> Result<Permission> {
    let Some(user) = identity else {
        return Ok(Permission::NONE);
    };
    if user.is_admin {
        return Ok(Permission::ALL);
    }

    let mut permission = match resolver {
        Some(resolver) => resolver.permission(&user.id, domain).await?,
        None => Permission::NONE,
    };
    if user.allowed_view_domains.contains(domain) {
        permission |= Permission::READ;
    }
    Ok(permission)
}
