//! In-memory identity backend for development/testing.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::core::{IdentityError, IdentityResolver, Uid};

/// Map-backed identity resolver.
#[derive(Debug, Default)]
pub struct StaticIdentityResolver {
    users: HashMap<Uid, String>,
}

impl StaticIdentityResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a uid-to-name mapping.
    #[must_use]
    pub fn with_user(mut self, uid: Uid, name: impl Into<String>) -> Self {
        self.users.insert(uid, name.into());
        self
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentityResolver {
    async fn resolve_username(&self, uid: Uid) -> Result<String, IdentityError> {
        self.users
            .get(&uid)
            .cloned()
            .ok_or(IdentityError::NotFound(uid))
    }
}
