//! Passwd-file identity backend.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::core::{IdentityError, IdentityResolver, Uid};

/// Resolves uids against a passwd-format file (`name:x:uid:...`).
///
/// Reads the file on every lookup; the engine bounds the call with its
/// lookup timeout, and callers that need caching can wrap this resolver.
#[derive(Debug, Clone)]
pub struct PasswdResolver {
    path: PathBuf,
}

impl PasswdResolver {
    /// Resolver against the system passwd database.
    pub fn new() -> Self {
        Self {
            path: PathBuf::from("/etc/passwd"),
        }
    }

    /// Resolver against a passwd-format file at an arbitrary path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for PasswdResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityResolver for PasswdResolver {
    async fn resolve_username(&self, uid: Uid) -> Result<String, IdentityError> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| IdentityError::Backend(format!("{}: {e}", self.path.display())))?;
        for line in body.lines() {
            let mut fields = line.split(':');
            let name = fields.next();
            let _password = fields.next();
            let id = fields.next();
            if let (Some(name), Some(id)) = (name, id) {
                if id.trim().parse::<Uid>() == Ok(uid) {
                    return Ok(name.to_string());
                }
            }
        }
        Err(IdentityError::NotFound(uid))
    }
}
