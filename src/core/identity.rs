//! Identity-resolution capability.
//!
//! Rules resolve a submitting uid to a display name for audit lines. The
//! underlying mechanism (passwd file, directory service, cache) is behind a
//! narrow trait so it is swappable and independently testable with a fake.

use async_trait::async_trait;
use thiserror::Error;

use super::descriptor::Uid;

/// Errors produced by identity-lookup backends.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// No identity exists for the uid.
    #[error("uid {0} not found")]
    NotFound(Uid),
    /// Backend-specific failure with context.
    #[error("lookup backend error: {0}")]
    Backend(String),
}

/// Maps a numeric uid to a display name via an external identity system.
///
/// Implementations report failures honestly through `Err`; the soft-fail
/// contract (timeout bound, degradation to a placeholder) is applied by the
/// engine so a lookup failure can never block a submission decision.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve a uid to its display name.
    ///
    /// This may block on external I/O and is treated by callers as a
    /// potentially slow, side-effect-free read.
    async fn resolve_username(&self, uid: Uid) -> Result<String, IdentityError>;
}
