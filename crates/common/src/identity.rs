//! Caller identity resolution
//!
//! The host runtime authenticates the caller; the core only asks it for the
//! stable principal of the current invocation.

use crate::error::Result;
use crate::types::HolderId;

/// Resolves the calling principal for one invocation
pub trait IdentityProvider {
    /// Raw, host-authenticated principal of the caller
    fn caller_id(&self) -> String;

    /// Holder identifier derived from [`IdentityProvider::caller_id`]
    fn holder_id(&self) -> Result<HolderId> {
        HolderId::derive(&self.caller_id())
    }
}

/// Identity fixed at construction, used by the CLI and in tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticIdentity {
    principal: String,
}

impl StaticIdentity {
    pub fn new(principal: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
        }
    }
}

impl IdentityProvider for StaticIdentity {
    fn caller_id(&self) -> String {
        self.principal.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_identity_holder_id() {
        let alice = StaticIdentity::new("alice");
        assert_eq!(alice.caller_id(), "alice");
        assert_eq!(alice.holder_id().unwrap(), HolderId::derive("alice").unwrap());
    }
}
