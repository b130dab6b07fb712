use dashmap::DashSet;

/// Grow-only set of explicitly invalidated credentials.
///
/// The one piece of mutable authority state that breaks the
/// self-contained-token property: a credential is valid iff it parses,
/// is unexpired, and is absent from this set. Lives for the process
/// lifetime; no eviction.
#[derive(Default)]
pub struct RevocationSet {
    revoked: DashSet<String>,
}

impl RevocationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: returns `true` only on first revocation.
    pub fn revoke(&self, token: &str) -> bool {
        self.revoked.insert(token.to_string())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.revoked.contains(token)
    }
}
