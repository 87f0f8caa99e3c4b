use revhub_gate::{Role, TokenClaims};

/// Identity context for a request that passed the gate with a decoded,
/// unexpired credential.
///
/// Inserted into request extensions by the gate middleware; absent for
/// anonymous requests on public surfaces. Immutable for the request's life.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    claims: TokenClaims,
}

impl AuthContext {
    pub fn new(claims: TokenClaims) -> Self {
        Self { claims }
    }

    pub fn role(&self) -> &Role {
        &self.claims.role
    }

    pub fn claims(&self) -> &TokenClaims {
        &self.claims
    }
}
