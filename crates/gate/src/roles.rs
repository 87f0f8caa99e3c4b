use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role carried by a decoded credential.
///
/// Roles are intentionally opaque strings at this layer; the gate only
/// distinguishes the two privileged roles below. Unknown roles are valid
/// and simply carry no edge privileges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The role assumed when a credential carries no `role` claim.
    pub fn user() -> Self {
        Self(Cow::Borrowed("user"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this role may enter admin-restricted surfaces.
    pub fn can_administer(&self) -> bool {
        self.0 == "admin"
    }

    /// Whether this role may enter approver-restricted surfaces.
    ///
    /// Admins approve as well; approval rights are a subset of
    /// administration.
    pub fn can_approve(&self) -> bool {
        matches!(self.0.as_ref(), "approver" | "admin")
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::user()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_holds_both_privileges() {
        let role = Role::new("admin");
        assert!(role.can_administer());
        assert!(role.can_approve());
    }

    #[test]
    fn approver_cannot_administer() {
        let role = Role::new("approver");
        assert!(!role.can_administer());
        assert!(role.can_approve());
    }

    #[test]
    fn default_role_is_unprivileged() {
        let role = Role::default();
        assert_eq!(role.as_str(), "user");
        assert!(!role.can_administer());
        assert!(!role.can_approve());
    }

    #[test]
    fn unknown_roles_carry_no_privileges() {
        let role = Role::new("auditor");
        assert!(!role.can_administer());
        assert!(!role.can_approve());
    }
}
