//! Directory users and roles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A registered library user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique directory identifier
    pub user_id: String,

    /// Display name
    pub name: String,

    /// Access role
    pub role: Role,

    /// Login credential (only meaningful for admins)
    #[serde(default)]
    pub password: Option<String>,
}

impl User {
    /// Create a member (no credential)
    pub fn member(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            role: Role::Member,
            password: None,
        }
    }

    /// Create an admin with a login password
    pub fn admin(
        user_id: impl Into<String>,
        name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            role: Role::Admin,
            password: Some(password.into()),
        }
    }

    /// Whether this user holds the admin role
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Check the record's own constraints
    pub fn check(&self) -> Result<(), String> {
        if self.user_id.trim().is_empty() {
            return Err("user_id must not be empty".to_string());
        }
        match (self.role, &self.password) {
            (Role::Member, Some(_)) => Err("only admins carry a password".to_string()),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, role : {}", self.name, self.role)
    }
}

/// User role. Persisted as `"Admin"` / `"member"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// May add and remove catalog entries
    #[serde(rename = "Admin")]
    Admin,

    /// May borrow and return
    #[serde(rename = "member")]
    Member,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::Member => write!(f, "member"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"Admin\"");
        assert_eq!(serde_json::to_string(&Role::Member).unwrap(), "\"member\"");

        let role: Role = serde_json::from_str("\"member\"").unwrap();
        assert_eq!(role, Role::Member);
    }

    #[test]
    fn test_check() {
        assert!(User::admin("U1", "Ravindra", "admin123").check().is_ok());
        assert!(User::member("U2", "Vinod").check().is_ok());
        assert!(User::member(" ", "Blank").check().is_err());

        let mut member = User::member("U3", "Asha");
        member.password = Some("pw".to_string());
        assert!(member.check().is_err());
    }

    #[test]
    fn test_user_display_and_constructors() {
        let admin = User::admin("U1", "Ravindra", "admin123");
        assert!(admin.is_admin());
        assert_eq!(admin.password.as_deref(), Some("admin123"));
        assert_eq!(admin.to_string(), "Ravindra, role : Admin");

        let member = User::member("U2", "Vinod");
        assert!(!member.is_admin());
        assert!(member.password.is_none());
    }

    #[test]
    fn test_user_missing_password_field_defaults_to_none() {
        let user: User =
            serde_json::from_str(r#"{"user_id":"U2","name":"Vinod","role":"member"}"#).unwrap();
        assert_eq!(user, User::member("U2", "Vinod"));
    }
}
