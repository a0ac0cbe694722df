//! Directory of registered users, keyed by user id.

use indexmap::IndexMap;

use super::error::{Entity, LibraryError, Result};
use crate::domain::{Role, User};

/// In-memory user directory
#[derive(Debug, Clone, Default)]
pub struct Directory {
    users: IndexMap<String, User>,
}

impl Directory {
    /// Create a new empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user. Fails if the id is taken.
    pub fn add(&mut self, user: User) -> Result<()> {
        user.check().map_err(|reason| LibraryError::InvalidRecord {
            id: user.user_id.clone(),
            reason,
        })?;

        if self.users.contains_key(&user.user_id) {
            return Err(LibraryError::DuplicateKey {
                entity: Entity::User,
                id: user.user_id,
            });
        }
        self.users.insert(user.user_id.clone(), user);
        Ok(())
    }

    /// Get a user by id
    pub fn get(&self, user_id: &str) -> Option<&User> {
        self.users.get(user_id)
    }

    /// Check credentials and return the matching user.
    ///
    /// Members log in by id alone. Admins must present their stored password;
    /// an admin without a stored password can never log in.
    pub fn authenticate(&self, user_id: &str, password: Option<&str>) -> Result<&User> {
        let user = self
            .get(user_id)
            .ok_or_else(|| LibraryError::user_not_found(user_id))?;

        match user.role {
            Role::Member => Ok(user),
            Role::Admin => match (user.password.as_deref(), password) {
                (Some(stored), Some(given)) if stored == given => Ok(user),
                _ => Err(LibraryError::AuthenticationFailed {
                    user_id: user_id.to_string(),
                }),
            },
        }
    }

    /// Iterate over all users in insertion order
    pub fn list_all(&self) -> impl Iterator<Item = &User> + '_ {
        self.users.values()
    }

    pub(crate) fn upsert(&mut self, user: User) {
        self.users.insert(user.user_id.clone(), user);
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.users.clear();
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Directory {
        let mut directory = Directory::new();
        directory.add(User::admin("U1", "Ravindra", "admin123")).unwrap();
        directory.add(User::member("U2", "Vinod")).unwrap();
        directory
    }

    #[test]
    fn test_add_duplicate_user() {
        let mut directory = sample();
        let result = directory.add(User::member("U1", "Someone"));
        assert!(matches!(
            result,
            Err(LibraryError::DuplicateKey { entity: Entity::User, .. })
        ));
        assert_eq!(directory.get("U1").unwrap().name, "Ravindra");
        assert_eq!(directory.len(), 2);
    }

    #[test]
    fn test_authenticate_member_without_password() {
        let directory = sample();
        let user = directory.authenticate("U2", None).unwrap();
        assert_eq!(user.name, "Vinod");
    }

    #[test]
    fn test_authenticate_admin() {
        let directory = sample();

        assert!(directory.authenticate("U1", Some("admin123")).is_ok());
        assert!(matches!(
            directory.authenticate("U1", Some("wrong")),
            Err(LibraryError::AuthenticationFailed { .. })
        ));
        assert!(matches!(
            directory.authenticate("U1", None),
            Err(LibraryError::AuthenticationFailed { .. })
        ));
    }

    #[test]
    fn test_authenticate_admin_without_stored_password() {
        let mut directory = Directory::new();
        directory
            .add(User {
                user_id: "A0".to_string(),
                name: "Nobody".to_string(),
                role: Role::Admin,
                password: None,
            })
            .unwrap();

        assert!(directory.authenticate("A0", None).is_err());
        assert!(directory.authenticate("A0", Some("")).is_err());
    }

    #[test]
    fn test_add_rejects_member_with_password() {
        let mut directory = Directory::new();
        let mut user = User::member("U5", "Mo");
        user.password = Some("secret".to_string());

        let result = directory.add(user);
        assert!(matches!(
            result,
            Err(LibraryError::InvalidRecord { ref id, .. }) if id == "U5"
        ));
        assert!(directory.is_empty());
    }

    #[test]
    fn test_large_directory_keeps_insertion_order() {
        let mut directory = Directory::new();
        for i in 0..5000 {
            directory
                .add(User::member(format!("M{}", i), format!("Member {}", i)))
                .unwrap();
        }
        directory.upsert(User::member("M0", "Renamed"));

        assert_eq!(directory.len(), 5000);
        let first = directory.list_all().next().unwrap();
        assert_eq!(first.name, "Renamed");
        assert_eq!(directory.list_all().last().unwrap().user_id, "M4999");
    }

    #[test]
    fn test_authenticate_unknown_user() {
        let directory = sample();
        assert!(matches!(
            directory.authenticate("U9", None),
            Err(LibraryError::NotFound { entity: Entity::User, .. })
        ));
    }
}
