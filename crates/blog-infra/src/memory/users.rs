use async_trait::async_trait;
use uuid::Uuid;

use blog_core::domain::User;
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, UserFilter, UserRepository};

use super::{SharedTables, Tables};

/// In-memory user repository. Username and email are unique, like the table.
#[derive(Clone)]
pub struct InMemoryUserRepository {
    tables: SharedTables,
}

impl InMemoryUserRepository {
    pub(crate) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }
}

fn check_unique(tables: &Tables, user: &User) -> Result<(), RepoError> {
    for other in tables.users.iter().filter(|u| u.id != user.id) {
        if other.username == user.username {
            return Err(RepoError::Constraint("username already taken".to_string()));
        }
        if other.email.eq_ignore_ascii_case(&user.email) {
            return Err(RepoError::Constraint("email already registered".to_string()));
        }
    }
    Ok(())
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn add(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.id == user.id) {
            return Err(RepoError::Constraint(format!("duplicate user id {}", user.id)));
        }
        check_unique(&tables, &user)?;
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        check_unique(&tables, &user)?;
        let slot = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, RepoError> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn list(&self, filter: UserFilter) -> Result<Vec<User>, RepoError> {
        let tables = self.tables.read().await;
        let mut found: Vec<User> = tables
            .users
            .iter()
            .rev()
            .filter(|u| filter.active.is_none_or(|a| u.is_active == a))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;

    fn user(name: &str, email: &str) -> User {
        User::new(name, email, "hash".to_string(), None).unwrap()
    }

    #[tokio::test]
    async fn test_lookup_by_username_and_email() {
        let repo = InMemoryStore::new().users();
        let alice = repo.add(user("alice", "alice@example.com")).await.unwrap();

        assert_eq!(
            repo.find_by_username("alice").await.unwrap().map(|u| u.id),
            Some(alice.id)
        );
        assert_eq!(
            repo.find_by_email("ALICE@example.com").await.unwrap().map(|u| u.id),
            Some(alice.id)
        );
        assert!(repo.exists_by_username("alice").await.unwrap());
        assert!(!repo.exists_by_email("bob@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_uniqueness_enforced() {
        let repo = InMemoryStore::new().users();
        repo.add(user("alice", "alice@example.com")).await.unwrap();

        let same_name = repo.add(user("alice", "other@example.com")).await;
        let same_email = repo.add(user("alice2", "alice@example.com")).await;

        assert!(matches!(same_name, Err(RepoError::Constraint(_))));
        assert!(matches!(same_email, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_list_filters_inactive() {
        let repo = InMemoryStore::new().users();
        repo.add(user("alice", "alice@example.com")).await.unwrap();
        let mut bob = repo.add(user("bob", "bob@example.com")).await.unwrap();
        bob.deactivate();
        repo.update(bob).await.unwrap();

        let active = repo.list(UserFilter { active: Some(true) }).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].username, "alice");
        assert_eq!(repo.list(UserFilter::default()).await.unwrap().len(), 2);
    }
}
