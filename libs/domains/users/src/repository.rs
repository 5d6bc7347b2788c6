use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, User};

/// Data access for user records.
///
/// Implementations assign ids and timestamps on insert and must never hold
/// two records with the same email: a conflicting `insert` or `update` fails
/// with [`UserError::DuplicateEmail`]. Any other failure is
/// [`UserError::Storage`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>>;

    /// Exact, case-sensitive match
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn exists_by_email(&self, email: &str) -> UserResult<bool>;

    /// True when a record other than `id` holds `email`
    async fn exists_by_email_excluding_id(&self, email: &str, id: i64) -> UserResult<bool>;

    /// Every record, ordered by id
    async fn find_all(&self) -> UserResult<Vec<User>>;

    async fn insert(&self, user: NewUser) -> UserResult<User>;

    /// Replace the stored record with the same id; fails with
    /// [`UserError::NotFound`] when it is gone
    async fn update(&self, user: User) -> UserResult<User>;

    /// `false` when nothing was removed
    async fn delete_by_id(&self, id: i64) -> UserResult<bool>;
}

#[derive(Debug, Default)]
struct Store {
    users: BTreeMap<i64, User>,
    last_id: i64,
}

impl Store {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// Process-local store for the console's `--in-memory` mode and for tests.
///
/// Uniqueness check and write happen under one write guard.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.values().find(|u| u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> UserResult<bool> {
        let store = self.store.read().await;
        Ok(store.email_taken(email, None))
    }

    async fn exists_by_email_excluding_id(&self, email: &str, id: i64) -> UserResult<bool> {
        let store = self.store.read().await;
        Ok(store.email_taken(email, Some(id)))
    }

    async fn find_all(&self) -> UserResult<Vec<User>> {
        let store = self.store.read().await;
        Ok(store.users.values().cloned().collect())
    }

    async fn insert(&self, user: NewUser) -> UserResult<User> {
        let mut store = self.store.write().await;

        if store.email_taken(&user.email, None) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        store.last_id += 1;
        let now = Utc::now();
        let user = User {
            id: store.last_id,
            name: user.name,
            email: user.email,
            age: user.age,
            created_at: now,
            updated_at: now,
        };
        store.users.insert(user.id, user.clone());

        tracing::debug!(user_id = user.id, "Inserted user");
        Ok(user)
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut store = self.store.write().await;

        if !store.users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id));
        }
        if store.email_taken(&user.email, Some(user.id)) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        store.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_by_id(&self, id: i64) -> UserResult<bool> {
        let mut store = self.store.write().await;
        Ok(store.users.remove(&id).is_some())
    }
}
