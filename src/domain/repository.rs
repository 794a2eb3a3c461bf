use async_trait::async_trait;
use uuid::Uuid;

use super::entity::user::User;
use crate::error::persistence::PersistenceError;

/// Window over the stored users, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    pub take: u64,
}

impl Page {
    pub const DEFAULT_SKIP: u64 = 0;
    pub const DEFAULT_TAKE: u64 = 50;
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: Self::DEFAULT_SKIP,
            take: Self::DEFAULT_TAKE,
        }
    }
}

/// Persistent collection of users.
///
/// Every write is atomic and visible to subsequent reads once it returns.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_user(&self, user: &User) -> Result<(), PersistenceError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, PersistenceError>;

    async fn find_users(&self, page: Page) -> Result<Vec<User>, PersistenceError>;

    /// Stores the user state, returning `false` when it no longer exists.
    async fn update_user(&self, user: &User) -> Result<bool, PersistenceError>;

    /// Removes the user, returning `false` when it was already gone.
    async fn delete_user(&self, user: &User) -> Result<bool, PersistenceError>;
}
