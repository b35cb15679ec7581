use crate::domain::{
    UserId,
    user::{NewUser, User},
};
use crate::ports::user_repository::{Result, UserRepository as UserRepositoryTrait};
use async_trait::async_trait;

use super::database::InMemoryDatabase;

/// In-memory implementation of UserRepository
pub struct UserRepository {
    db: InMemoryDatabase,
}

impl UserRepository {
    pub fn new(db: InMemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn insert(&self, user: NewUser) -> Result<User> {
        let mut tables = self.db.lock()?;
        let user = User {
            id: tables.next_user_id(),
            name: user.name,
            email: user.email,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<()> {
        let mut tables = self.db.lock()?;
        if let Some(existing) = tables.users.get_mut(&user.id) {
            *existing = user.clone();
        }
        Ok(())
    }

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>> {
        Ok(self.db.lock()?.users.get(&user_id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        Ok(self.db.lock()?.users.values().cloned().collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .db
            .lock()?
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn delete(&self, user_id: UserId) -> Result<bool> {
        Ok(self.db.lock()?.delete_user_cascade(user_id))
    }
}
