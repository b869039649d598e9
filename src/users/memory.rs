//! Process-local user directory.
//!
//! Mirrors the query semantics of the MongoDB store, including null handling
//! for absent update/delete fields. Contents are lost on restart.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::users::store::UserStore;
use crate::users::types::{DeleteSummary, StoreResult, UpdateSummary, User, UserFilter};

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create_user(&self, user: User) -> StoreResult<()> {
        self.users.write().await.push(user);
        Ok(())
    }

    async fn find_users(&self, filter: UserFilter) -> StoreResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| filter.matches(u)).cloned().collect())
    }

    async fn update_users_age(
        &self,
        name: Option<String>,
        age: Option<i64>,
    ) -> StoreResult<UpdateSummary> {
        let mut users = self.users.write().await;
        let mut matched = 0;
        let mut modified = 0;
        for user in users.iter_mut().filter(|u| u.name == name) {
            matched += 1;
            if user.age != age {
                user.age = age;
                modified += 1;
            }
        }
        Ok(UpdateSummary::new(matched, modified))
    }

    async fn delete_users_below_age(&self, threshold: Option<i64>) -> StoreResult<DeleteSummary> {
        let Some(threshold) = threshold else {
            return Ok(DeleteSummary::new(0));
        };
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| !matches!(u.age, Some(age) if age < threshold));
        Ok(DeleteSummary::new((before - users.len()) as u64))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
