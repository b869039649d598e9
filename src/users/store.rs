//! The user directory seam between HTTP handlers and the datastore.

use async_trait::async_trait;

use crate::users::types::{DeleteSummary, StoreResult, UpdateSummary, User, UserFilter};

/// Bulk operations over the `users` collection.
///
/// Implementations forward each call as a single datastore operation; there
/// are no transactions spanning calls.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a document. Duplicates are allowed.
    async fn create_user(&self, user: User) -> StoreResult<()>;

    /// All documents matching every present field of `filter`.
    ///
    /// An absent field places no constraint on that field. This differs from
    /// [`UserStore::update_users_age`] and [`UserStore::delete_users_below_age`],
    /// where an absent value is forwarded as null.
    async fn find_users(&self, filter: UserFilter) -> StoreResult<Vec<User>>;

    /// Set `age` on every document whose `name` equals `name`.
    ///
    /// `None` values are forwarded as null, matching documents without a
    /// name or clearing the age respectively.
    async fn update_users_age(
        &self,
        name: Option<String>,
        age: Option<i64>,
    ) -> StoreResult<UpdateSummary>;

    /// Delete every document with `age < threshold`. A `None` threshold
    /// matches nothing.
    async fn delete_users_below_age(&self, threshold: Option<i64>) -> StoreResult<DeleteSummary>;

    /// Round-trip to the backing store to confirm it is reachable.
    async fn ping(&self) -> StoreResult<()>;
}
