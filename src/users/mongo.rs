//! MongoDB-backed user directory.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};

use crate::config::DatabaseConfig;
use crate::users::store::UserStore;
use crate::users::types::{DeleteSummary, StoreResult, UpdateSummary, User, UserFilter};

/// User store over a single shared MongoDB client.
///
/// The driver pools connections internally; this type only holds the client
/// and a typed handle to the configured collection. Cloning is cheap.
#[derive(Clone)]
pub struct MongoUserStore {
    client: Client,
    users: Collection<User>,
}

impl MongoUserStore {
    /// Build a client from `config`. The driver connects lazily; call
    /// [`UserStore::ping`] to force a round-trip.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        let timeout = Duration::from_secs(config.connect_timeout_secs);
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(options)?;
        let users = client
            .database(&config.name)
            .collection::<User>(&config.collection);

        tracing::info!(
            database = %config.name,
            collection = %config.collection,
            "MongoDB user store configured"
        );
        Ok(Self { client, users })
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn create_user(&self, user: User) -> StoreResult<()> {
        let result = self.users.insert_one(&user).await?;
        tracing::debug!(id = %result.inserted_id, "User inserted");
        Ok(())
    }

    async fn find_users(&self, filter: UserFilter) -> StoreResult<Vec<User>> {
        let cursor = self.users.find(find_filter(&filter)).await?;
        let users: Vec<User> = cursor.try_collect().await?;
        Ok(users)
    }

    async fn update_users_age(
        &self,
        name: Option<String>,
        age: Option<i64>,
    ) -> StoreResult<UpdateSummary> {
        let (filter, update) = update_age_documents(name, age);
        let result = self.users.update_many(filter, update).await?;
        Ok(UpdateSummary {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(result.upserted_id.is_some()),
            upserted_id: result.upserted_id.map(|id| match id {
                Bson::ObjectId(oid) => oid.to_hex(),
                other => other.to_string(),
            }),
        })
    }

    async fn delete_users_below_age(&self, threshold: Option<i64>) -> StoreResult<DeleteSummary> {
        let result = self.users.delete_many(delete_below_filter(threshold)).await?;
        Ok(DeleteSummary::new(result.deleted_count))
    }

    async fn ping(&self) -> StoreResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}

fn optional<T: Into<Bson>>(value: Option<T>) -> Bson {
    value.map_or(Bson::Null, Into::into)
}

/// Implicit-AND filter over the fields present in `filter`.
pub(crate) fn find_filter(filter: &UserFilter) -> Document {
    let mut document = Document::new();
    if let Some(name) = &filter.name {
        document.insert("name", name.as_str());
    }
    if let Some(age) = filter.age {
        document.insert("age", age);
    }
    document
}

pub(crate) fn update_age_documents(name: Option<String>, age: Option<i64>) -> (Document, Document) {
    let filter = doc! { "name": optional(name) };
    let update = doc! { "$set": { "age": optional(age) } };
    (filter, update)
}

pub(crate) fn delete_below_filter(threshold: Option<i64>) -> Document {
    doc! { "age": { "$lt": optional(threshold) } }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_filter_only_includes_present_fields() {
        assert_eq!(find_filter(&UserFilter::default()), Document::new());
        assert_eq!(
            find_filter(&UserFilter {
                name: Some("Alice".into()),
                age: None
            }),
            doc! { "name": "Alice" }
        );
        assert_eq!(
            find_filter(&UserFilter {
                name: Some("Alice".into()),
                age: Some(30)
            }),
            doc! { "name": "Alice", "age": 30_i64 }
        );
    }

    #[test]
    fn test_update_documents() {
        let (filter, update) = update_age_documents(Some("Alice".into()), Some(31));
        assert_eq!(filter, doc! { "name": "Alice" });
        assert_eq!(update, doc! { "$set": { "age": 31_i64 } });
    }

    #[test]
    fn test_update_documents_forward_nulls() {
        let (filter, update) = update_age_documents(None, None);
        assert_eq!(filter, doc! { "name": Bson::Null });
        assert_eq!(update, doc! { "$set": { "age": Bson::Null } });
    }

    #[test]
    fn test_delete_filter() {
        assert_eq!(delete_below_filter(Some(18)), doc! { "age": { "$lt": 18_i64 } });
        assert_eq!(delete_below_filter(None), doc! { "age": { "$lt": Bson::Null } });
    }
}
