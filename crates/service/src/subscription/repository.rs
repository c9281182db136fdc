use async_trait::async_trait;

use models::subscription::{Model, NewSubscription};

use crate::errors::ServiceError;

/// Store abstraction for subscription records.
///
/// `get` reports absence as `Ok(None)`; `update` and `delete` report it as
/// [`ServiceError::NotFound`].
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Every record, oldest first.
    async fn list(&self) -> Result<Vec<Model>, ServiceError>;
    async fn get(&self, id: i64) -> Result<Option<Model>, ServiceError>;
    /// Persist and return the record with its assigned id.
    async fn create(&self, input: &NewSubscription) -> Result<Model, ServiceError>;
    async fn update(&self, id: i64, input: &NewSubscription) -> Result<Model, ServiceError>;
    async fn delete(&self, id: i64) -> Result<(), ServiceError>;
}

/// In-process store for tests and local runs without a database.
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use tokio::sync::RwLock;

    #[derive(Default)]
    struct Rows {
        last_id: i64,
        by_id: BTreeMap<i64, Model>, // ids only grow, so key order is insertion order
    }

    #[derive(Default)]
    pub struct InMemorySubscriptionRepository {
        rows: RwLock<Rows>,
    }

    impl InMemorySubscriptionRepository {
        pub fn new() -> Self { Self::default() }
    }

    #[async_trait]
    impl SubscriptionRepository for InMemorySubscriptionRepository {
        async fn list(&self) -> Result<Vec<Model>, ServiceError> {
            let rows = self.rows.read().await;
            Ok(rows.by_id.values().cloned().collect())
        }

        async fn get(&self, id: i64) -> Result<Option<Model>, ServiceError> {
            let rows = self.rows.read().await;
            Ok(rows.by_id.get(&id).cloned())
        }

        async fn create(&self, input: &NewSubscription) -> Result<Model, ServiceError> {
            let mut rows = self.rows.write().await;
            rows.last_id += 1;
            let model = input.clone().into_model(rows.last_id);
            rows.by_id.insert(model.id, model.clone());
            Ok(model)
        }

        async fn update(&self, id: i64, input: &NewSubscription) -> Result<Model, ServiceError> {
            let mut rows = self.rows.write().await;
            let slot = rows.by_id.get_mut(&id).ok_or_else(|| ServiceError::not_found("subscription", id))?;
            *slot = input.clone().into_model(id);
            Ok(slot.clone())
        }

        async fn delete(&self, id: i64) -> Result<(), ServiceError> {
            let mut rows = self.rows.write().await;
            rows.by_id
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| ServiceError::not_found("subscription", id))
        }
    }

}
