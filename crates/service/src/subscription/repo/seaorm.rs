use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use models::subscription::{self, Model, NewSubscription};

use crate::errors::ServiceError;
use crate::subscription::repository::SubscriptionRepository;

/// SeaORM-backed repository over the `subscriptions` table.
pub struct SeaOrmSubscriptionRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmSubscriptionRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl SubscriptionRepository for SeaOrmSubscriptionRepository {
    async fn list(&self) -> Result<Vec<Model>, ServiceError> {
        Ok(subscription::list(&self.db).await?)
    }

    async fn get(&self, id: i64) -> Result<Option<Model>, ServiceError> {
        Ok(subscription::find(&self.db, id).await?)
    }

    async fn create(&self, input: &NewSubscription) -> Result<Model, ServiceError> {
        Ok(subscription::create(&self.db, input).await?)
    }

    async fn update(&self, id: i64, input: &NewSubscription) -> Result<Model, ServiceError> {
        Ok(subscription::overwrite(&self.db, id, input).await?)
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        Ok(subscription::delete(&self.db, id).await?)
    }
}
