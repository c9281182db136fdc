use std::sync::Arc;

use tracing::{info, instrument};

use models::subscription::{Model, NewSubscription};

use crate::errors::ServiceError;
use crate::subscription::repository::SubscriptionRepository;

/// Application service over a subscription store.
/// Turns an absent record into [`ServiceError::NotFound`] before any mutation.
#[derive(Clone)]
pub struct SubscriptionService {
    repo: Arc<dyn SubscriptionRepository>,
}

impl SubscriptionService {
    pub fn new(repo: Arc<dyn SubscriptionRepository>) -> Self { Self { repo } }

    pub async fn list(&self) -> Result<Vec<Model>, ServiceError> { self.repo.list().await }

    /// `Ok(None)` when no record has `id`.
    pub async fn get(&self, id: i64) -> Result<Option<Model>, ServiceError> { self.repo.get(id).await }

    /// Persist a validated subscription.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use models::subscription::SubscriptionPayload;
    /// use service::subscription::{repository::memory::InMemorySubscriptionRepository, SubscriptionService};
    /// let svc = SubscriptionService::new(Arc::new(InMemorySubscriptionRepository::new()));
    /// let input = SubscriptionPayload {
    ///     name: Some("Netflix".into()),
    ///     amount: Some(15.99),
    ///     billing_cycle: Some("Monthly".into()),
    ///     next_billing_date: Some("2024-06-01".into()),
    ///     category: Some("Entertainment".into()),
    /// }
    /// .validate()
    /// .unwrap();
    /// let created = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(created.id, 1);
    /// ```
    #[instrument(skip(self, input), fields(name = %input.name()))]
    pub async fn create(&self, input: NewSubscription) -> Result<Model, ServiceError> {
        let created = self.repo.create(&input).await?;
        info!(id = created.id, "subscription_created");
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: NewSubscription) -> Result<Model, ServiceError> {
        if self.repo.get(id).await?.is_none() {
            return Err(ServiceError::not_found("subscription", id));
        }
        let updated = self.repo.update(id, &input).await?;
        info!(id, "subscription_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if self.repo.get(id).await?.is_none() {
            return Err(ServiceError::not_found("subscription", id));
        }
        self.repo.delete(id).await?;
        info!(id, "subscription_deleted");
        Ok(())
    }
}
