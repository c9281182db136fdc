//! Subscription module: repository (store) and service.

pub mod repository;
pub mod repo;
pub mod service;

pub use repository::SubscriptionRepository;
pub use service::SubscriptionService;
