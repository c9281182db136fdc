//! Service layer for subscription records.
//! - `repository` abstracts the store (SeaORM or in-memory).
//! - `service` adds the existence checks that turn absence into `NotFound`.
//! - Validation lives with the entity in the `models` crate.

pub mod errors;
pub mod subscription;
#[cfg(test)]
pub mod test_support;
