//! Persistence model for subscription records: the SeaORM entity, payload
//! validation, and the queries the service layer builds on.

pub mod errors;
pub mod db;
pub mod subscription;
