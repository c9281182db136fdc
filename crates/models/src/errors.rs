use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Violated constraints keyed by JSON field name, one message per field.
///
/// Serializes as a flat object, e.g. `{"amount":"Amount must be positive"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    pub fn new() -> Self { Self::default() }

    /// Records `message` for `field`; the first rule a field fails wins.
    pub fn add(&mut self, field: &'static str, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }

    pub fn get(&self, field: &str) -> Option<&'static str> { self.0.get(field).copied() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    #[cfg(test)]
    pub fn len(&self) -> usize { self.0.len() }

    #[cfg(test)]
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ { self.0.keys().copied() }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first { f.write_str("; ")?; }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("subscription {0} not found")]
    NotFound(i64),
    #[error("database error: {0}")]
    Db(String),
}

impl From<sea_orm::DbErr> for ModelError {
    fn from(e: sea_orm::DbErr) -> Self { Self::Db(e.to_string()) }
}
