use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use sea_orm::{entity::prelude::*, ActiveValue::NotSet, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors::{FieldErrors, ModelError};

pub const NAME_MAX_CHARS: usize = 100;
pub const CATEGORY_MAX_CHARS: usize = 50;

const NAME_REQUIRED: &str = "Name is required";
const NAME_TOO_LONG: &str = "Name must not exceed 100 characters";
const AMOUNT_REQUIRED: &str = "Amount is required";
const AMOUNT_NOT_POSITIVE: &str = "Amount must be positive";
const CYCLE_REQUIRED: &str = "Billing cycle is required";
const CYCLE_INVALID: &str = "Invalid billing cycle";
const DATE_REQUIRED: &str = "Next billing date is required";
const DATE_INVALID: &str = "Next billing date must be a valid date (YYYY-MM-DD)";
const CATEGORY_REQUIRED: &str = "Category is required";
const CATEGORY_TOO_LONG: &str = "Category must not exceed 50 characters";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum BillingCycle {
    #[sea_orm(string_value = "Monthly")]
    Monthly,
    #[sea_orm(string_value = "Weekly")]
    Weekly,
    #[sea_orm(string_value = "Yearly")]
    Yearly,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "Monthly",
            BillingCycle::Weekly => "Weekly",
            BillingCycle::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Case-sensitive: only the exact names are accepted.
impl FromStr for BillingCycle {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Monthly" => Ok(BillingCycle::Monthly),
            "Weekly" => Ok(BillingCycle::Weekly),
            "Yearly" => Ok(BillingCycle::Yearly),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub billing_cycle: BillingCycle,
    pub next_billing_date: NaiveDate,
    pub category: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Request body for create and update. Every field is optional here so that
/// a missing field is reported as a field error rather than a parse failure.
/// An `id` in the body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPayload {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub billing_cycle: Option<String>,
    pub next_billing_date: Option<String>,
    pub category: Option<String>,
}

/// A payload that passed every field constraint. Only [`SubscriptionPayload::validate`]
/// produces one, so anything holding it is safe to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    name: String,
    amount: f64,
    billing_cycle: BillingCycle,
    next_billing_date: NaiveDate,
    category: String,
}

impl NewSubscription {
    pub fn name(&self) -> &str { &self.name }
    pub fn amount(&self) -> f64 { self.amount }
    pub fn billing_cycle(&self) -> BillingCycle { self.billing_cycle }
    pub fn next_billing_date(&self) -> NaiveDate { self.next_billing_date }
    pub fn category(&self) -> &str { &self.category }

    /// The record this input becomes once the store assigns `id`.
    pub fn into_model(self, id: i64) -> Model {
        Model {
            id,
            name: self.name,
            amount: self.amount,
            billing_cycle: self.billing_cycle,
            next_billing_date: self.next_billing_date,
            category: self.category,
        }
    }
}

impl SubscriptionPayload {
    /// Check every field and collect all violations in one pass.
    pub fn validate(self) -> Result<NewSubscription, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = bounded_text(&mut errors, "name", self.name, NAME_MAX_CHARS, NAME_REQUIRED, NAME_TOO_LONG);

        let amount = match self.amount {
            None => {
                errors.add("amount", AMOUNT_REQUIRED);
                None
            }
            Some(a) if a.is_nan() || a <= 0.0 => {
                errors.add("amount", AMOUNT_NOT_POSITIVE);
                None
            }
            Some(a) => Some(a),
        };

        let billing_cycle = match non_blank(self.billing_cycle.as_deref()) {
            None => {
                errors.add("billingCycle", CYCLE_REQUIRED);
                None
            }
            Some(s) => match s.parse::<BillingCycle>() {
                Ok(c) => Some(c),
                Err(()) => {
                    errors.add("billingCycle", CYCLE_INVALID);
                    None
                }
            },
        };

        let next_billing_date = match non_blank(self.next_billing_date.as_deref()) {
            None => {
                errors.add("nextBillingDate", DATE_REQUIRED);
                None
            }
            Some(s) => match parse_iso_date(s) {
                Some(d) => Some(d),
                None => {
                    errors.add("nextBillingDate", DATE_INVALID);
                    None
                }
            },
        };

        let category = bounded_text(
            &mut errors,
            "category",
            self.category,
            CATEGORY_MAX_CHARS,
            CATEGORY_REQUIRED,
            CATEGORY_TOO_LONG,
        );

        match (name, amount, billing_cycle, next_billing_date, category) {
            (Some(name), Some(amount), Some(billing_cycle), Some(next_billing_date), Some(category))
                if errors.is_empty() =>
            {
                Ok(NewSubscription { name, amount, billing_cycle, next_billing_date, category })
            }
            _ => Err(errors),
        }
    }
}

/// Strict `YYYY-MM-DD`: four-digit year, two-digit month and day, nothing else.
fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let shaped = s.len() == 10
        && s.bytes().enumerate().all(|(i, b)| if i == 4 || i == 7 { b == b'-' } else { b.is_ascii_digit() });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn bounded_text(
    errors: &mut FieldErrors,
    field: &'static str,
    value: Option<String>,
    max_chars: usize,
    required: &'static str,
    too_long: &'static str,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => {
            if v.chars().count() > max_chars {
                errors.add(field, too_long);
                None
            } else {
                Some(v)
            }
        }
        _ => {
            errors.add(field, required);
            None
        }
    }
}

/// All rows in insertion order.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    let rows = Entity::find().order_by_asc(Column::Id).all(db).await?;
    Ok(rows)
}

pub async fn find(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, ModelError> {
    let found = Entity::find_by_id(id).one(db).await?;
    Ok(found)
}

pub async fn create(db: &DatabaseConnection, input: &NewSubscription) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: NotSet,
        name: Set(input.name.clone()),
        amount: Set(input.amount),
        billing_cycle: Set(input.billing_cycle),
        next_billing_date: Set(input.next_billing_date),
        category: Set(input.category.clone()),
    };
    let created = am.insert(db).await?;
    Ok(created)
}

/// Replace every column except `id`.
pub async fn overwrite(db: &DatabaseConnection, id: i64, input: &NewSubscription) -> Result<Model, ModelError> {
    let existing = Entity::find_by_id(id).one(db).await?.ok_or(ModelError::NotFound(id))?;
    let mut am: ActiveModel = existing.into();
    am.name = Set(input.name.clone());
    am.amount = Set(input.amount);
    am.billing_cycle = Set(input.billing_cycle);
    am.next_billing_date = Set(input.next_billing_date);
    am.category = Set(input.category.clone());
    match am.update(db).await {
        Ok(updated) => Ok(updated),
        // deleted between the lookup and the write
        Err(DbErr::RecordNotUpdated) => Err(ModelError::NotFound(id)),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<(), ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ModelError::NotFound(id));
    }
    Ok(())
}
