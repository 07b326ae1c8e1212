use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;
use validator::Validate;

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExpenseCategory {
    Feed,
    Veterinary,
    Labor,
    Equipment,
    Utilities,
    Transport,
    Other,
}

/// A farm expense backed by a receipt. Receipt numbers are unique per owner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub receipt_number: String,
    pub category: ExpenseCategory,
    pub vendor: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewExpense {
    pub date: NaiveDate,

    /// Must be positive; checked by the finance service since `validator`
    /// ranges do not cover `Decimal`
    pub amount: Decimal,

    #[validate(length(min = 1, max = 100, message = "Receipt number must be between 1 and 100 characters"))]
    pub receipt_number: String,

    pub category: ExpenseCategory,

    #[validate(length(max = 100))]
    pub vendor: Option<String>,

    #[validate(length(max = 200))]
    pub description: Option<String>,
}
