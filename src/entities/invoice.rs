use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A sales invoice for a batch of pigs, priced per kilogram.
///
/// Invoice numbers are unique per owner. PDF rendering belongs to the web
/// layer and is out of scope here; this record carries everything it needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub invoice_number: String,
    pub company_name: String,
    pub date: NaiveDate,
    pub num_of_pigs: u32,
    pub total_weight_kg: Decimal,
    pub average_weight_kg: Decimal,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// One pig on an invoice: its weight and the agreed price per kilogram.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub weight_kg: Decimal,
    pub price_per_kg: Decimal,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewInvoice {
    #[validate(length(min = 1, max = 50, message = "Invoice number must be between 1 and 50 characters"))]
    pub invoice_number: String,

    #[validate(length(min = 1, max = 255, message = "Company name is required"))]
    pub company_name: String,

    pub date: NaiveDate,

    #[validate(length(min = 1, message = "An invoice needs at least one pig"))]
    pub lines: Vec<InvoiceLine>,
}
