use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VaccinationRecord {
    pub id: Uuid,
    pub litter_id: Uuid,
    pub date: NaiveDate,
    pub vaccine_type: String,
    pub piglets_vaccinated: u32,
    pub dosage_ml: Option<f64>,
    pub next_due_date: Option<NaiveDate>,
    pub administered_by: Option<String>,
    pub batch_number: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewVaccination {
    pub date: NaiveDate,

    #[validate(length(min = 1, max = 100, message = "Vaccine type is required"))]
    pub vaccine_type: String,

    #[validate(range(min = 1, message = "At least one piglet must be vaccinated"))]
    pub piglets_vaccinated: u32,

    pub dosage_ml: Option<f64>,
    pub next_due_date: Option<NaiveDate>,
    pub administered_by: Option<String>,
    pub batch_number: Option<String>,
    pub notes: Option<String>,
}
