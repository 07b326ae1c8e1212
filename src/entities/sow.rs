use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A breeding female. Tags are unique per owner, not globally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sow {
    pub id: Uuid,
    pub tag: String,
    pub breed: String,
    pub date_of_birth: Option<NaiveDate>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewSow {
    #[validate(length(min = 1, max = 20, message = "Sow tag must be between 1 and 20 characters"))]
    pub tag: String,

    #[validate(length(min = 1, max = 50, message = "Breed must be between 1 and 50 characters"))]
    pub breed: String,

    pub date_of_birth: Option<NaiveDate>,
}
