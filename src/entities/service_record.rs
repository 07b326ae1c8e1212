use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::lifecycle::cascade::ServiceCascade;

/// One breeding event for a sow. Immutable once created except for deletion;
/// at most one litter is ever recorded against it.
///
/// Uniqueness key: (sow_id, service_date).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: Uuid,
    pub sow_id: Uuid,
    pub service_date: NaiveDate,
    pub boar_used: String,
    /// Management dates stamped from the service date at creation time
    pub schedule: ServiceCascade,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewServiceRecord {
    pub sow_id: Uuid,

    pub service_date: NaiveDate,

    #[validate(length(min = 1, max = 50, message = "Boar reference must be between 1 and 50 characters"))]
    pub boar_used: String,
}
