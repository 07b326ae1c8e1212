use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lifecycle::cascade::BirthCascade;

/// A farrowed litter. Static birth counts never change after creation; the
/// moving parts (mortality, sales, fostering) live in the event log.
///
/// Invariants enforced at creation:
/// - still_born + born_alive + mummified == total_born
/// - birth_weights.len() == born_alive
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Litter {
    pub id: Uuid,
    pub service_record_id: Uuid,
    pub sow_id: Uuid,
    pub farrow_date: NaiveDate,
    pub total_born: u32,
    pub born_alive: u32,
    pub still_born: u32,
    pub mummified: u32,
    /// One birth weight per piglet born alive, in kilograms
    pub birth_weights: Vec<f64>,
    /// Mean of birth_weights rounded to one decimal, 0.0 for an all-stillborn litter
    pub average_birth_weight: f64,
    /// Procedure dates stamped from the farrow date at creation time
    pub schedule: BirthCascade,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewLitter {
    pub service_record_id: Uuid,
    pub farrow_date: NaiveDate,
    pub total_born: u32,
    pub born_alive: u32,
    pub still_born: u32,
    #[serde(default)]
    pub mummified: u32,
    pub birth_weights: Vec<f64>,
}
