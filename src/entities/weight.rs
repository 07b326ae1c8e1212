use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

/// How a weighing session was captured: every piglet individually, or a
/// single average over the weighed group.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WeighMethod {
    Individual,
    Average,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    pub id: Uuid,
    pub litter_id: Uuid,
    pub date: NaiveDate,
    pub method: WeighMethod,
    pub piglets_weighed: u32,
    pub average_weight_kg: f64,
    /// Present only for individual weighings
    pub individual_weights_kg: Option<Vec<f64>>,
    pub total_weight_kg: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewWeightRecord {
    pub date: NaiveDate,

    pub method: WeighMethod,

    /// Required for the average method; derived from the weights list for the
    /// individual method
    pub piglets_weighed: Option<u32>,

    pub average_weight_kg: Option<f64>,

    pub individual_weights_kg: Option<Vec<f64>>,

    pub total_weight_kg: Option<f64>,

    #[validate(length(max = 500))]
    pub notes: Option<String>,
}
