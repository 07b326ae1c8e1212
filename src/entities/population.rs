use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Append-only population change against one litter.
///
/// Deleting an event simply frees its count back into the current-alive
/// arithmetic; nothing cascades beyond that.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationEvent {
    pub id: Uuid,
    pub litter_id: Uuid,
    pub date: NaiveDate,
    /// Number of piglets the event moves; always > 0
    pub count: u32,
    pub detail: EventDetail,
    pub recorded_at: DateTime<Utc>,
}

/// Type-specific payload of a population event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventDetail {
    Mortality {
        cause: String,
        age_at_death_days: Option<i64>,
        weight_at_death_kg: Option<f64>,
        notes: Option<String>,
    },
    Sale {
        buyer_name: Option<String>,
        buyer_contact: Option<String>,
        sale_type: Option<String>,
        average_weight_kg: Option<f64>,
        total_weight_kg: Option<f64>,
        price_per_kg: Option<Decimal>,
        total_amount: Option<Decimal>,
        notes: Option<String>,
    },
    /// Piglets moved in from another litter
    FosterIn { source_litter_id: Uuid },
    /// Piglets moved out to another litter
    FosterOut { target_litter_id: Uuid },
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    Mortality,
    Sale,
    FosterIn,
    FosterOut,
}

impl EventDetail {
    pub fn kind(&self) -> EventKind {
        match self {
            EventDetail::Mortality { .. } => EventKind::Mortality,
            EventDetail::Sale { .. } => EventKind::Sale,
            EventDetail::FosterIn { .. } => EventKind::FosterIn,
            EventDetail::FosterOut { .. } => EventKind::FosterOut,
        }
    }

    /// True for events that remove piglets and are therefore subject to the
    /// write-side capacity check.
    pub fn removes_piglets(&self) -> bool {
        matches!(
            self,
            EventDetail::Mortality { .. } | EventDetail::Sale { .. } | EventDetail::FosterOut { .. }
        )
    }
}
