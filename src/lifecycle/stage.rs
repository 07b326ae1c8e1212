use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Growth stage of a litter, derived from its age and never stored.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    Preweaning,
    Weaner,
    Grower,
    Finisher,
    /// Farrow date missing or in the future
    Unknown,
}

/// Inclusive upper age bounds for each stage, in days.
///
/// These are policy constants, not computed values. The canonical boundaries
/// are 21/56/98; deployments that still run the older 20/91/112 policy can
/// override them through `LifecycleConfig`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageThresholds {
    pub preweaning_max_age_days: i64,
    pub weaner_max_age_days: i64,
    pub grower_max_age_days: i64,
}

pub const PREWEANING_MAX_AGE_DAYS: i64 = 21;
pub const WEANER_MAX_AGE_DAYS: i64 = 56;
pub const GROWER_MAX_AGE_DAYS: i64 = 98;

impl Default for StageThresholds {
    fn default() -> Self {
        Self {
            preweaning_max_age_days: PREWEANING_MAX_AGE_DAYS,
            weaner_max_age_days: WEANER_MAX_AGE_DAYS,
            grower_max_age_days: GROWER_MAX_AGE_DAYS,
        }
    }
}

impl StageThresholds {
    /// Maps an age in days to a growth stage. Negative ages (farrow date in
    /// the future) classify as `Unknown`.
    pub fn classify(&self, age_days: i64) -> Stage {
        if age_days < 0 {
            Stage::Unknown
        } else if age_days <= self.preweaning_max_age_days {
            Stage::Preweaning
        } else if age_days <= self.weaner_max_age_days {
            Stage::Weaner
        } else if age_days <= self.grower_max_age_days {
            Stage::Grower
        } else {
            Stage::Finisher
        }
    }
}

/// Classifies with the canonical thresholds.
pub fn stage(age_days: i64) -> Stage {
    StageThresholds::default().classify(age_days)
}

/// Age of a litter on a given day. Negative when the farrow date lies in the
/// future.
pub fn age_in_days(farrow_date: NaiveDate, today: NaiveDate) -> i64 {
    (today - farrow_date).num_days()
}
