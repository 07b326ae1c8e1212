use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Day offsets from the service (breeding) date.
pub const CHECKUP_OFFSET_DAYS: u32 = 21;
pub const LITTER_GUARD_1_OFFSET_DAYS: u32 = 68;
pub const FEED_UP_OFFSET_DAYS: u32 = 90;
pub const LITTER_GUARD_2_OFFSET_DAYS: u32 = 100;
pub const ACTION_OFFSET_DAYS: u32 = 109;
pub const DUE_OFFSET_DAYS: u32 = 114;

/// Day offsets from the farrow date. The wean offset is policy-configurable
/// and passed in by the caller.
pub const IRON_INJECTION_OFFSET_DAYS: u32 = 3;
pub const TAIL_DOCKING_OFFSET_DAYS: u32 = 3;
pub const CASTRATION_OFFSET_DAYS: u32 = 3;
pub const TEETH_CLIPPING_OFFSET_DAYS: u32 = 3;

/// Date format accepted from form input, e.g. "25-12-2024".
const ANCHOR_DATE_FORMAT: &str = "%d-%m-%Y";

/// Management dates derived from a service (breeding) date.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCascade {
    pub checkup: NaiveDate,
    pub litter_guard_1: NaiveDate,
    pub feed_up: NaiveDate,
    pub litter_guard_2: NaiveDate,
    pub action: NaiveDate,
    pub due: NaiveDate,
}

/// Procedure dates derived from a farrow date.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthCascade {
    pub iron_injection: NaiveDate,
    pub tail_docking: NaiveDate,
    pub castration: NaiveDate,
    pub teeth_clipping: NaiveDate,
    pub wean: NaiveDate,
}

/// Computes the service-to-farrowing cascade from one anchor date.
///
/// Pure and idempotent; the only failure mode is calendar overflow, which
/// produces no partial output.
pub fn service_cascade(anchor: NaiveDate) -> Result<ServiceCascade, ServiceError> {
    Ok(ServiceCascade {
        checkup: offset(anchor, CHECKUP_OFFSET_DAYS)?,
        litter_guard_1: offset(anchor, LITTER_GUARD_1_OFFSET_DAYS)?,
        feed_up: offset(anchor, FEED_UP_OFFSET_DAYS)?,
        litter_guard_2: offset(anchor, LITTER_GUARD_2_OFFSET_DAYS)?,
        action: offset(anchor, ACTION_OFFSET_DAYS)?,
        due: offset(anchor, DUE_OFFSET_DAYS)?,
    })
}

/// Computes the farrow-to-procedure cascade. `wean_offset_days` comes from
/// `LifecycleConfig` (default 28).
pub fn birth_cascade(
    farrow_date: NaiveDate,
    wean_offset_days: u32,
) -> Result<BirthCascade, ServiceError> {
    Ok(BirthCascade {
        iron_injection: offset(farrow_date, IRON_INJECTION_OFFSET_DAYS)?,
        tail_docking: offset(farrow_date, TAIL_DOCKING_OFFSET_DAYS)?,
        castration: offset(farrow_date, CASTRATION_OFFSET_DAYS)?,
        teeth_clipping: offset(farrow_date, TEETH_CLIPPING_OFFSET_DAYS)?,
        wean: offset(farrow_date, wean_offset_days)?,
    })
}

/// Parses an anchor date arriving as text from the form layer.
pub fn parse_anchor_date(input: &str) -> Result<NaiveDate, ServiceError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidDate("anchor date is empty".to_string()));
    }
    NaiveDate::parse_from_str(trimmed, ANCHOR_DATE_FORMAT).map_err(|_| {
        ServiceError::InvalidDate(format!(
            "unparseable anchor date '{}', expected day-month-year",
            trimmed
        ))
    })
}

fn offset(anchor: NaiveDate, days: u32) -> Result<NaiveDate, ServiceError> {
    anchor
        .checked_add_days(Days::new(u64::from(days)))
        .ok_or_else(|| {
            ServiceError::InvalidDate(format!(
                "date arithmetic overflow adding {} days to {}",
                days, anchor
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn service_cascade_uses_fixed_offsets() {
        let anchor = date(2024, 1, 1);
        let cascade = service_cascade(anchor).unwrap();
        assert_eq!(cascade.checkup, date(2024, 1, 22));
        assert_eq!(cascade.litter_guard_1, date(2024, 3, 9));
        assert_eq!(cascade.feed_up, date(2024, 3, 31));
        assert_eq!(cascade.litter_guard_2, date(2024, 4, 10));
        assert_eq!(cascade.action, date(2024, 4, 19));
        assert_eq!(cascade.due, date(2024, 4, 24));
    }

    #[test]
    fn birth_cascade_respects_wean_offset() {
        let farrow = date(2024, 6, 1);
        let cascade = birth_cascade(farrow, 28).unwrap();
        assert_eq!(cascade.iron_injection, date(2024, 6, 4));
        assert_eq!(cascade.tail_docking, date(2024, 6, 4));
        assert_eq!(cascade.castration, date(2024, 6, 4));
        assert_eq!(cascade.teeth_clipping, date(2024, 6, 4));
        assert_eq!(cascade.wean, date(2024, 6, 29));

        let legacy = birth_cascade(farrow, 21).unwrap();
        assert_eq!(legacy.wean, date(2024, 6, 22));
    }

    #[test]
    fn cascade_is_idempotent() {
        let anchor = date(2023, 2, 27);
        assert_eq!(service_cascade(anchor).unwrap(), service_cascade(anchor).unwrap());
    }

    #[test]
    fn overflow_fails_without_partial_output() {
        assert_matches!(
            service_cascade(NaiveDate::MAX),
            Err(ServiceError::InvalidDate(_))
        );
    }

    #[test]
    fn parses_day_month_year_anchor() {
        assert_eq!(parse_anchor_date("25-12-2024").unwrap(), date(2024, 12, 25));
        assert_eq!(parse_anchor_date(" 01-01-2024 ").unwrap(), date(2024, 1, 1));
    }

    #[test]
    fn rejects_empty_and_garbage_anchors() {
        assert_matches!(parse_anchor_date(""), Err(ServiceError::InvalidDate(_)));
        assert_matches!(parse_anchor_date("   "), Err(ServiceError::InvalidDate(_)));
        assert_matches!(
            parse_anchor_date("2024-13-45"),
            Err(ServiceError::InvalidDate(_))
        );
        assert_matches!(parse_anchor_date("soon"), Err(ServiceError::InvalidDate(_)));
    }
}
