use rust_decimal::Decimal;
use serde::Serialize;

use crate::entities::litter::Litter;
use crate::entities::population::{EventDetail, PopulationEvent};

/// Per-kind event totals for one litter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LedgerTotals {
    pub fostered_in: u32,
    pub fostered_out: u32,
    pub mortalities: u32,
    pub sold: u32,
}

pub fn totals(events: &[PopulationEvent]) -> LedgerTotals {
    let mut acc = LedgerTotals::default();
    for event in events {
        match &event.detail {
            EventDetail::FosterIn { .. } => acc.fostered_in += event.count,
            EventDetail::FosterOut { .. } => acc.fostered_out += event.count,
            EventDetail::Mortality { .. } => acc.mortalities += event.count,
            EventDetail::Sale { .. } => acc.sold += event.count,
        }
    }
    acc
}

/// Number of piglets currently alive in the litter.
///
/// born_alive + fostered in, minus fostering out, mortality, and sales.
/// Clamped at zero: entry mistakes must never yield a negative population.
/// The clamp is defense in depth; the write side rejects events that would
/// overdraw the litter before they are recorded.
pub fn current_alive(litter: &Litter, events: &[PopulationEvent]) -> u32 {
    let t = totals(events);
    let alive = i64::from(litter.born_alive) + i64::from(t.fostered_in)
        - i64::from(t.fostered_out)
        - i64::from(t.mortalities)
        - i64::from(t.sold);
    alive.max(0) as u32
}

/// Share of piglets ever carried by this litter (born alive plus fostered in)
/// that are still alive, as a percentage rounded to one decimal. Zero when
/// the litter never carried a live piglet.
pub fn survival_rate(litter: &Litter, events: &[PopulationEvent]) -> f64 {
    let t = totals(events);
    let denominator = litter.born_alive + t.fostered_in;
    if denominator == 0 {
        return 0.0;
    }
    let rate = f64::from(current_alive(litter, events)) / f64::from(denominator) * 100.0;
    (rate * 10.0).round() / 10.0
}

/// Total revenue recorded against the litter's sale events.
pub fn sales_revenue(events: &[PopulationEvent]) -> Decimal {
    events
        .iter()
        .filter_map(|event| match &event.detail {
            EventDetail::Sale { total_amount, .. } => *total_amount,
            _ => None,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::lifecycle::cascade::birth_cascade;

    fn litter(born_alive: u32) -> Litter {
        let farrow_date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        Litter {
            id: Uuid::new_v4(),
            service_record_id: Uuid::new_v4(),
            sow_id: Uuid::new_v4(),
            farrow_date,
            total_born: born_alive,
            born_alive,
            still_born: 0,
            mummified: 0,
            birth_weights: vec![1.4; born_alive as usize],
            average_birth_weight: 1.4,
            schedule: birth_cascade(farrow_date, 28).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn event(litter_id: Uuid, count: u32, detail: EventDetail) -> PopulationEvent {
        PopulationEvent {
            id: Uuid::new_v4(),
            litter_id,
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            count,
            detail,
            recorded_at: Utc::now(),
        }
    }

    fn mortality(litter_id: Uuid, count: u32) -> PopulationEvent {
        event(
            litter_id,
            count,
            EventDetail::Mortality {
                cause: "crushing".to_string(),
                age_at_death_days: None,
                weight_at_death_kg: None,
                notes: None,
            },
        )
    }

    #[test]
    fn no_events_means_born_alive() {
        let l = litter(9);
        assert_eq!(current_alive(&l, &[]), 9);
        assert_eq!(survival_rate(&l, &[]), 100.0);
    }

    #[test]
    fn events_fold_into_alive_count() {
        let l = litter(10);
        let events = vec![
            mortality(l.id, 2),
            event(
                l.id,
                3,
                EventDetail::FosterIn {
                    source_litter_id: Uuid::new_v4(),
                },
            ),
            event(
                l.id,
                1,
                EventDetail::FosterOut {
                    target_litter_id: Uuid::new_v4(),
                },
            ),
            event(
                l.id,
                4,
                EventDetail::Sale {
                    buyer_name: None,
                    buyer_contact: None,
                    sale_type: None,
                    average_weight_kg: None,
                    total_weight_kg: None,
                    price_per_kg: None,
                    total_amount: Some(dec!(320.00)),
                    notes: None,
                },
            ),
        ];
        // 10 + 3 - 1 - 2 - 4
        assert_eq!(current_alive(&l, &events), 6);
        // 6 alive of 13 carried
        assert_eq!(survival_rate(&l, &events), 46.2);
        assert_eq!(sales_revenue(&events), dec!(320.00));
    }

    #[test]
    fn adversarial_sequence_clamps_at_zero() {
        let l = litter(2);
        let events = vec![mortality(l.id, 2), mortality(l.id, 5), mortality(l.id, 9)];
        assert_eq!(current_alive(&l, &events), 0);
        assert_eq!(survival_rate(&l, &events), 0.0);
    }

    #[test]
    fn empty_litter_has_zero_rate_not_nan() {
        let l = litter(0);
        assert_eq!(current_alive(&l, &[]), 0);
        assert_eq!(survival_rate(&l, &[]), 0.0);
    }

    #[test]
    fn rate_rounds_to_one_decimal() {
        let l = litter(3);
        let events = vec![mortality(l.id, 1)];
        // 2/3 = 66.666... -> 66.7
        assert_eq!(survival_rate(&l, &events), 66.7);
    }
}
