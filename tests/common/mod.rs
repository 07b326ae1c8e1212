#![allow(dead_code)]

use chrono::NaiveDate;
use uuid::Uuid;

use herdbook::entities::{Litter, NewLitter, NewServiceRecord, NewSow, ServiceRecord, Sow};
use herdbook::AppState;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn app() -> AppState {
    AppState::default()
}

pub fn owner() -> Uuid {
    Uuid::new_v4()
}

pub fn add_sow(state: &AppState, owner_id: Uuid, tag: &str) -> Sow {
    state
        .services
        .breeding
        .add_sow(
            owner_id,
            NewSow {
                tag: tag.to_string(),
                breed: "Large White".to_string(),
                date_of_birth: None,
            },
        )
        .expect("sow should be registered")
}

pub fn record_service(
    state: &AppState,
    owner_id: Uuid,
    sow_id: Uuid,
    service_date: NaiveDate,
) -> ServiceRecord {
    state
        .services
        .breeding
        .record_service(
            owner_id,
            NewServiceRecord {
                sow_id,
                service_date,
                boar_used: "B-007".to_string(),
            },
        )
        .expect("service should be recorded")
}

/// Registers a sow, services her, and farrows a litter of `born_alive`
/// piglets (no stillbirths) on `farrow_date`.
pub fn seed_litter(
    state: &AppState,
    owner_id: Uuid,
    tag: &str,
    service_date: NaiveDate,
    farrow_date: NaiveDate,
    born_alive: u32,
) -> Litter {
    let sow = add_sow(state, owner_id, tag);
    let record = record_service(state, owner_id, sow.id, service_date);
    state
        .services
        .litters
        .record_litter(
            owner_id,
            NewLitter {
                service_record_id: record.id,
                farrow_date,
                total_born: born_alive,
                born_alive,
                still_born: 0,
                mummified: 0,
                birth_weights: vec![1.5; born_alive as usize],
            },
        )
        .expect("litter should be recorded")
}
