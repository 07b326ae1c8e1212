use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::config::LifecycleConfig;
use crate::entities::{
    EventDetail, Litter, NewLitter, NewVaccination, NewWeightRecord, PopulationEvent,
    VaccinationRecord, WeighMethod, WeightRecord,
};
use crate::errors::ServiceError;
use crate::lifecycle::cascade::birth_cascade;
use crate::lifecycle::ledger;
use crate::store::{HerdStore, LitterAggregate};

/// Mortality entry against a litter.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewMortality {
    pub date: NaiveDate,

    #[validate(range(min = 1, message = "At least one death must be recorded"))]
    pub count: u32,

    #[validate(length(min = 1, max = 100, message = "Cause of death is required"))]
    pub cause: String,

    pub age_at_death_days: Option<i64>,
    pub weight_at_death_kg: Option<f64>,
    pub notes: Option<String>,
}

/// Sale entry against a litter.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewSale {
    pub date: NaiveDate,

    #[validate(range(min = 1, message = "At least one pig must be sold"))]
    pub count: u32,

    pub buyer_name: Option<String>,
    pub buyer_contact: Option<String>,
    pub sale_type: Option<String>,
    pub average_weight_kg: Option<f64>,
    pub total_weight_kg: Option<f64>,
    pub price_per_kg: Option<Decimal>,
    pub total_amount: Option<Decimal>,
    pub notes: Option<String>,
}

/// Cross-foster of piglets from one litter to another.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct FosterTransfer {
    pub date: NaiveDate,

    #[validate(range(min = 1, message = "At least one piglet must be transferred"))]
    pub count: u32,

    pub source_litter_id: Uuid,
    pub target_litter_id: Uuid,
}

/// Manages litters and their sub-records: the population event log,
/// vaccinations, and weighings.
#[derive(Clone)]
pub struct LitterService {
    store: Arc<HerdStore>,
    lifecycle: LifecycleConfig,
}

impl LitterService {
    pub fn new(store: Arc<HerdStore>, lifecycle: LifecycleConfig) -> Self {
        Self { store, lifecycle }
    }

    /// Records the farrowing outcome of a service record.
    ///
    /// Enforced here, before anything is stored:
    /// - a service record farrows at most once
    /// - still_born + born_alive + mummified == total_born
    /// - one birth weight per piglet born alive
    #[instrument(skip(self, input), fields(service_record_id = %input.service_record_id))]
    pub fn record_litter(&self, owner_id: Uuid, input: NewLitter) -> Result<Litter, ServiceError> {
        let record = self
            .store
            .service_record(input.service_record_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Service record {} not found",
                    input.service_record_id
                ))
            })?;
        self.authorize_sow(owner_id, record.sow_id)?;

        if self.store.litter_for_service(record.id).is_some() {
            return Err(ServiceError::InvalidOperation(
                "This service record already has an associated litter".to_string(),
            ));
        }

        if input.still_born + input.born_alive + input.mummified != input.total_born {
            return Err(ServiceError::Validation(
                "The total number of piglets born must equal born alive plus still born plus mummified"
                    .to_string(),
            ));
        }
        if input.birth_weights.len() != input.born_alive as usize {
            return Err(ServiceError::Validation(format!(
                "Number of birth weights ({}) must match the number of piglets born alive ({})",
                input.birth_weights.len(),
                input.born_alive
            )));
        }
        if input
            .birth_weights
            .iter()
            .any(|w| !w.is_finite() || *w <= 0.0)
        {
            return Err(ServiceError::Validation(
                "Birth weights must be positive numbers".to_string(),
            ));
        }

        let average_birth_weight = if input.birth_weights.is_empty() {
            0.0
        } else {
            let mean = input.birth_weights.iter().sum::<f64>() / input.birth_weights.len() as f64;
            (mean * 10.0).round() / 10.0
        };
        let schedule = birth_cascade(input.farrow_date, self.lifecycle.wean_offset_days)?;

        let litter = Litter {
            id: Uuid::new_v4(),
            service_record_id: record.id,
            sow_id: record.sow_id,
            farrow_date: input.farrow_date,
            total_born: input.total_born,
            born_alive: input.born_alive,
            still_born: input.still_born,
            mummified: input.mummified,
            birth_weights: input.birth_weights,
            average_birth_weight,
            schedule,
            created_at: Utc::now(),
        };
        self.store.insert_litter(litter.clone());
        info!(
            litter_id = %litter.id,
            born_alive = litter.born_alive,
            wean = %litter.schedule.wean,
            "recorded litter"
        );
        Ok(litter)
    }

    /// Returns a litter with its sub-records, newest entries first.
    pub fn get_litter(&self, owner_id: Uuid, litter_id: Uuid) -> Result<LitterAggregate, ServiceError> {
        let mut aggregate = self.authorize_litter(owner_id, litter_id)?;
        aggregate.events.sort_by(|a, b| b.date.cmp(&a.date));
        aggregate.vaccinations.sort_by(|a, b| b.date.cmp(&a.date));
        aggregate.weights.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(aggregate)
    }

    /// Records piglet deaths. The count may not exceed the litter's current
    /// alive population; the check and the append happen under one entry
    /// lock so concurrent entries cannot overdraw the litter.
    #[instrument(skip(self, input), fields(count = input.count))]
    pub fn record_mortality(
        &self,
        owner_id: Uuid,
        litter_id: Uuid,
        input: NewMortality,
    ) -> Result<PopulationEvent, ServiceError> {
        input.validate()?;
        self.authorize_litter(owner_id, litter_id)?;
        let event = self.store.with_litter_mut(litter_id, |aggregate| {
            let alive = ledger::current_alive(&aggregate.litter, &aggregate.events);
            if input.count > alive {
                return Err(ServiceError::CapacityExceeded(format!(
                    "Cannot record {} deaths. Only {} piglets currently alive.",
                    input.count, alive
                )));
            }
            let event = PopulationEvent {
                id: Uuid::new_v4(),
                litter_id,
                date: input.date,
                count: input.count,
                detail: EventDetail::Mortality {
                    cause: input.cause,
                    age_at_death_days: input.age_at_death_days,
                    weight_at_death_kg: input.weight_at_death_kg,
                    notes: input.notes,
                },
                recorded_at: Utc::now(),
            };
            aggregate.events.push(event.clone());
            Ok(event)
        })?;
        warn!(litter_id = %litter_id, count = event.count, "recorded mortality");
        Ok(event)
    }

    /// Records a sale of piglets from a litter, capacity-checked like
    /// mortality.
    #[instrument(skip(self, input), fields(count = input.count))]
    pub fn record_sale(
        &self,
        owner_id: Uuid,
        litter_id: Uuid,
        input: NewSale,
    ) -> Result<PopulationEvent, ServiceError> {
        input.validate()?;
        self.authorize_litter(owner_id, litter_id)?;
        let event = self.store.with_litter_mut(litter_id, |aggregate| {
            let alive = ledger::current_alive(&aggregate.litter, &aggregate.events);
            if input.count > alive {
                return Err(ServiceError::CapacityExceeded(format!(
                    "Cannot sell {} pigs. Only {} currently available.",
                    input.count, alive
                )));
            }
            let event = PopulationEvent {
                id: Uuid::new_v4(),
                litter_id,
                date: input.date,
                count: input.count,
                detail: EventDetail::Sale {
                    buyer_name: input.buyer_name,
                    buyer_contact: input.buyer_contact,
                    sale_type: input.sale_type,
                    average_weight_kg: input.average_weight_kg,
                    total_weight_kg: input.total_weight_kg,
                    price_per_kg: input.price_per_kg,
                    total_amount: input.total_amount,
                    notes: input.notes,
                },
                recorded_at: Utc::now(),
            };
            aggregate.events.push(event.clone());
            Ok(event)
        })?;
        info!(litter_id = %litter_id, count = event.count, "recorded sale");
        Ok(event)
    }

    /// Moves piglets between two litters, e.g. to balance litter sizes.
    ///
    /// The source litter is debited first under its own entry lock, with the
    /// usual capacity check; the credit to the target follows. If the target
    /// disappears between the two steps the debit is compensated, so the pair
    /// is recorded completely or not at all.
    #[instrument(skip(self, input), fields(count = input.count))]
    pub fn transfer_piglets(
        &self,
        owner_id: Uuid,
        input: FosterTransfer,
    ) -> Result<(PopulationEvent, PopulationEvent), ServiceError> {
        input.validate()?;
        if input.source_litter_id == input.target_litter_id {
            return Err(ServiceError::InvalidOperation(
                "Cannot cross-foster a litter into itself".to_string(),
            ));
        }
        self.authorize_litter(owner_id, input.source_litter_id)?;
        self.authorize_litter(owner_id, input.target_litter_id)?;

        let out_event = self
            .store
            .with_litter_mut(input.source_litter_id, |aggregate| {
                let alive = ledger::current_alive(&aggregate.litter, &aggregate.events);
                if input.count > alive {
                    return Err(ServiceError::CapacityExceeded(format!(
                        "Cannot transfer {} piglets. Only {} currently alive.",
                        input.count, alive
                    )));
                }
                let event = PopulationEvent {
                    id: Uuid::new_v4(),
                    litter_id: input.source_litter_id,
                    date: input.date,
                    count: input.count,
                    detail: EventDetail::FosterOut {
                        target_litter_id: input.target_litter_id,
                    },
                    recorded_at: Utc::now(),
                };
                aggregate.events.push(event.clone());
                Ok(event)
            })?;

        let in_result = self
            .store
            .with_litter_mut(input.target_litter_id, |aggregate| {
                let event = PopulationEvent {
                    id: Uuid::new_v4(),
                    litter_id: input.target_litter_id,
                    date: input.date,
                    count: input.count,
                    detail: EventDetail::FosterIn {
                        source_litter_id: input.source_litter_id,
                    },
                    recorded_at: Utc::now(),
                };
                aggregate.events.push(event.clone());
                Ok(event)
            });

        match in_result {
            Ok(in_event) => {
                info!(
                    source = %input.source_litter_id,
                    target = %input.target_litter_id,
                    count = input.count,
                    "cross-fostered piglets"
                );
                Ok((out_event, in_event))
            }
            Err(err) => {
                let out_id = out_event.id;
                let _ = self.store.with_litter_mut(input.source_litter_id, |aggregate| {
                    aggregate.events.retain(|e| e.id != out_id);
                    Ok(())
                });
                Err(err)
            }
        }
    }

    /// Removes a population event, freeing its count back into the
    /// current-alive arithmetic. Nothing else cascades.
    #[instrument(skip(self))]
    pub fn delete_event(
        &self,
        owner_id: Uuid,
        litter_id: Uuid,
        event_id: Uuid,
    ) -> Result<(), ServiceError> {
        self.authorize_litter(owner_id, litter_id)?;
        self.store.with_litter_mut(litter_id, |aggregate| {
            let before = aggregate.events.len();
            aggregate.events.retain(|e| e.id != event_id);
            if aggregate.events.len() == before {
                return Err(ServiceError::NotFound(format!(
                    "Population event {} not found",
                    event_id
                )));
            }
            Ok(())
        })?;
        info!(litter_id = %litter_id, event_id = %event_id, "deleted population event");
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub fn add_vaccination(
        &self,
        owner_id: Uuid,
        litter_id: Uuid,
        input: NewVaccination,
    ) -> Result<VaccinationRecord, ServiceError> {
        input.validate()?;
        self.authorize_litter(owner_id, litter_id)?;
        self.store.with_litter_mut(litter_id, |aggregate| {
            let record = VaccinationRecord {
                id: Uuid::new_v4(),
                litter_id,
                date: input.date,
                vaccine_type: input.vaccine_type,
                piglets_vaccinated: input.piglets_vaccinated,
                dosage_ml: input.dosage_ml,
                next_due_date: input.next_due_date,
                administered_by: input.administered_by,
                batch_number: input.batch_number,
                notes: input.notes,
                created_at: Utc::now(),
            };
            aggregate.vaccinations.push(record.clone());
            Ok(record)
        })
    }

    pub fn delete_vaccination(
        &self,
        owner_id: Uuid,
        litter_id: Uuid,
        record_id: Uuid,
    ) -> Result<(), ServiceError> {
        self.authorize_litter(owner_id, litter_id)?;
        self.store.with_litter_mut(litter_id, |aggregate| {
            let before = aggregate.vaccinations.len();
            aggregate.vaccinations.retain(|r| r.id != record_id);
            if aggregate.vaccinations.len() == before {
                return Err(ServiceError::NotFound(format!(
                    "Vaccination record {} not found",
                    record_id
                )));
            }
            Ok(())
        })
    }

    /// Vaccinations whose follow-up dose falls on or after `today`, soonest
    /// first.
    pub fn upcoming_vaccinations(
        &self,
        owner_id: Uuid,
        litter_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<VaccinationRecord>, ServiceError> {
        let aggregate = self.authorize_litter(owner_id, litter_id)?;
        let mut upcoming: Vec<VaccinationRecord> = aggregate
            .vaccinations
            .into_iter()
            .filter(|r| r.next_due_date.is_some_and(|due| due >= today))
            .collect();
        upcoming.sort_by_key(|r| r.next_due_date);
        Ok(upcoming)
    }

    /// Records a weighing session. Individual weighings derive the count and
    /// average from the weights list; average weighings take them as given.
    #[instrument(skip(self, input))]
    pub fn add_weight_record(
        &self,
        owner_id: Uuid,
        litter_id: Uuid,
        input: NewWeightRecord,
    ) -> Result<WeightRecord, ServiceError> {
        input.validate()?;
        self.authorize_litter(owner_id, litter_id)?;

        let (piglets_weighed, average_weight_kg, individual_weights_kg, total_weight_kg) =
            match input.method {
                WeighMethod::Individual => {
                    let weights = input.individual_weights_kg.unwrap_or_default();
                    if weights.is_empty() {
                        return Err(ServiceError::Validation(
                            "Individual weighing requires at least one weight".to_string(),
                        ));
                    }
                    if weights.iter().any(|w| !w.is_finite() || *w <= 0.0) {
                        return Err(ServiceError::Validation(
                            "Weights must be positive numbers".to_string(),
                        ));
                    }
                    let total: f64 = weights.iter().sum();
                    let average = total / weights.len() as f64;
                    (weights.len() as u32, average, Some(weights), Some(total))
                }
                WeighMethod::Average => {
                    let average = input.average_weight_kg.ok_or_else(|| {
                        ServiceError::Validation(
                            "Average weighing requires an average weight".to_string(),
                        )
                    })?;
                    if !average.is_finite() || average <= 0.0 {
                        return Err(ServiceError::Validation(
                            "Average weight must be a positive number".to_string(),
                        ));
                    }
                    let count = input.piglets_weighed.ok_or_else(|| {
                        ServiceError::Validation(
                            "Average weighing requires the number of piglets weighed".to_string(),
                        )
                    })?;
                    if count == 0 {
                        return Err(ServiceError::Validation(
                            "At least one piglet must be weighed".to_string(),
                        ));
                    }
                    (count, average, None, input.total_weight_kg)
                }
            };

        self.store.with_litter_mut(litter_id, |aggregate| {
            let record = WeightRecord {
                id: Uuid::new_v4(),
                litter_id,
                date: input.date,
                method: input.method,
                piglets_weighed,
                average_weight_kg,
                individual_weights_kg,
                total_weight_kg,
                notes: input.notes,
                created_at: Utc::now(),
            };
            aggregate.weights.push(record.clone());
            Ok(record)
        })
    }

    pub fn delete_weight_record(
        &self,
        owner_id: Uuid,
        litter_id: Uuid,
        record_id: Uuid,
    ) -> Result<(), ServiceError> {
        self.authorize_litter(owner_id, litter_id)?;
        self.store.with_litter_mut(litter_id, |aggregate| {
            let before = aggregate.weights.len();
            aggregate.weights.retain(|r| r.id != record_id);
            if aggregate.weights.len() == before {
                return Err(ServiceError::NotFound(format!(
                    "Weight record {} not found",
                    record_id
                )));
            }
            Ok(())
        })
    }

    fn authorize_sow(&self, owner_id: Uuid, sow_id: Uuid) -> Result<(), ServiceError> {
        self.store
            .sow(sow_id)
            .filter(|sow| sow.owner_id == owner_id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(format!("Sow {} not found", sow_id)))
    }

    fn authorize_litter(
        &self,
        owner_id: Uuid,
        litter_id: Uuid,
    ) -> Result<LitterAggregate, ServiceError> {
        let aggregate = self
            .store
            .litter_aggregate(litter_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Litter {} not found", litter_id)))?;
        self.authorize_sow(owner_id, aggregate.litter.sow_id)?;
        Ok(aggregate)
    }
}
