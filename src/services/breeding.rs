use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::entities::{Boar, NewBoar, NewServiceRecord, NewSow, ServiceRecord, Sow};
use crate::errors::ServiceError;
use crate::lifecycle::cascade::service_cascade;
use crate::store::HerdStore;

/// Manages breeding stock and service (breeding) events.
#[derive(Clone)]
pub struct BreedingService {
    store: Arc<HerdStore>,
}

impl BreedingService {
    pub fn new(store: Arc<HerdStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, input), fields(tag = %input.tag))]
    pub fn add_sow(&self, owner_id: Uuid, input: NewSow) -> Result<Sow, ServiceError> {
        input.validate()?;
        if self.store.sow_by_tag(owner_id, &input.tag).is_some() {
            return Err(ServiceError::Conflict(format!(
                "Sow {} is already registered for this account",
                input.tag
            )));
        }
        let sow = Sow {
            id: Uuid::new_v4(),
            tag: input.tag,
            breed: input.breed,
            date_of_birth: input.date_of_birth,
            owner_id,
            created_at: Utc::now(),
        };
        self.store.insert_sow(sow.clone());
        info!(sow_id = %sow.id, tag = %sow.tag, "registered sow");
        Ok(sow)
    }

    #[instrument(skip(self, input), fields(tag = %input.tag))]
    pub fn add_boar(&self, owner_id: Uuid, input: NewBoar) -> Result<Boar, ServiceError> {
        input.validate()?;
        if self.store.boar_by_tag(owner_id, &input.tag).is_some() {
            return Err(ServiceError::Conflict(format!(
                "Boar {} is already registered for this account",
                input.tag
            )));
        }
        let boar = Boar {
            id: Uuid::new_v4(),
            tag: input.tag,
            breed: input.breed,
            date_of_birth: input.date_of_birth,
            owner_id,
            created_at: Utc::now(),
        };
        self.store.insert_boar(boar.clone());
        info!(boar_id = %boar.id, tag = %boar.tag, "registered boar");
        Ok(boar)
    }

    pub fn list_sows(&self, owner_id: Uuid) -> Vec<Sow> {
        self.store.sows_for_owner(owner_id)
    }

    pub fn list_boars(&self, owner_id: Uuid) -> Vec<Boar> {
        self.store.boars_for_owner(owner_id)
    }

    pub fn get_sow(&self, owner_id: Uuid, sow_id: Uuid) -> Result<Sow, ServiceError> {
        self.store
            .sow(sow_id)
            .filter(|sow| sow.owner_id == owner_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Sow {} not found", sow_id)))
    }

    /// Deletes a sow together with her service records and litters.
    #[instrument(skip(self))]
    pub fn delete_sow(&self, owner_id: Uuid, sow_id: Uuid) -> Result<(), ServiceError> {
        let sow = self.get_sow(owner_id, sow_id)?;
        self.store.remove_sow(sow.id);
        info!(sow_id = %sow.id, tag = %sow.tag, "deleted sow and dependent records");
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn delete_boar(&self, owner_id: Uuid, boar_id: Uuid) -> Result<(), ServiceError> {
        self.store
            .remove_boar(owner_id, boar_id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(format!("Boar {} not found", boar_id)))
    }

    /// Records a breeding event and stamps its date cascade.
    ///
    /// Each sow can be served at most once per calendar day; a duplicate
    /// (sow, date) pair is a conflict.
    #[instrument(skip(self, input), fields(sow_id = %input.sow_id, service_date = %input.service_date))]
    pub fn record_service(
        &self,
        owner_id: Uuid,
        input: NewServiceRecord,
    ) -> Result<ServiceRecord, ServiceError> {
        input.validate()?;
        let sow = self.get_sow(owner_id, input.sow_id)?;
        if self.store.service_record_exists(sow.id, input.service_date) {
            return Err(ServiceError::Conflict(format!(
                "Sow {} already has a service recorded on {}",
                sow.tag, input.service_date
            )));
        }

        let schedule = service_cascade(input.service_date)?;
        let record = ServiceRecord {
            id: Uuid::new_v4(),
            sow_id: sow.id,
            service_date: input.service_date,
            boar_used: input.boar_used,
            schedule,
            created_at: Utc::now(),
        };
        self.store.insert_service_record(record.clone());
        info!(
            service_record_id = %record.id,
            due = %record.schedule.due,
            "recorded service"
        );
        Ok(record)
    }

    pub fn list_services(&self, owner_id: Uuid, sow_id: Uuid) -> Result<Vec<ServiceRecord>, ServiceError> {
        let sow = self.get_sow(owner_id, sow_id)?;
        Ok(self.store.service_records_for_sow(sow.id))
    }

    /// Deletes a service record and, transitively, any litter farrowed from it.
    #[instrument(skip(self))]
    pub fn delete_service_record(
        &self,
        owner_id: Uuid,
        service_record_id: Uuid,
    ) -> Result<(), ServiceError> {
        let record = self
            .store
            .service_record(service_record_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Service record {} not found", service_record_id))
            })?;
        // Ownership flows through the sow.
        self.get_sow(owner_id, record.sow_id)?;
        self.store.remove_service_record(record.id);
        info!(service_record_id = %record.id, "deleted service record");
        Ok(())
    }
}
