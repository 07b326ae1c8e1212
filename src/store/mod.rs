//! In-memory herd store with repository-style typed accessors.
//!
//! The web application that fronts this crate owns the real transactional
//! database; this store stands in for it behind the same accessor shapes so
//! the lifecycle engine never touches lazy-loading or query semantics.
//!
//! Everything hanging off one litter (its static fields plus its event log
//! and sub-records) lives under a single map entry, so a capacity check and
//! the event append it guards happen under one entry lock. That is the
//! serialization contract concurrent writers rely on: two simultaneous sale
//! entries against the same litter cannot both observe the same alive count.

use dashmap::DashMap;
use uuid::Uuid;

use crate::entities::{
    Boar, Expense, Invoice, Litter, PopulationEvent, ServiceRecord, Sow, VaccinationRecord,
    WeightRecord,
};
use crate::errors::ServiceError;

/// A litter and every record that belongs to it.
#[derive(Clone, Debug)]
pub struct LitterAggregate {
    pub litter: Litter,
    pub events: Vec<PopulationEvent>,
    pub vaccinations: Vec<VaccinationRecord>,
    pub weights: Vec<WeightRecord>,
}

impl LitterAggregate {
    pub fn new(litter: Litter) -> Self {
        Self {
            litter,
            events: Vec::new(),
            vaccinations: Vec::new(),
            weights: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct HerdStore {
    sows: DashMap<Uuid, Sow>,
    boars: DashMap<Uuid, Boar>,
    service_records: DashMap<Uuid, ServiceRecord>,
    litters: DashMap<Uuid, LitterAggregate>,
    invoices: DashMap<Uuid, Invoice>,
    expenses: DashMap<Uuid, Expense>,
}

impl HerdStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- sows ----

    pub fn insert_sow(&self, sow: Sow) {
        self.sows.insert(sow.id, sow);
    }

    pub fn sow(&self, id: Uuid) -> Option<Sow> {
        self.sows.get(&id).map(|r| r.value().clone())
    }

    pub fn sow_by_tag(&self, owner_id: Uuid, tag: &str) -> Option<Sow> {
        self.sows
            .iter()
            .find(|r| r.value().owner_id == owner_id && r.value().tag == tag)
            .map(|r| r.value().clone())
    }

    pub fn sows_for_owner(&self, owner_id: Uuid) -> Vec<Sow> {
        let mut sows: Vec<Sow> = self
            .sows
            .iter()
            .filter(|r| r.value().owner_id == owner_id)
            .map(|r| r.value().clone())
            .collect();
        sows.sort_by(|a, b| a.tag.cmp(&b.tag));
        sows
    }

    /// Removes a sow and everything that hangs off it: service records,
    /// litters, and litter sub-records.
    pub fn remove_sow(&self, id: Uuid) -> Option<Sow> {
        let removed = self.sows.remove(&id).map(|(_, sow)| sow);
        if removed.is_some() {
            let record_ids: Vec<Uuid> = self
                .service_records
                .iter()
                .filter(|r| r.value().sow_id == id)
                .map(|r| r.value().id)
                .collect();
            for record_id in record_ids {
                self.remove_service_record(record_id);
            }
        }
        removed
    }

    // ---- boars ----

    pub fn insert_boar(&self, boar: Boar) {
        self.boars.insert(boar.id, boar);
    }

    pub fn boar_by_tag(&self, owner_id: Uuid, tag: &str) -> Option<Boar> {
        self.boars
            .iter()
            .find(|r| r.value().owner_id == owner_id && r.value().tag == tag)
            .map(|r| r.value().clone())
    }

    pub fn boars_for_owner(&self, owner_id: Uuid) -> Vec<Boar> {
        let mut boars: Vec<Boar> = self
            .boars
            .iter()
            .filter(|r| r.value().owner_id == owner_id)
            .map(|r| r.value().clone())
            .collect();
        boars.sort_by(|a, b| a.tag.cmp(&b.tag));
        boars
    }

    pub fn remove_boar(&self, owner_id: Uuid, id: Uuid) -> Option<Boar> {
        if self.boars.get(&id).map(|r| r.value().owner_id) == Some(owner_id) {
            self.boars.remove(&id).map(|(_, boar)| boar)
        } else {
            None
        }
    }

    // ---- service records ----

    pub fn insert_service_record(&self, record: ServiceRecord) {
        self.service_records.insert(record.id, record);
    }

    pub fn service_record(&self, id: Uuid) -> Option<ServiceRecord> {
        self.service_records.get(&id).map(|r| r.value().clone())
    }

    pub fn service_record_exists(&self, sow_id: Uuid, service_date: chrono::NaiveDate) -> bool {
        self.service_records
            .iter()
            .any(|r| r.value().sow_id == sow_id && r.value().service_date == service_date)
    }

    pub fn service_records_for_sow(&self, sow_id: Uuid) -> Vec<ServiceRecord> {
        let mut records: Vec<ServiceRecord> = self
            .service_records
            .iter()
            .filter(|r| r.value().sow_id == sow_id)
            .map(|r| r.value().clone())
            .collect();
        records.sort_by_key(|r| r.service_date);
        records
    }

    /// Removes a service record and its litter, if one was farrowed.
    pub fn remove_service_record(&self, id: Uuid) -> Option<ServiceRecord> {
        let removed = self.service_records.remove(&id).map(|(_, record)| record);
        if removed.is_some() {
            let litter_ids: Vec<Uuid> = self
                .litters
                .iter()
                .filter(|r| r.value().litter.service_record_id == id)
                .map(|r| r.value().litter.id)
                .collect();
            for litter_id in litter_ids {
                self.litters.remove(&litter_id);
            }
        }
        removed
    }

    // ---- litters ----

    pub fn insert_litter(&self, litter: Litter) {
        self.litters.insert(litter.id, LitterAggregate::new(litter));
    }

    pub fn litter_aggregate(&self, id: Uuid) -> Option<LitterAggregate> {
        self.litters.get(&id).map(|r| r.value().clone())
    }

    pub fn litter_for_service(&self, service_record_id: Uuid) -> Option<Litter> {
        self.litters
            .iter()
            .find(|r| r.value().litter.service_record_id == service_record_id)
            .map(|r| r.value().litter.clone())
    }

    pub fn litter_aggregate_for_service(&self, service_record_id: Uuid) -> Option<LitterAggregate> {
        self.litters
            .iter()
            .find(|r| r.value().litter.service_record_id == service_record_id)
            .map(|r| r.value().clone())
    }

    pub fn litter_exists(&self, id: Uuid) -> bool {
        self.litters.contains_key(&id)
    }

    /// Runs `f` with exclusive access to one litter aggregate. Validation and
    /// mutation inside `f` are atomic with respect to other writers of the
    /// same litter.
    pub fn with_litter_mut<T>(
        &self,
        litter_id: Uuid,
        f: impl FnOnce(&mut LitterAggregate) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let mut entry = self
            .litters
            .get_mut(&litter_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Litter {} not found", litter_id)))?;
        f(entry.value_mut())
    }

    pub fn remove_litter(&self, id: Uuid) -> Option<LitterAggregate> {
        self.litters.remove(&id).map(|(_, aggregate)| aggregate)
    }

    // ---- invoices ----

    pub fn insert_invoice(&self, invoice: Invoice) {
        self.invoices.insert(invoice.id, invoice);
    }

    pub fn invoice_number_exists(&self, owner_id: Uuid, invoice_number: &str) -> bool {
        self.invoices
            .iter()
            .any(|r| r.value().owner_id == owner_id && r.value().invoice_number == invoice_number)
    }

    pub fn invoices_for_owner(&self, owner_id: Uuid) -> Vec<Invoice> {
        let mut invoices: Vec<Invoice> = self
            .invoices
            .iter()
            .filter(|r| r.value().owner_id == owner_id)
            .map(|r| r.value().clone())
            .collect();
        invoices.sort_by(|a, b| b.date.cmp(&a.date));
        invoices
    }

    pub fn remove_invoice(&self, owner_id: Uuid, id: Uuid) -> Option<Invoice> {
        if self.invoices.get(&id).map(|r| r.value().owner_id) == Some(owner_id) {
            self.invoices.remove(&id).map(|(_, invoice)| invoice)
        } else {
            None
        }
    }

    // ---- expenses ----

    pub fn insert_expense(&self, expense: Expense) {
        self.expenses.insert(expense.id, expense);
    }

    pub fn receipt_number_exists(&self, owner_id: Uuid, receipt_number: &str) -> bool {
        self.expenses
            .iter()
            .any(|r| r.value().owner_id == owner_id && r.value().receipt_number == receipt_number)
    }

    pub fn expenses_for_owner(&self, owner_id: Uuid) -> Vec<Expense> {
        let mut expenses: Vec<Expense> = self
            .expenses
            .iter()
            .filter(|r| r.value().owner_id == owner_id)
            .map(|r| r.value().clone())
            .collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        expenses
    }

    pub fn remove_expense(&self, owner_id: Uuid, id: Uuid) -> Option<Expense> {
        if self.expenses.get(&id).map(|r| r.value().owner_id) == Some(owner_id) {
            self.expenses.remove(&id).map(|(_, expense)| expense)
        } else {
            None
        }
    }
}
