use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::config::LifecycleConfig;
use crate::entities::{EventDetail, ServiceRecord, Sow};
use crate::errors::ServiceError;
use crate::lifecycle::ledger;
use crate::lifecycle::stage::{age_in_days, Stage, StageThresholds};
use crate::store::{HerdStore, LitterAggregate};

/// Farm-wide head counts, bucketed by growth stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HerdCounts {
    pub preweaning: u32,
    pub weaner: u32,
    pub grower: u32,
    pub finisher: u32,
    pub total_piglets: u32,
    pub sows: u32,
    pub boars: u32,
    pub total_herd: u32,
}

/// One active litter as shown on the dashboard.
#[derive(Clone, Debug, Serialize)]
pub struct LitterSummary {
    pub litter_id: Uuid,
    pub sow_tag: String,
    pub sow_breed: String,
    pub farrow_date: NaiveDate,
    pub age_days: i64,
    pub stage: Stage,
    pub born_alive: u32,
    pub fostered_in: u32,
    pub fostered_out: u32,
    pub mortalities: u32,
    pub sold: u32,
    pub current_alive: u32,
    pub survival_rate: f64,
    /// Most recent weighing, falling back to the average birth weight
    pub latest_average_weight_kg: f64,
}

/// A served sow whose farrowing is expected within the lookahead window.
#[derive(Clone, Debug, Serialize)]
pub struct UpcomingFarrowing {
    pub sow_tag: String,
    pub boar_used: String,
    pub service_date: NaiveDate,
    pub checkup: NaiveDate,
    pub litter_guard_1: NaiveDate,
    pub litter_guard_2: NaiveDate,
    pub due: NaiveDate,
    pub days_until_due: i64,
}

#[derive(Clone, Debug, Serialize)]
pub struct MortalitySummary {
    pub by_cause: HashMap<String, u32>,
    pub total: u32,
    pub period_days: i64,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SalesByType {
    pub count: u32,
    pub revenue: Decimal,
}

#[derive(Clone, Debug, Serialize)]
pub struct SalesSummary {
    pub total_sold: u32,
    pub total_revenue: Decimal,
    pub total_weight_kg: f64,
    pub by_type: HashMap<String, SalesByType>,
    pub period_days: i64,
}

/// Read-side aggregation across one owner's herd.
///
/// Every query is an O(litters) scan composed from the pure lifecycle
/// functions. Farm-scale litter counts are tens to low hundreds, so there is
/// no incremental cache to maintain.
#[derive(Clone)]
pub struct HerdService {
    store: Arc<HerdStore>,
    lifecycle: LifecycleConfig,
}

impl HerdService {
    pub fn new(store: Arc<HerdStore>, lifecycle: LifecycleConfig) -> Self {
        Self { store, lifecycle }
    }

    /// Current pig counts grouped by growth stage, plus adult breeding stock.
    /// Litters with nobody left alive do not contribute to any bucket.
    #[instrument(skip(self))]
    pub fn herd_counts(&self, owner_id: Uuid, today: NaiveDate) -> HerdCounts {
        let thresholds = self.lifecycle.thresholds();
        let mut counts = HerdCounts {
            sows: self.store.sows_for_owner(owner_id).len() as u32,
            boars: self.store.boars_for_owner(owner_id).len() as u32,
            ..HerdCounts::default()
        };

        self.for_each_litter(owner_id, |_, _, aggregate| {
            let alive = ledger::current_alive(&aggregate.litter, &aggregate.events);
            if alive == 0 {
                return;
            }
            let age = age_in_days(aggregate.litter.farrow_date, today);
            match thresholds.classify(age) {
                Stage::Preweaning => counts.preweaning += alive,
                Stage::Weaner => counts.weaner += alive,
                Stage::Grower => counts.grower += alive,
                Stage::Finisher => counts.finisher += alive,
                Stage::Unknown => return,
            }
            counts.total_piglets += alive;
        });

        counts.total_herd = counts.sows + counts.boars + counts.total_piglets;
        counts
    }

    /// Litters with piglets still alive, newest farrowings first.
    #[instrument(skip(self))]
    pub fn active_litters(&self, owner_id: Uuid, today: NaiveDate) -> Vec<LitterSummary> {
        let thresholds = self.lifecycle.thresholds();
        let mut summaries = Vec::new();

        self.for_each_litter(owner_id, |sow, _, aggregate| {
            let alive = ledger::current_alive(&aggregate.litter, &aggregate.events);
            if alive == 0 {
                return;
            }
            summaries.push(summarize(sow, aggregate, alive, today, &thresholds));
        });

        summaries.sort_by(|a, b| b.farrow_date.cmp(&a.farrow_date));
        summaries
    }

    /// Served sows without a litter yet, due within the configured window,
    /// soonest first.
    #[instrument(skip(self))]
    pub fn upcoming_farrowings(
        &self,
        owner_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<UpcomingFarrowing>, ServiceError> {
        let horizon = today
            .checked_add_signed(Duration::days(self.lifecycle.farrowing_window_days))
            .ok_or_else(|| {
                ServiceError::InvalidDate("farrowing window overflows the calendar".to_string())
            })?;

        let mut upcoming = Vec::new();
        for sow in self.store.sows_for_owner(owner_id) {
            for record in self.store.service_records_for_sow(sow.id) {
                if self.store.litter_for_service(record.id).is_some() {
                    continue;
                }
                let due = record.schedule.due;
                if due < today || due > horizon {
                    continue;
                }
                upcoming.push(UpcomingFarrowing {
                    sow_tag: sow.tag.clone(),
                    boar_used: record.boar_used.clone(),
                    service_date: record.service_date,
                    checkup: record.schedule.checkup,
                    litter_guard_1: record.schedule.litter_guard_1,
                    litter_guard_2: record.schedule.litter_guard_2,
                    due,
                    days_until_due: (due - today).num_days(),
                });
            }
        }
        upcoming.sort_by_key(|u| u.days_until_due);
        Ok(upcoming)
    }

    /// Deaths by cause over the trailing `period_days`.
    #[instrument(skip(self))]
    pub fn mortality_summary(
        &self,
        owner_id: Uuid,
        today: NaiveDate,
        period_days: i64,
    ) -> MortalitySummary {
        let cutoff = today - Duration::days(period_days);
        let mut by_cause: HashMap<String, u32> = HashMap::new();
        let mut total = 0;

        self.for_each_litter(owner_id, |_, _, aggregate| {
            for event in &aggregate.events {
                if event.date < cutoff {
                    continue;
                }
                if let EventDetail::Mortality { cause, .. } = &event.detail {
                    *by_cause.entry(cause.clone()).or_default() += event.count;
                    total += event.count;
                }
            }
        });

        MortalitySummary {
            by_cause,
            total,
            period_days,
        }
    }

    /// Sales volume and revenue over the trailing `period_days`, broken down
    /// by sale type ("market" when unspecified).
    #[instrument(skip(self))]
    pub fn sales_summary(
        &self,
        owner_id: Uuid,
        today: NaiveDate,
        period_days: i64,
    ) -> SalesSummary {
        let cutoff = today - Duration::days(period_days);
        let mut summary = SalesSummary {
            total_sold: 0,
            total_revenue: Decimal::ZERO,
            total_weight_kg: 0.0,
            by_type: HashMap::new(),
            period_days,
        };

        self.for_each_litter(owner_id, |_, _, aggregate| {
            for event in &aggregate.events {
                if event.date < cutoff {
                    continue;
                }
                if let EventDetail::Sale {
                    sale_type,
                    total_weight_kg,
                    total_amount,
                    ..
                } = &event.detail
                {
                    let revenue = total_amount.unwrap_or(Decimal::ZERO);
                    summary.total_sold += event.count;
                    summary.total_revenue += revenue;
                    summary.total_weight_kg += total_weight_kg.unwrap_or(0.0);

                    let key = sale_type.clone().unwrap_or_else(|| "market".to_string());
                    let bucket = summary.by_type.entry(key).or_default();
                    bucket.count += event.count;
                    bucket.revenue += revenue;
                }
            }
        });

        summary
    }

    /// Walks every litter belonging to the owner's sows, one service record
    /// at a time.
    fn for_each_litter(
        &self,
        owner_id: Uuid,
        mut f: impl FnMut(&Sow, &ServiceRecord, &LitterAggregate),
    ) {
        for sow in self.store.sows_for_owner(owner_id) {
            for record in self.store.service_records_for_sow(sow.id) {
                if let Some(aggregate) = self.store.litter_aggregate_for_service(record.id) {
                    f(&sow, &record, &aggregate);
                }
            }
        }
    }
}

fn summarize(
    sow: &Sow,
    aggregate: &LitterAggregate,
    alive: u32,
    today: NaiveDate,
    thresholds: &StageThresholds,
) -> LitterSummary {
    let totals = ledger::totals(&aggregate.events);
    let age = age_in_days(aggregate.litter.farrow_date, today);
    let latest_average_weight_kg = aggregate
        .weights
        .iter()
        .max_by_key(|w| w.date)
        .map(|w| w.average_weight_kg)
        .unwrap_or(aggregate.litter.average_birth_weight);

    LitterSummary {
        litter_id: aggregate.litter.id,
        sow_tag: sow.tag.clone(),
        sow_breed: sow.breed.clone(),
        farrow_date: aggregate.litter.farrow_date,
        age_days: age,
        stage: thresholds.classify(age),
        born_alive: aggregate.litter.born_alive,
        fostered_in: totals.fostered_in,
        fostered_out: totals.fostered_out,
        mortalities: totals.mortalities,
        sold: totals.sold,
        current_alive: alive,
        survival_rate: ledger::survival_rate(&aggregate.litter, &aggregate.events),
        latest_average_weight_kg,
    }
}
