//! The litter lifecycle engine: pure, persistence-free computation over
//! already-loaded litter data.
//!
//! Three pieces live here. The date cascade calculator turns one anchor date
//! into the set of scheduled management dates. The population ledger folds a
//! litter's event log into its current alive count and survival statistics.
//! The stage classifier buckets a litter by age. None of them perform I/O;
//! the services layer feeds them data pulled from the store.

pub mod cascade;
pub mod ledger;
pub mod stage;

pub use cascade::{birth_cascade, parse_anchor_date, service_cascade, BirthCascade, ServiceCascade};
pub use ledger::{current_alive, survival_rate, LedgerTotals};
pub use stage::{age_in_days, Stage, StageThresholds};
