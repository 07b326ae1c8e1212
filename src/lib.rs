//! Herdbook Core Library
//!
//! Record-keeping core for pig-breeding operations: breeding stock, service
//! (breeding) records, the litter lifecycle engine (date cascades, population
//! ledger, stage classification), herd-wide aggregation, and farm finances.
//!
//! The crate is deliberately free of any web, database, or rendering surface;
//! the enclosing application supplies those and calls in-process.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod entities;
pub mod errors;
pub mod lifecycle;
pub mod services;
pub mod store;

use std::sync::Arc;

pub use errors::ServiceError;

/// Shared application state: configuration, the herd store, and the services
/// wired over it.
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub store: Arc<store::HerdStore>,
    pub services: services::HerdbookServices,
}

impl AppState {
    pub fn new(config: config::AppConfig) -> Self {
        let store = Arc::new(store::HerdStore::new());
        let services = services::HerdbookServices::new(store.clone(), config.lifecycle.clone());
        Self {
            config,
            store,
            services,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(config::AppConfig::default())
    }
}
