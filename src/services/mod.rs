pub mod breeding;
pub mod finance;
pub mod herd;
pub mod litters;

use std::sync::Arc;

use crate::config::LifecycleConfig;
use crate::store::HerdStore;

pub use breeding::BreedingService;
pub use finance::FinanceService;
pub use herd::HerdService;
pub use litters::LitterService;

/// All services wired over one shared store.
#[derive(Clone)]
pub struct HerdbookServices {
    pub breeding: BreedingService,
    pub litters: LitterService,
    pub herd: HerdService,
    pub finance: FinanceService,
}

impl HerdbookServices {
    pub fn new(store: Arc<HerdStore>, lifecycle: LifecycleConfig) -> Self {
        Self {
            breeding: BreedingService::new(store.clone()),
            litters: LitterService::new(store.clone(), lifecycle.clone()),
            herd: HerdService::new(store.clone(), lifecycle),
            finance: FinanceService::new(store),
        }
    }
}
