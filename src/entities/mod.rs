//! Plain domain records and their creation inputs.
//!
//! Stored records carry generated ids and timestamps; `New*` inputs carry the
//! caller-supplied fields plus `validator` rules. Cross-field invariants that
//! `validator` cannot express (count balances, weights length) are enforced by
//! the owning service before anything is persisted.

pub mod boar;
pub mod expense;
pub mod invoice;
pub mod litter;
pub mod population;
pub mod service_record;
pub mod sow;
pub mod vaccination;
pub mod weight;

pub use boar::{Boar, NewBoar};
pub use expense::{Expense, ExpenseCategory, NewExpense};
pub use invoice::{Invoice, InvoiceLine, NewInvoice};
pub use litter::{Litter, NewLitter};
pub use population::{EventDetail, EventKind, PopulationEvent};
pub use service_record::{NewServiceRecord, ServiceRecord};
pub use sow::{NewSow, Sow};
pub use vaccination::{NewVaccination, VaccinationRecord};
pub use weight::{NewWeightRecord, WeighMethod, WeightRecord};
