//! HRX domain core.
//!
//! Pure domain logic for the event-staffing marketplace: the financial
//! rollup math, the quotation / invitation / delivery state machines, and
//! the CSV row mapping used by the bulk importer. No I/O, no async -- every
//! module here is unit-testable in isolation.

pub mod csv_import;
pub mod delivery;
pub mod error;
pub mod finance;
pub mod invitation;
pub mod quotation;
pub mod roles;
pub mod tokens;
pub mod types;
