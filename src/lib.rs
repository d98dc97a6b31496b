//! UK Vehicle Excise Duty (VED) calculation.
//!
//! The engine resolves a registration date for a [`Vehicle`], routes it to the
//! rule set for its era and produces a [`TaxCalculation`]. A [`Quote`] then adds
//! the commission for the chosen [`TaxPreference`]. Every step is a pure
//! function of the vehicle, a validated [`RateTable`] and the valuation date.

pub mod pricing;
pub mod rates;
pub mod registration;
pub mod tax;
pub mod vehicle;

pub use pricing::{quote, PricingError, Quote, TaxPreference};
pub use rates::{RateTable, RateTableError};
pub use registration::{DateSource, RegistrationDate};
pub use tax::{calculate_vehicle_tax, Era, Reason, TaxCalculation};
pub use vehicle::{Vehicle, VehicleInputError, VehicleRecord};
