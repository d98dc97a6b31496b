pub mod calculation;
pub mod co2;
pub mod engine_size;
pub mod era;
pub mod post2017;

pub use calculation::{Reason, TaxCalculation};
pub use era::{Assessment, Era};

use crate::rates::RateTable;
use crate::registration;
use crate::vehicle::Vehicle;
use chrono::NaiveDate;

/// Calculate the duty payable for a vehicle as at `today`.
///
/// Never fails: when the registration date or the banding input cannot be
/// determined, the result has no rates and its `reason` says why.
pub fn calculate_vehicle_tax(vehicle: &Vehicle, rates: &RateTable, today: NaiveDate) -> TaxCalculation {
    let Some(registration) = registration::resolve(vehicle) else {
        log::debug!(
            "{}: registration date unresolvable",
            vehicle.registration_number
        );
        return TaxCalculation::undetermined(
            Reason::UnresolvedRegistrationDate,
            "Unable to determine registration date",
        );
    };

    let assessment = Assessment::new(vehicle, registration.date);
    let era = assessment.era();
    log::debug!(
        "{}: registered {} ({}), {} rules",
        vehicle.registration_number,
        registration.date,
        registration.source,
        era
    );
    assessment
        .assess(rates, today)
        .registered(registration, era)
}
