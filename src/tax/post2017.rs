//! Cars and light goods vehicles registered on or after 1 April 2017.
//!
//! N1 light goods vehicles have their own flat rates. Cars pay a CO2 based
//! rate for their first twelve months, then a flat standard rate, raised
//! for five years when the list price reaches the luxury threshold.

use crate::rates::{LuxurySurcharge, RateTable};
use crate::tax::calculation::{Reason, TaxCalculation};
use crate::vehicle::Vehicle;
use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const DAYS_PER_YEAR: Decimal = dec!(365.25);

pub fn calculate(
    vehicle: &Vehicle,
    registered: NaiveDate,
    rates: &RateTable,
    today: NaiveDate,
) -> TaxCalculation {
    if vehicle.is_light_goods() {
        return light_goods(vehicle, rates);
    }

    if in_first_year(registered, today) {
        first_year(vehicle, rates)
    } else {
        standard(vehicle, registered, rates, today)
    }
}

/// True until the first anniversary of registration
pub fn in_first_year(registered: NaiveDate, today: NaiveDate) -> bool {
    registered
        .checked_add_months(Months::new(12))
        .is_some_and(|anniversary| today < anniversary)
}

fn light_goods(vehicle: &Vehicle, rates: &RateTable) -> TaxCalculation {
    let goods = rates.light_goods();
    if vehicle.is_euro6() {
        log::debug!("{}: N1 light goods, Euro 6", vehicle.registration_number);
        TaxCalculation::from_rates(
            &goods.euro6,
            Reason::LightGoodsEuro6,
            "N1 light goods vehicle (EURO 6+) - tc39 rate",
        )
        .with_band("TC39")
    } else {
        log::debug!(
            "{}: N1 light goods, Euro 5 or below",
            vehicle.registration_number
        );
        TaxCalculation::from_rates(
            &goods.euro5_or_below,
            Reason::LightGoodsEuro5,
            "N1 light goods vehicle (EURO 5 or below) - tc36 rate",
        )
        .with_band("TC36")
    }
}

/// First year: twelve months only, no six month option
fn first_year(vehicle: &Vehicle, rates: &RateTable) -> TaxCalculation {
    let co2 = vehicle.co2_emissions.unwrap_or(0);

    let Some(bracket) = rates
        .first_year_brackets()
        .iter()
        .find(|bracket| bracket.range.contains(co2))
    else {
        return TaxCalculation::undetermined(
            Reason::NoFirstYearBracket,
            format!("Unable to determine first year rate for {}g/km", co2),
        )
        .in_first_year();
    };

    // zero emission vehicles always take the standard rate
    let diesel = vehicle.is_diesel() && !vehicle.is_zero_emission();
    let (rate, reason, note) = if diesel {
        (
            bracket.rates.all_other_diesel,
            Reason::FirstYearDiesel,
            "First year rate based on CO2 emissions (diesel)",
        )
    } else {
        (
            bracket.rates.standard,
            Reason::FirstYear,
            "First year rate based on CO2 emissions",
        )
    };
    log::debug!(
        "{}: first year, {}g/km in bracket {}, rate {}",
        vehicle.registration_number,
        co2,
        bracket.range.label(),
        rate
    );

    let result = TaxCalculation::twelve_month_only(rate, reason, note)
        .with_band(bracket.range.label())
        .in_first_year();
    if vehicle.co2_emissions.is_none() {
        result.assumed(Reason::MissingCo2, "CO2 not supplied, assumed 0 g/km")
    } else {
        result
    }
}

fn standard(
    vehicle: &Vehicle,
    registered: NaiveDate,
    rates: &RateTable,
    today: NaiveDate,
) -> TaxCalculation {
    if luxury_surcharge_applies(vehicle, registered, today, rates.luxury_surcharge()) {
        log::debug!("{}: luxury surcharge applies", vehicle.registration_number);
        TaxCalculation::from_rates(
            rates.luxury_rates(),
            Reason::LuxurySurcharge,
            "Includes luxury vehicle surcharge",
        )
    } else {
        TaxCalculation::from_rates(rates.standard_rates(), Reason::StandardRate, "Standard rate")
    }
}

/// Whether the expensive car supplement is due.
///
/// Zero emission cars registered before the exemption cut-off never pay it.
/// Otherwise it applies while the list price is at or above the threshold and
/// no more than the configured number of years (365.25 days each) have passed
/// since registration.
pub fn luxury_surcharge_applies(
    vehicle: &Vehicle,
    registered: NaiveDate,
    today: NaiveDate,
    surcharge: &LuxurySurcharge,
) -> bool {
    if vehicle.is_zero_emission() && registered < surcharge.zero_emission_exempt_before {
        return false;
    }

    if vehicle.list_price() < surcharge.threshold_list_price {
        return false;
    }

    let elapsed_days = Decimal::from((today - registered).num_days());
    elapsed_days / DAYS_PER_YEAR <= Decimal::from(surcharge.applies_for_years)
}
