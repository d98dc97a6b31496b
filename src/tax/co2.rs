//! Cars registered between 1 March 2001 and 31 March 2017

use crate::rates::Co2Band;
use crate::tax::calculation::{Reason, TaxCalculation};

pub fn calculate(co2: Option<u32>, bands: &[Co2Band]) -> TaxCalculation {
    match co2 {
        Some(co2) => band_for(co2, bands),
        None => {
            band_for(0, bands).assumed(Reason::MissingCo2, "CO2 not supplied, assumed 0 g/km")
        }
    }
}

fn band_for(co2: u32, bands: &[Co2Band]) -> TaxCalculation {
    match bands.iter().find(|band| band.range.contains(co2)) {
        Some(band) => {
            log::debug!("CO2 {}g/km matched band {}", co2, band.band);
            TaxCalculation::from_rates(
                &band.rates,
                Reason::Co2Band,
                format!("Tax band {}", band.band),
            )
            .with_band(band.band.clone())
        }
        None => TaxCalculation::undetermined(
            Reason::NoCo2Band,
            format!("Unable to determine tax band for {}g/km", co2),
        ),
    }
}
