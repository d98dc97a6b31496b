//! Cars and light goods vehicles registered before 1 March 2001

use crate::rates::EngineBracket;
use crate::tax::calculation::{Reason, TaxCalculation};

pub fn calculate(engine_cc: Option<u32>, brackets: &[EngineBracket]) -> TaxCalculation {
    match engine_cc {
        Some(engine_cc) => bracket_for(engine_cc, brackets),
        None => bracket_for(0, brackets).assumed(
            Reason::MissingEngineCapacity,
            "Engine capacity not supplied, assumed 0cc",
        ),
    }
}

fn bracket_for(engine_cc: u32, brackets: &[EngineBracket]) -> TaxCalculation {
    match brackets.iter().find(|bracket| bracket.matches(engine_cc)) {
        Some(bracket) => {
            log::debug!("Engine {}cc matched bracket {}", engine_cc, bracket.label());
            TaxCalculation::from_rates(
                &bracket.rates,
                Reason::EngineCapacityBracket,
                format!("Based on engine capacity: {}cc", engine_cc),
            )
            .with_band(bracket.label())
        }
        None => TaxCalculation::undetermined(
            Reason::NoEngineCapacityBracket,
            format!(
                "Unable to determine tax based on engine capacity: {}cc",
                engine_cc
            ),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::{EngineBound, RatePair, RateTable};
    use rust_decimal_macros::dec;

    #[test]
    fn small_engine() {
        let rates = RateTable::embedded().unwrap();
        let result = calculate(Some(1549), rates.engine_brackets());
        assert_eq!(result.twelve_month_rate, Some(dec!(220.00)));
        assert_eq!(result.six_month_rate, Some(dec!(121.00)));
        assert_eq!(result.reason, Reason::EngineCapacityBracket);
        assert_eq!(result.band.as_deref(), Some("up to 1549cc"));
        assert!(!result.first_year);
    }

    #[test]
    fn large_engine() {
        let rates = RateTable::embedded().unwrap();
        let result = calculate(Some(1550), rates.engine_brackets());
        assert_eq!(result.twelve_month_rate, Some(dec!(360.00)));
        assert_eq!(result.six_month_rate, Some(dec!(198.00)));
        assert_eq!(result.notes, vec!["Based on engine capacity: 1550cc"]);
    }

    #[test]
    fn missing_engine_capacity_priced_as_zero() {
        let rates = RateTable::embedded().unwrap();
        let result = calculate(None, rates.engine_brackets());
        assert_eq!(result.reason, Reason::MissingEngineCapacity);
        assert_eq!(result.twelve_month_rate, Some(dec!(220.00)));
        assert_eq!(result.six_month_rate, Some(dec!(121.00)));
        assert_eq!(result.band.as_deref(), Some("up to 1549cc"));
        assert_eq!(result.notes[0], "Engine capacity not supplied, assumed 0cc");
    }

    #[test]
    fn first_matching_bracket_wins() {
        let pair = |rate| RatePair {
            twelve_month: rate,
            six_month: rate,
        };
        let brackets = [
            EngineBracket {
                bound: EngineBound::AtMost(1000),
                rates: pair(dec!(1)),
            },
            EngineBracket {
                bound: EngineBound::AtMost(2000),
                rates: pair(dec!(2)),
            },
        ];
        assert_eq!(
            calculate(Some(900), &brackets).twelve_month_rate,
            Some(dec!(1))
        );
        assert_eq!(
            calculate(Some(1500), &brackets).twelve_month_rate,
            Some(dec!(2))
        );

        let result = calculate(Some(2500), &brackets);
        assert!(!result.is_determined());
        assert_eq!(result.reason, Reason::NoEngineCapacityBracket);
    }
}
