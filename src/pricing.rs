//! Commission-inclusive pricing for a duty calculation.
//!
//! 6 and 12 month preferences add a £50 commission to the matching tax
//! rate, falling back to the commission alone when that rate is unknown.
//! Direct debit setup is a flat £60 with no tax collected.

use crate::tax::TaxCalculation;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("invalid tax preference '{0}': expected 1 (6 months), 2 (12 months) or 3 (direct debit)")]
    InvalidPreference(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxPreference {
    SixMonths,
    TwelveMonths,
    /// Direct debit setup only, commission without tax
    DirectDebit,
}

impl TaxPreference {
    pub fn code(&self) -> u8 {
        match self {
            TaxPreference::SixMonths => 1,
            TaxPreference::TwelveMonths => 2,
            TaxPreference::DirectDebit => 3,
        }
    }

    pub fn commission_fee(&self) -> Decimal {
        match self {
            TaxPreference::SixMonths | TaxPreference::TwelveMonths => dec!(50.00),
            TaxPreference::DirectDebit => dec!(60.00),
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            TaxPreference::SixMonths => "6 months",
            TaxPreference::TwelveMonths => "12 months",
            TaxPreference::DirectDebit => "Direct debit",
        }
    }
}

impl std::fmt::Display for TaxPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl TryFrom<u8> for TaxPreference {
    type Error = PricingError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(TaxPreference::SixMonths),
            2 => Ok(TaxPreference::TwelveMonths),
            3 => Ok(TaxPreference::DirectDebit),
            _ => Err(PricingError::InvalidPreference(code.to_string())),
        }
    }
}

impl FromStr for TaxPreference {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "6-months" => Ok(TaxPreference::SixMonths),
            "2" | "12-months" => Ok(TaxPreference::TwelveMonths),
            "3" | "direct-debit" => Ok(TaxPreference::DirectDebit),
            _ => Err(PricingError::InvalidPreference(s.to_string())),
        }
    }
}

/// Payable amount for a vehicle under one preference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub preference: TaxPreference,
    pub six_month_rate: Option<Decimal>,
    pub twelve_month_rate: Option<Decimal>,
    /// The tax rate included in the total, if any
    pub tax_rate: Option<Decimal>,
    pub commission_fee: Decimal,
    pub total: Decimal,
    /// No tax rate was available so only commission is charged
    pub commission_only: bool,
    pub notes: Vec<String>,
}

/// Tax rate plus commission, or the commission alone without a rate
pub fn with_commission(tax_rate: Option<Decimal>, commission_fee: Decimal) -> Decimal {
    match tax_rate {
        Some(rate) => rate + commission_fee,
        None => commission_fee,
    }
}

pub fn quote(calculation: &TaxCalculation, preference: TaxPreference) -> Quote {
    let commission_fee = preference.commission_fee();
    let tax_rate = match preference {
        TaxPreference::SixMonths => calculation.six_month_rate,
        TaxPreference::TwelveMonths => calculation.twelve_month_rate,
        TaxPreference::DirectDebit => None,
    };
    let total = with_commission(tax_rate, commission_fee);

    let mut notes = Vec::new();
    let commission_only = tax_rate.is_none() && preference != TaxPreference::DirectDebit;
    if commission_only {
        notes.push(format!(
            "No {} tax rate available; charging commission only",
            preference
        ));
    } else if preference == TaxPreference::DirectDebit {
        notes.push("Direct debit setup; commission only".to_string());
    }

    Quote {
        preference,
        six_month_rate: calculation.six_month_rate,
        twelve_month_rate: calculation.twelve_month_rate,
        tax_rate,
        commission_fee,
        total,
        commission_only,
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::RatePair;
    use crate::tax::Reason;

    fn calculation(six: Option<Decimal>, twelve: Option<Decimal>) -> TaxCalculation {
        TaxCalculation {
            six_month_rate: six,
            twelve_month_rate: twelve,
            ..TaxCalculation::from_rates(
                &RatePair {
                    twelve_month: Decimal::ZERO,
                    six_month: Decimal::ZERO,
                },
                Reason::StandardRate,
                "Standard rate",
            )
        }
    }

    #[test]
    fn six_month_rate_plus_commission() {
        let q = quote(&calculation(Some(dec!(85.50)), Some(dec!(155.00))), TaxPreference::SixMonths);
        assert_eq!(q.commission_fee, dec!(50));
        assert_eq!(q.tax_rate, Some(dec!(85.50)));
        assert_eq!(q.total, dec!(135.50));
        assert_eq!(format!("{:.2}", q.total), "135.50");
        assert!(!q.commission_only);
        assert!(q.notes.is_empty());
    }

    #[test]
    fn twelve_month_rate_plus_commission() {
        let q = quote(&calculation(Some(dec!(85.50)), Some(dec!(155.00))), TaxPreference::TwelveMonths);
        assert_eq!(q.total, dec!(205.00));
        assert_eq!(q.tax_rate, Some(dec!(155.00)));
    }

    #[test]
    fn missing_rate_falls_back_to_commission_only() {
        let q = quote(&calculation(None, Some(dec!(130.00))), TaxPreference::SixMonths);
        assert_eq!(q.total, dec!(50.00));
        assert_eq!(format!("{:.2}", q.total), "50.00");
        assert!(q.commission_only);
        assert_eq!(q.notes.len(), 1);
    }

    #[test]
    fn direct_debit_is_always_sixty() {
        for (six, twelve) in [
            (None, None),
            (Some(dec!(85.50)), Some(dec!(155.00))),
            (Some(dec!(325.50)), Some(dec!(620.00))),
        ] {
            let q = quote(&calculation(six, twelve), TaxPreference::DirectDebit);
            assert_eq!(q.total, dec!(60.00));
            assert_eq!(q.commission_fee, dec!(60.00));
            assert_eq!(q.tax_rate, None);
            assert!(!q.commission_only);
        }
    }

    #[test]
    fn sums_keep_exact_pence() {
        let total = (0..10).fold(Decimal::ZERO, |acc, _| acc + dec!(0.10));
        assert_eq!(with_commission(Some(total), dec!(50)), dec!(51.00));
        assert_eq!(with_commission(Some(dec!(102.38)), dec!(50)), dec!(152.38));
    }

    #[test]
    fn preference_from_code() {
        assert_eq!(TaxPreference::try_from(1u8), Ok(TaxPreference::SixMonths));
        assert_eq!(TaxPreference::try_from(2u8), Ok(TaxPreference::TwelveMonths));
        assert_eq!(TaxPreference::try_from(3u8), Ok(TaxPreference::DirectDebit));
        assert_eq!(
            TaxPreference::try_from(4u8),
            Err(PricingError::InvalidPreference("4".to_string()))
        );
        assert!(TaxPreference::try_from(0u8).is_err());
    }

    #[test]
    fn preference_from_str() {
        assert_eq!("1".parse::<TaxPreference>(), Ok(TaxPreference::SixMonths));
        assert_eq!("12-months".parse::<TaxPreference>(), Ok(TaxPreference::TwelveMonths));
        assert_eq!(" Direct-Debit ".parse::<TaxPreference>(), Ok(TaxPreference::DirectDebit));
        assert!("monthly".parse::<TaxPreference>().is_err());
    }

    #[test]
    fn codes_round_trip() {
        for preference in [
            TaxPreference::SixMonths,
            TaxPreference::TwelveMonths,
            TaxPreference::DirectDebit,
        ] {
            assert_eq!(TaxPreference::try_from(preference.code()), Ok(preference));
        }
    }
}
