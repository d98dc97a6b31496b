use crate::rates::RatePair;
use crate::registration::{DateSource, RegistrationDate};
use crate::tax::era::Era;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Which rule produced a calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    UnresolvedRegistrationDate,
    EngineCapacityBracket,
    NoEngineCapacityBracket,
    MissingEngineCapacity,
    Co2Band,
    NoCo2Band,
    MissingCo2,
    LightGoodsEuro6,
    LightGoodsEuro5,
    FirstYear,
    FirstYearDiesel,
    NoFirstYearBracket,
    StandardRate,
    LuxurySurcharge,
}

impl Reason {
    pub fn code(&self) -> &'static str {
        match self {
            Reason::UnresolvedRegistrationDate => "unresolved_registration_date",
            Reason::EngineCapacityBracket => "engine_capacity_bracket",
            Reason::NoEngineCapacityBracket => "no_engine_capacity_bracket",
            Reason::MissingEngineCapacity => "missing_engine_capacity",
            Reason::Co2Band => "co2_band",
            Reason::NoCo2Band => "no_co2_band",
            Reason::MissingCo2 => "missing_co2",
            Reason::LightGoodsEuro6 => "light_goods_euro6",
            Reason::LightGoodsEuro5 => "light_goods_euro5",
            Reason::FirstYear => "first_year",
            Reason::FirstYearDiesel => "first_year_diesel",
            Reason::NoFirstYearBracket => "no_first_year_bracket",
            Reason::StandardRate => "standard_rate",
            Reason::LuxurySurcharge => "luxury_surcharge",
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Outcome of a duty calculation.
///
/// Both rates absent means the duty could not be determined from the data
/// given; `reason` and `notes` say why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxCalculation {
    pub six_month_rate: Option<Decimal>,
    pub twelve_month_rate: Option<Decimal>,
    pub first_year: bool,
    pub band: Option<String>,
    pub reason: Reason,
    pub notes: Vec<String>,
    pub registration_date: Option<NaiveDate>,
    pub date_source: Option<DateSource>,
    pub era: Option<Era>,
}

impl TaxCalculation {
    pub(crate) fn from_rates(rates: &RatePair, reason: Reason, note: impl Into<String>) -> Self {
        TaxCalculation {
            six_month_rate: Some(rates.six_month),
            twelve_month_rate: Some(rates.twelve_month),
            ..Self::undetermined(reason, note)
        }
    }

    pub(crate) fn twelve_month_only(rate: Decimal, reason: Reason, note: impl Into<String>) -> Self {
        TaxCalculation {
            twelve_month_rate: Some(rate),
            ..Self::undetermined(reason, note)
        }
    }

    pub(crate) fn undetermined(reason: Reason, note: impl Into<String>) -> Self {
        TaxCalculation {
            six_month_rate: None,
            twelve_month_rate: None,
            first_year: false,
            band: None,
            reason,
            notes: vec![note.into()],
            registration_date: None,
            date_source: None,
            era: None,
        }
    }

    pub(crate) fn with_band(mut self, band: impl Into<String>) -> Self {
        self.band = Some(band.into());
        self
    }

    /// Mark a result priced from an assumed input value
    pub(crate) fn assumed(mut self, reason: Reason, note: impl Into<String>) -> Self {
        self.reason = reason;
        self.notes.insert(0, note.into());
        self
    }

    pub(crate) fn in_first_year(mut self) -> Self {
        self.first_year = true;
        self
    }

    /// Attach the resolved date and era, with the date note leading
    pub(crate) fn registered(mut self, registration: RegistrationDate, era: Era) -> Self {
        self.notes.insert(0, registration.note());
        self.registration_date = Some(registration.date);
        self.date_source = Some(registration.source);
        self.era = Some(era);
        self
    }

    pub fn is_determined(&self) -> bool {
        self.six_month_rate.is_some() || self.twelve_month_rate.is_some()
    }

    pub fn notes(&self) -> String {
        self.notes.join("; ")
    }
}
