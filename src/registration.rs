//! Effective registration date resolution.
//!
//! Year of manufacture wins when present. Otherwise the date is read from
//! the registration mark: current format marks (`AB12 CDE`) carry an age
//! identifier for March or September, prefix marks (`A123 BCD`) a year letter
//! issued each August from 1983.

use crate::vehicle::Vehicle;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static CURRENT_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}([0-9]{2})[A-Z]{3}$").expect("valid regex"));
static PREFIX_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z])[0-9]{3}[A-Z]{3}$").expect("valid regex"));

/// Where a registration date came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    YearOfManufacture,
    CurrentPlate,
    PrefixPlate,
}

impl DateSource {
    pub fn display(&self) -> &'static str {
        match self {
            DateSource::YearOfManufacture => "year of manufacture",
            DateSource::CurrentPlate => "current format plate",
            DateSource::PrefixPlate => "prefix format plate",
        }
    }
}

impl std::fmt::Display for DateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistrationDate {
    pub date: NaiveDate,
    pub source: DateSource,
}

impl RegistrationDate {
    /// Audit note describing how the date was derived
    pub fn note(&self) -> String {
        match self.source {
            DateSource::YearOfManufacture => format!(
                "Registration date approximated as {} from year of manufacture",
                self.date
            ),
            source => format!("Registration date {} taken from {}", self.date, source),
        }
    }
}

/// Resolve the effective registration date, `None` if it cannot be determined
pub fn resolve(vehicle: &Vehicle) -> Option<RegistrationDate> {
    let from_year = vehicle
        .year_of_manufacture
        .filter(|year| *year > 0)
        .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        .map(|date| RegistrationDate {
            date,
            source: DateSource::YearOfManufacture,
        });
    from_year.or_else(|| parse_plate(&vehicle.registration_number))
}

/// Date implied by a registration mark, ignoring case and whitespace
pub fn parse_plate(registration: &str) -> Option<RegistrationDate> {
    let plate: String = registration
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    if let Some(caps) = CURRENT_FORMAT.captures(&plate) {
        let age: i32 = caps[1].parse().ok()?;
        let (year, month) = if age >= 51 {
            (2000 + age - 50, 9)
        } else {
            (2000 + age, 3)
        };
        return NaiveDate::from_ymd_opt(year, month, 1).map(|date| RegistrationDate {
            date,
            source: DateSource::CurrentPlate,
        });
    }

    if let Some(caps) = PREFIX_FORMAT.captures(&plate) {
        let letter = caps[1].as_bytes()[0];
        let year = 1983 + i32::from(letter - b'A');
        return NaiveDate::from_ymd_opt(year, 8, 1).map(|date| RegistrationDate {
            date,
            source: DateSource::PrefixPlate,
        });
    }

    None
}
