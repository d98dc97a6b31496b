use crate::rates::RateTable;
use crate::tax::calculation::TaxCalculation;
use crate::tax::{co2, engine_size, post2017};
use crate::vehicle::Vehicle;
use chrono::NaiveDate;
use serde::Serialize;

/// VED regime, selected by registration date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Era {
    /// Before 1 March 2001, banded by engine capacity
    Pre2001,
    /// 1 March 2001 to 31 March 2017, banded by CO2
    Co2Banded,
    /// From 1 April 2017
    Post2017,
}

impl Era {
    /// First day of the CO2 banded regime
    pub fn co2_banded_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2001, 3, 1).expect("valid date")
    }

    /// First day of the post-2017 regime
    pub fn post_2017_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 4, 1).expect("valid date")
    }

    /// A boundary date belongs to the later era
    pub fn from_date(registered: NaiveDate) -> Self {
        if registered >= Era::post_2017_start() {
            Era::Post2017
        } else if registered >= Era::co2_banded_start() {
            Era::Co2Banded
        } else {
            Era::Pre2001
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            Era::Pre2001 => "pre-2001",
            Era::Co2Banded => "2001-2017",
            Era::Post2017 => "post-2017",
        }
    }
}

impl std::fmt::Display for Era {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// The inputs one era's rules need, and nothing else
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment<'a> {
    EngineCapacity {
        engine_cc: Option<u32>,
    },
    Co2Band {
        co2: Option<u32>,
    },
    Post2017 {
        vehicle: &'a Vehicle,
        registered: NaiveDate,
    },
}

impl<'a> Assessment<'a> {
    pub fn new(vehicle: &'a Vehicle, registered: NaiveDate) -> Self {
        match Era::from_date(registered) {
            Era::Pre2001 => Assessment::EngineCapacity {
                engine_cc: vehicle.engine_capacity,
            },
            Era::Co2Banded => Assessment::Co2Band {
                co2: vehicle.co2_emissions,
            },
            Era::Post2017 => Assessment::Post2017 {
                vehicle,
                registered,
            },
        }
    }

    pub fn era(&self) -> Era {
        match self {
            Assessment::EngineCapacity { .. } => Era::Pre2001,
            Assessment::Co2Band { .. } => Era::Co2Banded,
            Assessment::Post2017 { .. } => Era::Post2017,
        }
    }

    pub fn assess(&self, rates: &RateTable, today: NaiveDate) -> TaxCalculation {
        match *self {
            Assessment::EngineCapacity { engine_cc } => {
                engine_size::calculate(engine_cc, rates.engine_brackets())
            }
            Assessment::Co2Band { co2 } => co2::calculate(co2, rates.co2_bands()),
            Assessment::Post2017 {
                vehicle,
                registered,
            } => post2017::calculate(vehicle, registered, rates, today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn post_2017_boundary_belongs_to_post_2017() {
        assert_eq!(Era::from_date(date(2017, 4, 1)), Era::Post2017);
        assert_eq!(Era::from_date(date(2017, 3, 31)), Era::Co2Banded);
    }

    #[test]
    fn co2_banded_boundary_belongs_to_co2_banded() {
        assert_eq!(Era::from_date(date(2001, 3, 1)), Era::Co2Banded);
        assert_eq!(Era::from_date(date(2001, 2, 28)), Era::Pre2001);
    }

    #[test]
    fn far_dates() {
        assert_eq!(Era::from_date(date(1965, 1, 1)), Era::Pre2001);
        assert_eq!(Era::from_date(date(2049, 9, 1)), Era::Post2017);
    }

    #[test]
    fn assessment_carries_only_the_era_inputs() {
        let mut vehicle = Vehicle::new("AB12CDE");
        vehicle.co2_emissions = Some(120);
        vehicle.engine_capacity = Some(1598);

        assert_eq!(
            Assessment::new(&vehicle, date(1999, 8, 1)),
            Assessment::EngineCapacity {
                engine_cc: Some(1598)
            }
        );
        assert_eq!(
            Assessment::new(&vehicle, date(2012, 3, 1)),
            Assessment::Co2Band { co2: Some(120) }
        );
        let post = Assessment::new(&vehicle, date(2017, 4, 1));
        assert_eq!(post.era(), Era::Post2017);
        assert!(matches!(post, Assessment::Post2017 { .. }));
    }
}
