//! Rate table loading and validation.
//!
//! The table is read from JSON once and checked before any calculation can
//! use it: every banded table must start at zero and run without gaps or
//! overlaps, and no rate may be negative. A [`RateTable`] can only be obtained
//! through these checks.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// 2025/26 rates, compiled in as the default table
const EMBEDDED_RATES: &str = include_str!("../rates/vehicle_tax_rates.json");

#[derive(Debug, thiserror::Error)]
pub enum RateTableError {
    #[error("failed to read rate table: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse rate table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{table}: table is empty")]
    EmptyTable { table: &'static str },
    #[error("{table}: first band must start at 0, found {min}")]
    DoesNotStartAtZero { table: &'static str, min: u32 },
    #[error("{table}[{index}]: maximum {max} is below minimum {min}")]
    InvertedRange {
        table: &'static str,
        index: usize,
        min: u32,
        max: u32,
    },
    #[error("{table}[{index}]: gap between {previous_max} and {min}")]
    Gap {
        table: &'static str,
        index: usize,
        previous_max: u32,
        min: u32,
    },
    #[error("{table}[{index}]: overlaps previous band ending at {previous_max}")]
    Overlap {
        table: &'static str,
        index: usize,
        previous_max: u32,
    },
    #[error("{table}[{index}]: only the last band may be open-ended")]
    UnboundedNotLast { table: &'static str, index: usize },
    #[error("pre_2001[{index}]: bracket needs exactly one of engine_cc_max or engine_cc_min")]
    AmbiguousEngineBracket { index: usize },
    #[error("{table}: negative rate {rate}")]
    NegativeRate { table: &'static str, rate: Decimal },
    #[error("luxury surcharge threshold must be positive, found {0}")]
    InvalidLuxuryThreshold(Decimal),
}

/// Twelve month and six month (direct debit) rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RatePair {
    #[serde(rename = "12_month", alias = "12_month_single")]
    #[schemars(with = "f64")]
    pub twelve_month: Decimal,
    #[serde(rename = "6_month_dd", alias = "6_month_direct_debit")]
    #[schemars(with = "f64")]
    pub six_month: Decimal,
}

/// Closed CO2 interval in g/km. A missing maximum makes the band open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Co2Range {
    #[serde(rename = "co2_min")]
    pub min: u32,
    #[serde(rename = "co2_max", default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl Co2Range {
    pub fn contains(&self, co2: u32) -> bool {
        co2 >= self.min && self.max.map_or(true, |max| co2 <= max)
    }

    /// e.g. "51-75", "0" or "256+"
    pub fn label(&self) -> String {
        match self.max {
            Some(max) if max == self.min => self.min.to_string(),
            Some(max) => format!("{}-{}", self.min, max),
            None => format!("{}+", self.min),
        }
    }
}

/// 2001-2017 CO2 band
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Co2Band {
    pub band: String,
    #[serde(flatten)]
    pub range: Co2Range,
    #[serde(flatten)]
    pub rates: RatePair,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FirstYearRates {
    /// Petrol, RDE2 diesel and alternative fuel cars
    #[schemars(with = "f64")]
    pub standard: Decimal,
    /// Diesel cars not meeting RDE2
    #[schemars(with = "f64")]
    pub all_other_diesel: Decimal,
}

/// Post-2017 first year CO2 bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FirstYearBracket {
    #[serde(flatten)]
    pub range: Co2Range,
    pub rates: FirstYearRates,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Post2017Rates {
    pub first_year_by_co2: Vec<FirstYearBracket>,
    pub standard_from_second_year: RatePair,
    pub luxury_adjusted_rates: RatePair,
}

/// N1 light goods vehicle rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LightGoodsRates {
    #[serde(rename = "light_goods_tc39")]
    pub euro6: RatePair,
    #[serde(rename = "euro5_light_goods_tc36")]
    pub euro5_or_below: RatePair,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LuxurySurcharge {
    #[schemars(with = "f64")]
    pub threshold_list_price: Decimal,
    pub applies_for_years: u32,
    /// Zero emission cars registered before this date are exempt
    pub zero_emission_exempt_before: NaiveDate,
}

/// Pre-2001 bracket as written in the rate file
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EngineBracketRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_cc_max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_cc_min: Option<u32>,
    #[serde(flatten)]
    pub rates: RatePair,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Pre2001Rates {
    pub cars_and_light_goods: Vec<EngineBracketRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Co2BandedRates {
    pub bands: Vec<Co2Band>,
}

/// Rate file layout, keyed by era
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RateTableFile {
    pub pre_2001: Pre2001Rates,
    pub co2_banded: Co2BandedRates,
    pub post_2017: Post2017Rates,
    pub light_goods: LightGoodsRates,
    pub luxury_surcharge: LuxurySurcharge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EngineBound {
    AtMost(u32),
    AtLeast(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineBracket {
    pub bound: EngineBound,
    pub rates: RatePair,
}

impl EngineBracket {
    pub fn matches(&self, engine_cc: u32) -> bool {
        match self.bound {
            EngineBound::AtMost(max) => engine_cc <= max,
            EngineBound::AtLeast(min) => engine_cc >= min,
        }
    }

    pub fn label(&self) -> String {
        match self.bound {
            EngineBound::AtMost(max) => format!("up to {}cc", max),
            EngineBound::AtLeast(min) => format!("{}cc and over", min),
        }
    }
}

impl EngineBracketRecord {
    fn to_bracket(&self, index: usize) -> Result<EngineBracket, RateTableError> {
        let bound = match (self.engine_cc_max, self.engine_cc_min) {
            (Some(max), None) => EngineBound::AtMost(max),
            (None, Some(min)) => EngineBound::AtLeast(min),
            _ => return Err(RateTableError::AmbiguousEngineBracket { index }),
        };
        Ok(EngineBracket {
            bound,
            rates: self.rates,
        })
    }
}

/// Validated, read-only rate table
#[derive(Debug, Clone, Serialize)]
pub struct RateTable {
    fingerprint: String,
    engine_brackets: Vec<EngineBracket>,
    co2_bands: Vec<Co2Band>,
    post_2017: Post2017Rates,
    light_goods: LightGoodsRates,
    luxury_surcharge: LuxurySurcharge,
}

impl RateTable {
    /// The compiled-in default table
    pub fn embedded() -> Result<Self, RateTableError> {
        Self::from_json(EMBEDDED_RATES)
    }

    pub fn load(path: &Path) -> Result<Self, RateTableError> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self, RateTableError> {
        let file: RateTableFile = serde_json::from_str(data)?;
        let fingerprint = hex::encode(Sha256::digest(data.as_bytes()));
        Self::from_file(file, fingerprint)
    }

    fn from_file(file: RateTableFile, fingerprint: String) -> Result<Self, RateTableError> {
        let engine_brackets = file
            .pre_2001
            .cars_and_light_goods
            .iter()
            .enumerate()
            .map(|(index, record)| record.to_bracket(index))
            .collect::<Result<Vec<_>, _>>()?;
        check_engine_brackets(&engine_brackets)?;
        check_non_negative(
            "pre_2001.cars_and_light_goods",
            engine_brackets.iter().flat_map(|b| pair_rates(&b.rates)),
        )?;

        let co2_bands = file.co2_banded.bands;
        check_contiguous("co2_banded.bands", co2_bands.iter().map(|b| b.range))?;
        check_non_negative(
            "co2_banded.bands",
            co2_bands.iter().flat_map(|b| pair_rates(&b.rates)),
        )?;

        let post_2017 = file.post_2017;
        check_contiguous(
            "post_2017.first_year_by_co2",
            post_2017.first_year_by_co2.iter().map(|b| b.range),
        )?;
        check_non_negative(
            "post_2017.first_year_by_co2",
            post_2017
                .first_year_by_co2
                .iter()
                .flat_map(|b| [b.rates.standard, b.rates.all_other_diesel]),
        )?;
        check_non_negative(
            "post_2017.standard_from_second_year",
            pair_rates(&post_2017.standard_from_second_year),
        )?;
        check_non_negative(
            "post_2017.luxury_adjusted_rates",
            pair_rates(&post_2017.luxury_adjusted_rates),
        )?;

        let light_goods = file.light_goods;
        check_non_negative(
            "light_goods",
            pair_rates(&light_goods.euro6).into_iter().chain(pair_rates(&light_goods.euro5_or_below)),
        )?;

        let luxury_surcharge = file.luxury_surcharge;
        if luxury_surcharge.threshold_list_price <= Decimal::ZERO {
            return Err(RateTableError::InvalidLuxuryThreshold(
                luxury_surcharge.threshold_list_price,
            ));
        }

        log::debug!(
            "Rate table {}: {} engine brackets, {} CO2 bands, {} first year brackets",
            fingerprint,
            engine_brackets.len(),
            co2_bands.len(),
            post_2017.first_year_by_co2.len()
        );

        Ok(RateTable {
            fingerprint,
            engine_brackets,
            co2_bands,
            post_2017,
            light_goods,
            luxury_surcharge,
        })
    }

    /// SHA-256 of the source JSON, hex encoded
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn engine_brackets(&self) -> &[EngineBracket] {
        &self.engine_brackets
    }

    pub fn co2_bands(&self) -> &[Co2Band] {
        &self.co2_bands
    }

    pub fn first_year_brackets(&self) -> &[FirstYearBracket] {
        &self.post_2017.first_year_by_co2
    }

    pub fn standard_rates(&self) -> &RatePair {
        &self.post_2017.standard_from_second_year
    }

    pub fn luxury_rates(&self) -> &RatePair {
        &self.post_2017.luxury_adjusted_rates
    }

    pub fn light_goods(&self) -> &LightGoodsRates {
        &self.light_goods
    }

    pub fn luxury_surcharge(&self) -> &LuxurySurcharge {
        &self.luxury_surcharge
    }
}

fn pair_rates(pair: &RatePair) -> [Decimal; 2] {
    [pair.twelve_month, pair.six_month]
}

fn check_non_negative(
    table: &'static str,
    rates: impl IntoIterator<Item = Decimal>,
) -> Result<(), RateTableError> {
    match rates.into_iter().find(|rate| *rate < Decimal::ZERO) {
        Some(rate) => Err(RateTableError::NegativeRate { table, rate }),
        None => Ok(()),
    }
}

/// Bands must start at 0 and each must begin one above the previous maximum.
fn check_contiguous(
    table: &'static str,
    ranges: impl IntoIterator<Item = Co2Range>,
) -> Result<(), RateTableError> {
    let mut previous: Option<Co2Range> = None;
    for (index, range) in ranges.into_iter().enumerate() {
        if let Some(max) = range.max {
            if max < range.min {
                return Err(RateTableError::InvertedRange {
                    table,
                    index,
                    min: range.min,
                    max,
                });
            }
        }
        match previous {
            None if range.min != 0 => {
                return Err(RateTableError::DoesNotStartAtZero {
                    table,
                    min: range.min,
                })
            }
            None => {}
            Some(Co2Range { max: None, .. }) => {
                return Err(RateTableError::UnboundedNotLast {
                    table,
                    index: index - 1,
                })
            }
            Some(Co2Range {
                max: Some(previous_max),
                ..
            }) => {
                if range.min <= previous_max {
                    return Err(RateTableError::Overlap {
                        table,
                        index,
                        previous_max,
                    });
                }
                if range.min - previous_max > 1 {
                    return Err(RateTableError::Gap {
                        table,
                        index,
                        previous_max,
                        min: range.min,
                    });
                }
            }
        }
        previous = Some(range);
    }
    if previous.is_none() {
        return Err(RateTableError::EmptyTable { table });
    }
    Ok(())
}

/// Upper-bounded brackets in increasing order, optionally closed by one
/// lower-bounded bracket starting just above them.
fn check_engine_brackets(brackets: &[EngineBracket]) -> Result<(), RateTableError> {
    const TABLE: &str = "pre_2001.cars_and_light_goods";
    if brackets.is_empty() {
        return Err(RateTableError::EmptyTable { table: TABLE });
    }
    let mut covered_to: Option<u32> = None;
    for (index, bracket) in brackets.iter().enumerate() {
        match bracket.bound {
            EngineBound::AtMost(max) => {
                if let Some(previous_max) = covered_to {
                    if max <= previous_max {
                        return Err(RateTableError::Overlap {
                            table: TABLE,
                            index,
                            previous_max,
                        });
                    }
                }
                covered_to = Some(max);
            }
            EngineBound::AtLeast(min) => {
                if index + 1 != brackets.len() {
                    return Err(RateTableError::UnboundedNotLast {
                        table: TABLE,
                        index,
                    });
                }
                match covered_to {
                    None if min != 0 => {
                        return Err(RateTableError::DoesNotStartAtZero { table: TABLE, min })
                    }
                    None => {}
                    Some(previous_max) if min <= previous_max => {
                        return Err(RateTableError::Overlap {
                            table: TABLE,
                            index,
                            previous_max,
                        })
                    }
                    Some(previous_max) if min - previous_max > 1 => {
                        return Err(RateTableError::Gap {
                            table: TABLE,
                            index,
                            previous_max,
                            min,
                        })
                    }
                    Some(_) => {}
                }
            }
        }
    }
    Ok(())
}
