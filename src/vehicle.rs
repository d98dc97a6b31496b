use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Debug, thiserror::Error)]
pub enum VehicleInputError {
    #[error("invalid vehicle CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid vehicle JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Vehicle attributes as supplied by the registry lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Vehicle {
    pub registration_number: String,
    #[serde(default)]
    pub year_of_manufacture: Option<i32>,
    /// CO2 emissions in g/km
    #[serde(default)]
    pub co2_emissions: Option<u32>,
    /// Engine capacity in cc
    #[serde(default)]
    pub engine_capacity: Option<u32>,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub euro_status: Option<String>,
    #[serde(default)]
    pub type_approval: Option<String>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub list_price: Option<Decimal>,
}

impl Vehicle {
    pub fn new(registration_number: impl Into<String>) -> Self {
        Vehicle {
            registration_number: registration_number.into(),
            ..Default::default()
        }
    }

    pub fn is_diesel(&self) -> bool {
        self.fuel_type
            .as_deref()
            .is_some_and(|fuel| fuel.to_lowercase().contains("diesel"))
    }

    /// N1 type approval (light goods vehicle)
    pub fn is_light_goods(&self) -> bool {
        self.type_approval.as_deref() == Some("N1")
    }

    /// Euro 6 or later, e.g. "EURO 6d-TEMP" or "Euro6"
    pub fn is_euro6(&self) -> bool {
        let status = self.euro_status.as_deref().unwrap_or_default().to_lowercase();
        status.contains("euro 6") || status.contains("euro6")
    }

    pub fn is_zero_emission(&self) -> bool {
        self.co2_emissions == Some(0)
    }

    /// List price, zero when unknown
    pub fn list_price(&self) -> Decimal {
        self.list_price.unwrap_or(Decimal::ZERO)
    }
}

/// Input record for a vehicle to be priced (CSV row or JSON element)
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VehicleRecord {
    /// UK registration mark, e.g. "AB12 CDE"
    pub registration_number: String,
    /// Year of manufacture, used as 1 January of that year
    #[serde(default)]
    pub year_of_manufacture: Option<i32>,
    /// CO2 emissions in g/km
    #[serde(default)]
    pub co2_emissions: Option<u32>,
    /// Engine capacity in cc
    #[serde(default)]
    pub engine_capacity: Option<u32>,
    /// Fuel type, e.g. "Petrol", "Diesel", "Electricity"
    #[serde(default)]
    pub fuel_type: Option<String>,
    /// Euro emissions standard, e.g. "EURO 6d"
    #[serde(default)]
    pub euro_status: Option<String>,
    /// Type approval category, e.g. "M1" or "N1"
    #[serde(default)]
    pub type_approval: Option<String>,
    /// List price in GBP when new
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub list_price: Option<Decimal>,
    /// 1 = 6 months, 2 = 12 months, 3 = direct debit setup only
    #[serde(default)]
    pub tax_preference: Option<u8>,
}

impl From<VehicleRecord> for Vehicle {
    fn from(record: VehicleRecord) -> Self {
        Vehicle {
            registration_number: record.registration_number,
            year_of_manufacture: record.year_of_manufacture,
            co2_emissions: record.co2_emissions,
            engine_capacity: record.engine_capacity,
            fuel_type: record.fuel_type,
            euro_status: record.euro_status,
            type_approval: record.type_approval,
            list_price: record.list_price,
        }
    }
}

/// JSON input root
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VehicleInput {
    pub vehicles: Vec<VehicleRecord>,
}

/// Read vehicle records from CSV
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<VehicleRecord>, VehicleInputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let records = rdr
        .deserialize::<VehicleRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Read vehicle records from JSON
pub fn read_json<R: Read>(reader: R) -> Result<Vec<VehicleRecord>, VehicleInputError> {
    let input: VehicleInput = serde_json::from_reader(reader)?;
    Ok(input.vehicles)
}
