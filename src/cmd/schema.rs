//! Schema command - print expected input formats

use clap::Args;
use schemars::schema_for;
use vedc::rates::RateTableFile;
use vedc::vehicle::VehicleInput;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "vehicle-json")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the vehicles input
    VehicleJson,
    /// JSON Schema for a rate table file
    RateTable,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::VehicleJson => {
                let schema = schema_for!(VehicleInput);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::RateTable => {
                let schema = schema_for!(RateTableFile);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => println!("{}", CSV_COLUMNS.join(",")),
            SchemaFormat::CsvFields => print_csv_fields(),
        }
        Ok(())
    }
}

fn print_csv_fields() {
    println!("CSV Input Format");
    println!("================");
    println!();
    for (name, required, description) in CSV_FIELD_DESCRIPTIONS {
        let req = if *required { "required" } else { "optional" };
        println!("{:20} ({:8})  {}", name, req, description);
    }
    println!();
    println!("Registration date comes from year_of_manufacture when given, else the plate");
}

const CSV_COLUMNS: &[&str] = &[
    "registration_number",
    "year_of_manufacture",
    "co2_emissions",
    "engine_capacity",
    "fuel_type",
    "euro_status",
    "type_approval",
    "list_price",
    "tax_preference",
];

const CSV_FIELD_DESCRIPTIONS: &[(&str, bool, &str)] = &[
    (
        "registration_number",
        true,
        "UK registration mark, spaces ignored (e.g. AB12 CDE, K123 ABC)",
    ),
    ("year_of_manufacture", false, "Four digit year"),
    (
        "co2_emissions",
        false,
        "CO2 emissions in g/km (needed from March 2001)",
    ),
    (
        "engine_capacity",
        false,
        "Engine size in cc (needed before March 2001)",
    ),
    (
        "fuel_type",
        false,
        "Petrol, Diesel, Electric, ... (diesel affects first year rate)",
    ),
    (
        "euro_status",
        false,
        "Euro emissions standard, e.g. EURO 6d (N1 vans only)",
    ),
    ("type_approval", false, "M1 for cars, N1 for light goods vans"),
    (
        "list_price",
        false,
        "List price when new in GBP, for the expensive car supplement",
    ),
    (
        "tax_preference",
        false,
        "1 = 6 months, 2 = 12 months, 3 = direct debit setup",
    ),
];
