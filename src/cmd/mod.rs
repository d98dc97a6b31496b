pub mod quote;
pub mod rates;
pub mod schema;

use anyhow::Context;
use clap::Args;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use vedc::vehicle::{self, VehicleRecord};
use vedc::RateTable;

/// Rate table selection shared by commands
#[derive(Args, Debug)]
pub struct RatesArgs {
    /// Rate table JSON file (defaults to the built-in 2025/26 rates)
    #[arg(long = "rates", env = "VEDC_RATES")]
    path: Option<PathBuf>,
}

impl RatesArgs {
    /// Load and validate the rate table, refusing to continue if it is invalid
    pub fn load(&self) -> anyhow::Result<RateTable> {
        let rates = match &self.path {
            Some(path) => RateTable::load(path)
                .with_context(|| format!("invalid rate table {}", path.display()))?,
            None => RateTable::embedded().context("invalid built-in rate table")?,
        };
        log::info!("Using rate table {}", rates.fingerprint());
        Ok(rates)
    }
}

/// Read vehicle records from CSV or JSON (or stdin with "-")
pub fn read_vehicles(path: &Path, json: bool) -> anyhow::Result<Vec<VehicleRecord>> {
    let json = json || path.extension().is_some_and(|ext| ext == "json");
    let records = if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        io::stdin().lock().read_to_end(&mut buffer)?;
        if buffer.is_empty() {
            anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
        }
        parse_vehicles(io::Cursor::new(buffer), json)?
    } else {
        let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        parse_vehicles(BufReader::new(file), json)?
    };
    log::info!("Read {} vehicle records", records.len());
    Ok(records)
}

fn parse_vehicles<R: Read>(reader: R, json: bool) -> anyhow::Result<Vec<VehicleRecord>> {
    let records = if json {
        vehicle::read_json(reader)?
    } else {
        vehicle::read_csv(reader)?
    };
    Ok(records)
}

pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

pub fn format_optional_amount(amount: Option<Decimal>) -> String {
    amount.map_or_else(|| "-".to_string(), format_amount)
}
