//! Quote command - duty and payable total for each vehicle

use crate::cmd::{format_amount, format_optional_amount, read_vehicles, RatesArgs};
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};
use vedc::{
    calculate_vehicle_tax, quote, Quote, RateTable, TaxCalculation, TaxPreference, Vehicle,
    VehicleRecord,
};

#[derive(Args, Debug)]
pub struct QuoteCommand {
    /// CSV or JSON file of vehicles ("-" for stdin)
    #[arg(short, long)]
    vehicles: Option<PathBuf>,

    /// Parse the vehicles input as JSON whatever its extension
    #[arg(long)]
    json_input: bool,

    #[command(flatten)]
    vehicle: VehicleArgs,

    /// Tax preference for records without their own tax_preference code
    #[arg(short, long, value_enum, default_value_t = PreferenceArg::TwelveMonths)]
    preference: PreferenceArg,

    /// Valuation date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    as_of: Option<NaiveDate>,

    #[command(flatten)]
    rates: RatesArgs,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,

    /// Output as JSON instead of formatted table
    #[arg(long, conflicts_with = "csv")]
    json: bool,
}

/// A single vehicle given on the command line
#[derive(Args, Debug)]
struct VehicleArgs {
    /// Registration mark, e.g. "AB12 CDE"
    #[arg(short, long, conflicts_with = "vehicles")]
    registration: Option<String>,

    /// Year of manufacture
    #[arg(long, conflicts_with = "vehicles")]
    year: Option<i32>,

    /// CO2 emissions (g/km)
    #[arg(long, conflicts_with = "vehicles")]
    co2: Option<u32>,

    /// Engine capacity (cc)
    #[arg(long, conflicts_with = "vehicles")]
    engine_cc: Option<u32>,

    /// Fuel type, e.g. Petrol or Diesel
    #[arg(long, conflicts_with = "vehicles")]
    fuel: Option<String>,

    /// Euro status, e.g. "EURO 6d"
    #[arg(long, conflicts_with = "vehicles")]
    euro: Option<String>,

    /// Type approval category, e.g. M1 or N1
    #[arg(long, conflicts_with = "vehicles")]
    type_approval: Option<String>,

    /// List price when new (GBP)
    #[arg(long, conflicts_with = "vehicles")]
    list_price: Option<Decimal>,
}

impl VehicleArgs {
    fn record(&self) -> Option<VehicleRecord> {
        let registration = self.registration.clone()?;
        Some(VehicleRecord {
            registration_number: registration,
            year_of_manufacture: self.year,
            co2_emissions: self.co2,
            engine_capacity: self.engine_cc,
            fuel_type: self.fuel.clone(),
            euro_status: self.euro.clone(),
            type_approval: self.type_approval.clone(),
            list_price: self.list_price,
            tax_preference: None,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum PreferenceArg {
    /// 6 months tax plus £50 commission
    SixMonths,
    /// 12 months tax plus £50 commission
    #[default]
    TwelveMonths,
    /// Direct debit setup, £60 commission only
    DirectDebit,
}

impl From<PreferenceArg> for TaxPreference {
    fn from(arg: PreferenceArg) -> Self {
        match arg {
            PreferenceArg::SixMonths => TaxPreference::SixMonths,
            PreferenceArg::TwelveMonths => TaxPreference::TwelveMonths,
            PreferenceArg::DirectDebit => TaxPreference::DirectDebit,
        }
    }
}

/// A priced vehicle
#[derive(Debug, Serialize)]
struct QuoteEntry {
    registration_number: String,
    calculation: TaxCalculation,
    quote: Quote,
}

#[derive(Debug, Serialize)]
struct QuoteOutput<'a> {
    as_of: NaiveDate,
    rate_table: &'a str,
    quotes: &'a [QuoteEntry],
}

impl QuoteCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let rates = self.rates.load()?;
        let today = self
            .as_of
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let preference: TaxPreference = self.preference.into();

        let records = match (&self.vehicles, self.vehicle.record()) {
            (Some(path), _) => read_vehicles(path, self.json_input)?,
            (None, Some(record)) => vec![record],
            (None, None) => {
                anyhow::bail!("Provide a vehicles file with --vehicles or a single --registration")
            }
        };

        let entries = price_vehicles(records, &rates, today, preference)?;
        let undetermined = entries
            .iter()
            .filter(|e| !e.calculation.is_determined())
            .count();
        log::info!(
            "Priced {} vehicles as at {}, {} undetermined",
            entries.len(),
            today,
            undetermined
        );

        if self.json {
            self.print_json(&entries, &rates, today)
        } else if self.csv {
            self.write_csv(&entries)
        } else {
            self.print_table(&entries);
            Ok(())
        }
    }

    fn print_table(&self, entries: &[QuoteEntry]) {
        if entries.is_empty() {
            println!("No vehicles to price");
            return;
        }

        let rows: Vec<QuoteRow> = entries.iter().map(QuoteRow::from).collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }

    fn write_csv(&self, entries: &[QuoteEntry]) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for entry in entries {
            wtr.serialize(QuoteRow::from(entry))?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn print_json(
        &self,
        entries: &[QuoteEntry],
        rates: &RateTable,
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        let output = QuoteOutput {
            as_of: today,
            rate_table: rates.fingerprint(),
            quotes: entries,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

fn price_vehicles(
    records: Vec<VehicleRecord>,
    rates: &RateTable,
    today: NaiveDate,
    default_preference: TaxPreference,
) -> anyhow::Result<Vec<QuoteEntry>> {
    records
        .into_iter()
        .map(|record| {
            let preference = match record.tax_preference {
                Some(code) => TaxPreference::try_from(code)
                    .with_context(|| format!("vehicle {}", record.registration_number))?,
                None => default_preference,
            };
            let vehicle = Vehicle::from(record);
            let calculation = calculate_vehicle_tax(&vehicle, rates, today);
            if !calculation.is_determined() {
                log::warn!(
                    "{}: duty undetermined ({}), {}",
                    vehicle.registration_number,
                    calculation.reason,
                    calculation.notes()
                );
            }
            let quote = quote(&calculation, preference);
            Ok(QuoteEntry {
                registration_number: vehicle.registration_number,
                calculation,
                quote,
            })
        })
        .collect()
}

/// Row for the quote table and CSV output
#[derive(Debug, Clone, Tabled, Serialize)]
struct QuoteRow {
    #[tabled(rename = "Registration")]
    registration: String,
    #[tabled(rename = "Registered")]
    registered: String,
    #[tabled(rename = "Era")]
    era: String,
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "6 Month (£)")]
    six_month: String,
    #[tabled(rename = "12 Month (£)")]
    twelve_month: String,
    #[tabled(rename = "First Year")]
    first_year: bool,
    #[tabled(rename = "Preference")]
    preference: String,
    #[tabled(rename = "Commission (£)")]
    commission: String,
    #[tabled(rename = "Total (£)")]
    total: String,
    #[tabled(rename = "Reason")]
    reason: String,
    #[tabled(skip)]
    notes: String,
}

impl From<&QuoteEntry> for QuoteRow {
    fn from(entry: &QuoteEntry) -> Self {
        let calculation = &entry.calculation;
        let quote = &entry.quote;
        let mut notes = calculation.notes.clone();
        notes.extend(quote.notes.iter().cloned());

        QuoteRow {
            registration: entry.registration_number.clone(),
            registered: calculation
                .registration_date
                .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string()),
            era: calculation
                .era
                .map_or_else(|| "-".to_string(), |era| era.to_string()),
            band: calculation.band.clone().unwrap_or_else(|| "-".to_string()),
            six_month: format_optional_amount(calculation.six_month_rate),
            twelve_month: format_optional_amount(calculation.twelve_month_rate),
            first_year: calculation.first_year,
            preference: quote.preference.to_string(),
            commission: format_amount(quote.commission_fee),
            total: format_amount(quote.total),
            reason: calculation.reason.to_string(),
            notes: notes.join("; "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct QuoteCli {
        #[command(flatten)]
        quote: QuoteCommand,
    }

    fn record(registration: &str, tax_preference: Option<u8>) -> VehicleRecord {
        VehicleRecord {
            registration_number: registration.to_string(),
            year_of_manufacture: None,
            co2_emissions: Some(120),
            engine_capacity: Some(1598),
            fuel_type: Some("Petrol".to_string()),
            euro_status: None,
            type_approval: None,
            list_price: None,
            tax_preference,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn record_preference_overrides_default() {
        let rates = RateTable::embedded().unwrap();
        let entries = price_vehicles(
            vec![record("AB12CDE", Some(1)), record("AB12CDF", None)],
            &rates,
            today(),
            TaxPreference::DirectDebit,
        )
        .unwrap();

        assert_eq!(entries[0].quote.preference, TaxPreference::SixMonths);
        assert_eq!(entries[0].quote.total.to_string(), "69.25");
        assert_eq!(entries[1].quote.preference, TaxPreference::DirectDebit);
        assert_eq!(format_amount(entries[1].quote.total), "60.00");
    }

    #[test]
    fn inline_vehicle_flags_conflict_with_vehicles_file() {
        for flag in [
            ["--registration", "AB12CDE"],
            ["--co2", "999"],
            ["--engine-cc", "1600"],
            ["--fuel", "Diesel"],
            ["--list-price", "50000"],
        ] {
            let args = ["vedc", "-v", "vehicles.csv", flag[0], flag[1]];
            assert!(QuoteCli::try_parse_from(args).is_err(), "{} accepted", flag[0]);
        }
        assert!(QuoteCli::try_parse_from(["vedc", "-v", "vehicles.csv"]).is_ok());
        assert!(QuoteCli::try_parse_from(["vedc", "-r", "AB12CDE", "--co2", "120"]).is_ok());
    }

    #[test]
    fn invalid_preference_code_is_an_error() {
        let rates = RateTable::embedded().unwrap();
        let result = price_vehicles(
            vec![record("AB12CDE", Some(7))],
            &rates,
            today(),
            TaxPreference::TwelveMonths,
        );
        assert!(result.is_err());
    }

    #[test]
    fn row_shows_missing_values_as_dashes() {
        let rates = RateTable::embedded().unwrap();
        let entries = price_vehicles(
            vec![record("NOPLATE", None)],
            &rates,
            today(),
            TaxPreference::TwelveMonths,
        )
        .unwrap();

        let row = QuoteRow::from(&entries[0]);
        assert_eq!(row.registered, "-");
        assert_eq!(row.six_month, "-");
        assert_eq!(row.total, "50.00");
        assert_eq!(row.reason, "unresolved_registration_date");
        assert!(row.notes.contains("commission only"));
    }
}
