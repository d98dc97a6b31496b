//! Rates command - validate and display the rate table

use crate::cmd::{format_amount, RatesArgs};
use clap::Args;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};
use vedc::rates::RatePair;
use vedc::RateTable;

#[derive(Args, Debug)]
pub struct RatesCommand {
    #[command(flatten)]
    rates: RatesArgs,

    /// Output the validated table as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct BandRow {
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "Range")]
    range: String,
    #[tabled(rename = "12 Month (£)")]
    twelve_month: String,
    #[tabled(rename = "6 Month DD (£)")]
    six_month: String,
}

impl BandRow {
    fn new(band: impl Into<String>, range: impl Into<String>, rates: &RatePair) -> Self {
        BandRow {
            band: band.into(),
            range: range.into(),
            twelve_month: format_amount(rates.twelve_month),
            six_month: format_amount(rates.six_month),
        }
    }
}

#[derive(Tabled)]
struct FirstYearRow {
    #[tabled(rename = "CO2 g/km")]
    range: String,
    #[tabled(rename = "Standard (£)")]
    standard: String,
    #[tabled(rename = "Other Diesel (£)")]
    diesel: String,
}

impl RatesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let rates = self.rates.load()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rates)?);
            return Ok(());
        }

        println!("Rate table {}", rates.fingerprint());
        print_tables(&rates);
        Ok(())
    }
}

fn print_tables(rates: &RateTable) {
    let engine: Vec<BandRow> = rates
        .engine_brackets()
        .iter()
        .map(|b| BandRow::new("-", b.label(), &b.rates))
        .collect();
    print_section("Registered before 1 March 2001 (engine size)", Table::new(engine));

    let bands: Vec<BandRow> = rates
        .co2_bands()
        .iter()
        .map(|b| BandRow::new(b.band.clone(), format!("{} g/km", b.range.label()), &b.rates))
        .collect();
    print_section("1 March 2001 to 31 March 2017 (CO2 band)", Table::new(bands));

    let first_year: Vec<FirstYearRow> = rates
        .first_year_brackets()
        .iter()
        .map(|b| FirstYearRow {
            range: b.range.label(),
            standard: format_amount(b.rates.standard),
            diesel: format_amount(b.rates.all_other_diesel),
        })
        .collect();
    print_section("From 1 April 2017, first year", Table::new(first_year));

    let light_goods = rates.light_goods();
    let later = vec![
        BandRow::new("Standard", "second year on", rates.standard_rates()),
        BandRow::new("Luxury", "expensive car supplement", rates.luxury_rates()),
        BandRow::new("TC39", "N1 Euro 6", &light_goods.euro6),
        BandRow::new("TC36", "N1 Euro 4/5", &light_goods.euro5_or_below),
    ];
    print_section("From 1 April 2017, later years and vans", Table::new(later));

    let luxury = rates.luxury_surcharge();
    println!(
        "Expensive car supplement: list price at or above £{} for {} years; zero emission exempt before {}",
        format_amount(luxury.threshold_list_price),
        luxury.applies_for_years,
        luxury.zero_emission_exempt_before
    );
}

fn print_section(title: &str, mut table: Table) {
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..)).with(Alignment::right()));
    println!();
    println!("{}", title);
    println!("{}", table);
}
