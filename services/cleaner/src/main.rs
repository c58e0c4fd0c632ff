//! Cleaner Service - Transforms raw snapshots into canonical cleaned tables
//!
//! Responsibilities:
//! - Locate the most recent raw snapshot per dataset (fails if none exists)
//! - Rename fields to the canonical schema
//! - Drop rows with nulls in required numeric fields
//! - Apply domain-range filters (price bounds, geographic bounds)
//! - Clamp out-of-range percentages rather than dropping them
//! - Normalize units (cents -> dollars)
//! - Emit a plain-text data quality report for operator inspection
//!
//! CRITICAL: This stage must be DETERMINISTIC
//! Same raw snapshot = byte-identical cleaned output
//!
//! Usage:
//!   cargo run --bin cleaner
//!   cargo run --bin cleaner -- --dataset prices

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

const PRICES_SNAPSHOT_PREFIX: &str = "eia_electricity_prices_";
const DATACENTERS_SNAPSHOT_PREFIX: &str = "datacenters_";
const PRICES_CLEAN_FILE: &str = "eia_prices_clean.csv";
const DATACENTERS_CLEAN_FILE: &str = "datacenters_clean.csv";
const QUALITY_REPORT_FILE: &str = "data_quality_report.txt";

/// Retail price sanity bounds, cents per kWh.
const PRICE_MIN_CENTS: f64 = 1.0;
const PRICE_MAX_CENTS: f64 = 100.0;

/// Continental US plus territories bounding box.
const LAT_MIN: f64 = 24.0;
const LAT_MAX: f64 = 71.0;
const LON_MIN: f64 = -180.0;
const LON_MAX: f64 = -66.0;

/// U.S. state codes (plus DC); price rows from any other region are dropped.
const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC",
];

#[derive(Parser, Debug)]
#[command(name = "cleaner", about = "Cleans raw snapshots into canonical tables")]
struct Args {
    /// Restrict the run to a single dataset
    #[arg(long, value_enum)]
    dataset: Option<Dataset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Dataset {
    Prices,
    Datacenters,
}

impl Args {
    fn wants(&self, dataset: Dataset) -> bool {
        self.dataset.map_or(true, |d| d == dataset)
    }
}

#[derive(Debug, Clone)]
struct Config {
    raw_data_dir: PathBuf,
    processed_data_dir: PathBuf,
}

impl Config {
    fn from_env() -> Result<Self> {
        Ok(Self {
            raw_data_dir: PathBuf::from(
                std::env::var("RAW_DATA_DIR").unwrap_or_else(|_| "./data/raw".to_string()),
            ),
            processed_data_dir: PathBuf::from(
                std::env::var("PROCESSED_DATA_DIR")
                    .unwrap_or_else(|_| "./data/processed".to_string()),
            ),
        })
    }
}

// =============================================================================
// Row Types
// =============================================================================

/// Raw price row as written by the collector; extra snapshot columns are ignored.
#[derive(Debug, Deserialize)]
struct RawPriceRow {
    period: String,
    stateid: String,
    #[serde(rename = "sectorName")]
    sector_name: Option<String>,
    price: Option<f64>,
    sales: Option<f64>,
}

/// Canonical cleaned price row.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct CleanPriceRow {
    date: NaiveDate,
    state: String,
    sector: String,
    price_cents_per_kwh: f64,
    price_per_kwh: f64,
    sales_mwh: f64,
}

/// Raw facility row as written by the collector.
#[derive(Debug, Deserialize)]
struct RawDatacenterRow {
    name: String,
    company: String,
    city: String,
    state: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    capacity_mw: Option<f64>,
    is_ai_focused: bool,
    opening_date: NaiveDate,
    renewable_pct: Option<f64>,
}

/// Canonical cleaned facility row.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct CleanDatacenterRow {
    name: String,
    company: String,
    city: String,
    state: String,
    latitude: f64,
    longitude: f64,
    capacity_mw: f64,
    is_ai_focused: bool,
    opening_date: NaiveDate,
    renewable_pct: Option<f64>,
}

// =============================================================================
// Snapshot Location
// =============================================================================

/// Pick the most recent snapshot name. Timestamped names sort
/// chronologically, so the lexicographic maximum is the latest; this keeps
/// stage output independent of filesystem metadata.
fn pick_latest<'a>(names: &'a [String], prefix: &str) -> Option<&'a String> {
    names
        .iter()
        .filter(|n| n.starts_with(prefix) && n.ends_with(".csv"))
        .max()
}

/// Locate the most recent raw snapshot matching a dataset prefix.
fn latest_snapshot(dir: &Path, prefix: &str) -> Result<PathBuf> {
    let names: Vec<String> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read snapshot dir {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();

    let latest = pick_latest(&names, prefix).with_context(|| {
        format!("no raw snapshot matching {}*.csv found in {}", prefix, dir.display())
    })?;

    Ok(dir.join(latest))
}

// =============================================================================
// Cleaning Rules
// =============================================================================

#[derive(Debug, Default, PartialEq)]
struct PriceCleanStats {
    input: usize,
    dropped_null: usize,
    dropped_date: usize,
    dropped_range: usize,
    dropped_region: usize,
}

fn parse_period(period: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", period.trim()), "%Y-%m-%d").ok()
}

/// Apply the full price cleaning pipeline: null drops, period parsing,
/// range filter, region filter, unit normalization.
/// This function is DETERMINISTIC: same input = same output.
fn clean_price_rows(raw: Vec<RawPriceRow>) -> (Vec<CleanPriceRow>, PriceCleanStats) {
    let mut stats = PriceCleanStats { input: raw.len(), ..Default::default() };
    let mut clean = Vec::new();

    for row in raw {
        let (price_cents, sales) = match (row.price, row.sales) {
            (Some(p), Some(s)) => (p, s),
            _ => {
                stats.dropped_null += 1;
                continue;
            }
        };

        let date = match parse_period(&row.period) {
            Some(d) => d,
            None => {
                stats.dropped_date += 1;
                continue;
            }
        };

        if !(PRICE_MIN_CENTS..=PRICE_MAX_CENTS).contains(&price_cents) {
            stats.dropped_range += 1;
            continue;
        }

        let state = row.stateid.trim().to_uppercase();
        if !US_STATES.contains(&state.as_str()) {
            stats.dropped_region += 1;
            continue;
        }

        let sector = row
            .sector_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("all")
            .to_string();

        clean.push(CleanPriceRow {
            date,
            state,
            sector,
            price_cents_per_kwh: price_cents,
            price_per_kwh: price_cents / 100.0,
            sales_mwh: sales,
        });
    }

    (clean, stats)
}

#[derive(Debug, Default, PartialEq)]
struct DatacenterCleanStats {
    input: usize,
    dropped_null: usize,
    dropped_geo: usize,
    clamped_pct: usize,
}

/// Apply the facility cleaning pipeline: state normalization, geographic
/// bounds filter, percentage clamping.
fn clean_datacenter_rows(
    raw: Vec<RawDatacenterRow>,
) -> (Vec<CleanDatacenterRow>, DatacenterCleanStats) {
    let mut stats = DatacenterCleanStats { input: raw.len(), ..Default::default() };
    let mut clean = Vec::new();

    for row in raw {
        let (latitude, longitude, capacity_mw) =
            match (row.latitude, row.longitude, row.capacity_mw) {
                (Some(lat), Some(lon), Some(mw)) => (lat, lon, mw),
                _ => {
                    stats.dropped_null += 1;
                    continue;
                }
            };

        if !(LAT_MIN..=LAT_MAX).contains(&latitude) || !(LON_MIN..=LON_MAX).contains(&longitude) {
            stats.dropped_geo += 1;
            continue;
        }

        // Out-of-range percentages are clamped, not dropped.
        let renewable_pct = row.renewable_pct.map(|pct| {
            let clamped = pct.clamp(0.0, 100.0);
            if clamped != pct {
                stats.clamped_pct += 1;
            }
            clamped
        });

        clean.push(CleanDatacenterRow {
            name: row.name,
            company: row.company,
            city: row.city,
            state: row.state.trim().to_uppercase(),
            latitude,
            longitude,
            capacity_mw,
            is_ai_focused: row.is_ai_focused,
            opening_date: row.opening_date,
            renewable_pct,
        });
    }

    (clean, stats)
}

// =============================================================================
// CSV I/O
// =============================================================================

/// Read raw rows, skipping malformed lines with an aggregate warning count.
fn read_raw_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<(Vec<T>, usize)> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open raw snapshot {}", path.display()))?;

    let mut rows = Vec::new();
    let mut skipped = 0;
    for result in reader.deserialize() {
        match result {
            Ok(row) => rows.push(row),
            Err(_) => skipped += 1,
        }
    }

    Ok((rows, skipped))
}

fn write_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.into_inner().context("failed to flush CSV buffer")
}

fn write_clean_file<T: Serialize>(dir: &Path, name: &str, rows: &[T]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output dir {}", dir.display()))?;
    let path = dir.join(name);
    let bytes = write_csv(rows)?;
    std::fs::write(&path, bytes)
        .with_context(|| format!("failed to write cleaned file {}", path.display()))?;
    Ok(path)
}

// =============================================================================
// Stage Runners
// =============================================================================

fn clean_prices(config: &Config) -> Result<usize> {
    println!("\nCleaning electricity price data...");

    let snapshot = latest_snapshot(&config.raw_data_dir, PRICES_SNAPSHOT_PREFIX)?;
    println!("  Raw snapshot: {}", snapshot.display());

    let (raw, malformed): (Vec<RawPriceRow>, usize) = read_raw_rows(&snapshot)?;
    println!("  Loaded {} records", raw.len());
    if malformed > 0 {
        eprintln!("  ⚠ skipped {} malformed lines", malformed);
    }

    let (clean, stats) = clean_price_rows(raw);
    println!("  Removed {} records with missing values", stats.dropped_null);
    if stats.dropped_date > 0 {
        println!("  Removed {} records with unparseable periods", stats.dropped_date);
    }
    println!(
        "  Removed {} records outside {:.0}-{:.0} cents/kWh",
        stats.dropped_range, PRICE_MIN_CENTS, PRICE_MAX_CENTS
    );
    if stats.dropped_region > 0 {
        println!("  Removed {} records from unknown regions", stats.dropped_region);
    }
    println!("  {} of {} records survived cleaning", clean.len(), stats.input);

    let path = write_clean_file(&config.processed_data_dir, PRICES_CLEAN_FILE, &clean)?;
    println!("  ✓ Saved {} clean records to {}", clean.len(), path.display());

    Ok(clean.len())
}

fn clean_datacenters(config: &Config) -> Result<usize> {
    println!("\nCleaning datacenter data...");

    let snapshot = latest_snapshot(&config.raw_data_dir, DATACENTERS_SNAPSHOT_PREFIX)?;
    println!("  Raw snapshot: {}", snapshot.display());

    let (raw, malformed): (Vec<RawDatacenterRow>, usize) = read_raw_rows(&snapshot)?;
    println!("  Loaded {} records", raw.len());
    if malformed > 0 {
        eprintln!("  ⚠ skipped {} malformed lines", malformed);
    }

    let (clean, stats) = clean_datacenter_rows(raw);
    if stats.dropped_null > 0 {
        println!("  Removed {} records with missing values", stats.dropped_null);
    }
    println!("  Removed {} records outside geographic bounds", stats.dropped_geo);
    if stats.clamped_pct > 0 {
        println!("  Clamped {} renewable percentages into [0, 100]", stats.clamped_pct);
    }
    println!("  {} of {} records survived cleaning", clean.len(), stats.input);

    let path = write_clean_file(&config.processed_data_dir, DATACENTERS_CLEAN_FILE, &clean)?;
    println!("  ✓ Saved {} clean records to {}", clean.len(), path.display());

    Ok(clean.len())
}

// =============================================================================
// Quality Report
// =============================================================================

#[derive(Debug, Default, PartialEq)]
struct FileQuality {
    rows: usize,
    columns: usize,
    missing: usize,
    duplicates: usize,
}

fn file_quality_from_reader<R: Read>(reader: R) -> Result<FileQuality> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let columns = csv_reader.headers()?.len();

    let mut quality = FileQuality { columns, ..Default::default() };
    let mut seen: HashMap<String, usize> = HashMap::new();

    for record in csv_reader.records() {
        let record = record?;
        quality.rows += 1;
        quality.missing += record.iter().filter(|f| f.is_empty()).count();

        let key = record.iter().collect::<Vec<_>>().join("\u{1f}");
        let count = seen.entry(key).or_insert(0);
        *count += 1;
        if *count > 1 {
            quality.duplicates += 1;
        }
    }

    Ok(quality)
}

/// Build the operator-facing quality report over the cleaned files.
/// Plain text, not consumed programmatically downstream.
fn quality_report(processed_dir: &Path) -> Result<String> {
    let mut report = String::new();
    report.push_str(&"=".repeat(60));
    report.push_str("\nDATA QUALITY REPORT\n");
    report.push_str(&"=".repeat(60));

    for name in [PRICES_CLEAN_FILE, DATACENTERS_CLEAN_FILE] {
        let path = processed_dir.join(name);
        if !path.exists() {
            continue;
        }
        let file = std::fs::File::open(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let quality = file_quality_from_reader(file)?;

        report.push_str(&format!("\n\n{}:\n", name));
        report.push_str(&format!("  Rows: {}\n", quality.rows));
        report.push_str(&format!("  Columns: {}\n", quality.columns));
        report.push_str(&format!("  Missing values: {}\n", quality.missing));
        report.push_str(&format!("  Duplicate rows: {}", quality.duplicates));
    }

    report.push('\n');
    report.push_str(&"=".repeat(60));
    Ok(report)
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let config = Config::from_env()?;

    println!("=== Energy Warehouse Cleaner ===");
    println!("Raw dir: {}", config.raw_data_dir.display());
    println!("Processed dir: {}", config.processed_data_dir.display());

    let mut price_count = 0;
    let mut datacenter_count = 0;

    if args.wants(Dataset::Prices) {
        price_count = clean_prices(&config)?;
    }
    if args.wants(Dataset::Datacenters) {
        datacenter_count = clean_datacenters(&config)?;
    }

    let report = quality_report(&config.processed_data_dir)?;
    println!("\n{}", report);
    let report_path = config.processed_data_dir.join(QUALITY_REPORT_FILE);
    std::fs::write(&report_path, &report)
        .with_context(|| format!("failed to write {}", report_path.display()))?;

    println!("\n=== Cleaning Summary ===");
    if args.wants(Dataset::Prices) {
        println!("Prices: {} clean records", price_count);
    }
    if args.wants(Dataset::Datacenters) {
        println!("Datacenters: {} clean records", datacenter_count);
    }
    println!("Next: cargo run --bin loader");

    Ok(())
}

// =============================================================================
// TESTS - cleaning must be deterministic and enforce every range rule
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn price_row(period: &str, state: &str, price: Option<f64>, sales: Option<f64>) -> RawPriceRow {
        RawPriceRow {
            period: period.to_string(),
            stateid: state.to_string(),
            sector_name: Some("all sectors".to_string()),
            price,
            sales,
        }
    }

    fn dc_row(lat: f64, lon: f64, pct: Option<f64>) -> RawDatacenterRow {
        RawDatacenterRow {
            name: "Test DC".to_string(),
            company: "TestCo".to_string(),
            city: "Testville".to_string(),
            state: "va".to_string(),
            latitude: Some(lat),
            longitude: Some(lon),
            capacity_mw: Some(100.0),
            is_ai_focused: true,
            opening_date: NaiveDate::from_ymd_opt(2020, 6, 15).unwrap(),
            renewable_pct: pct,
        }
    }

    // -------------------------------------------------------------------------
    // PRICE CLEANING TESTS
    // -------------------------------------------------------------------------

    #[test]
    fn test_price_in_range_kept() {
        let (clean, stats) = clean_price_rows(vec![price_row("2023-05", "VA", Some(12.5), Some(900.0))]);
        assert_eq!(clean.len(), 1);
        assert_eq!(stats.dropped_range, 0);
        assert_eq!(clean[0].date, NaiveDate::from_ymd_opt(2023, 5, 1).unwrap());
        assert_eq!(clean[0].state, "VA");
        assert_eq!(clean[0].sales_mwh, 900.0);
    }

    #[test]
    fn test_price_out_of_range_dropped() {
        let raw = vec![
            price_row("2023-05", "VA", Some(0.5), Some(1.0)),
            price_row("2023-05", "VA", Some(150.0), Some(1.0)),
            price_row("2023-05", "VA", Some(1.0), Some(1.0)),
            price_row("2023-05", "VA", Some(100.0), Some(1.0)),
        ];
        let (clean, stats) = clean_price_rows(raw);
        // Bounds are inclusive.
        assert_eq!(clean.len(), 2);
        assert_eq!(stats.dropped_range, 2);
    }

    #[test]
    fn test_price_unit_normalization_exact() {
        let (clean, _) = clean_price_rows(vec![price_row("2023-05", "CA", Some(22.33), Some(1.0))]);
        assert_eq!(clean[0].price_cents_per_kwh, 22.33);
        assert_eq!(clean[0].price_per_kwh, 22.33 / 100.0);
    }

    #[test]
    fn test_null_price_or_sales_dropped() {
        let raw = vec![
            price_row("2023-05", "VA", None, Some(1.0)),
            price_row("2023-05", "VA", Some(10.0), None),
        ];
        let (clean, stats) = clean_price_rows(raw);
        assert!(clean.is_empty());
        assert_eq!(stats.dropped_null, 2);
    }

    #[test]
    fn test_unknown_region_dropped() {
        let raw = vec![
            price_row("2023-05", "ZZ", Some(10.0), Some(1.0)),
            price_row("2023-05", "tx", Some(10.0), Some(1.0)),
        ];
        let (clean, stats) = clean_price_rows(raw);
        // Lowercase codes normalize; unknown codes drop.
        assert_eq!(clean.len(), 1);
        assert_eq!(clean[0].state, "TX");
        assert_eq!(stats.dropped_region, 1);
    }

    #[test]
    fn test_unparseable_period_dropped() {
        let raw = vec![
            price_row("not-a-date", "VA", Some(10.0), Some(1.0)),
            price_row("2023-13", "VA", Some(10.0), Some(1.0)),
        ];
        let (clean, stats) = clean_price_rows(raw);
        assert!(clean.is_empty());
        assert_eq!(stats.dropped_date, 2);
    }

    #[test]
    fn test_missing_sector_defaults_to_all() {
        let mut row = price_row("2023-05", "VA", Some(10.0), Some(1.0));
        row.sector_name = None;
        let (clean, _) = clean_price_rows(vec![row]);
        assert_eq!(clean[0].sector, "all");
    }

    // -------------------------------------------------------------------------
    // DATACENTER CLEANING TESTS
    // -------------------------------------------------------------------------

    #[test]
    fn test_latitude_out_of_bounds_dropped() {
        let raw = vec![dc_row(10.0, -77.0, Some(50.0)), dc_row(39.0, -77.0, Some(50.0))];
        let (clean, stats) = clean_datacenter_rows(raw);
        assert_eq!(clean.len(), 1);
        assert_eq!(stats.dropped_geo, 1);
        assert_eq!(clean[0].latitude, 39.0);
    }

    #[test]
    fn test_longitude_out_of_bounds_dropped() {
        let raw = vec![dc_row(39.0, -50.0, None), dc_row(39.0, 120.0, None)];
        let (clean, stats) = clean_datacenter_rows(raw);
        assert!(clean.is_empty());
        assert_eq!(stats.dropped_geo, 2);
    }

    #[test]
    fn test_renewable_pct_clamped_not_dropped() {
        let raw = vec![dc_row(39.0, -77.0, Some(150.0)), dc_row(39.0, -77.0, Some(-5.0))];
        let (clean, stats) = clean_datacenter_rows(raw);
        assert_eq!(clean.len(), 2);
        assert_eq!(clean[0].renewable_pct, Some(100.0));
        assert_eq!(clean[1].renewable_pct, Some(0.0));
        assert_eq!(stats.clamped_pct, 2);
    }

    #[test]
    fn test_missing_renewable_pct_stays_missing() {
        let (clean, stats) = clean_datacenter_rows(vec![dc_row(39.0, -77.0, None)]);
        assert_eq!(clean[0].renewable_pct, None);
        assert_eq!(stats.clamped_pct, 0);
    }

    #[test]
    fn test_state_uppercased_and_trimmed() {
        let mut row = dc_row(39.0, -77.0, None);
        row.state = " va ".to_string();
        let (clean, _) = clean_datacenter_rows(vec![row]);
        assert_eq!(clean[0].state, "VA");
    }

    #[test]
    fn test_missing_coordinates_dropped() {
        let mut row = dc_row(39.0, -77.0, None);
        row.latitude = None;
        let (clean, stats) = clean_datacenter_rows(vec![row]);
        assert!(clean.is_empty());
        assert_eq!(stats.dropped_null, 1);
    }

    // -------------------------------------------------------------------------
    // DETERMINISM TESTS
    // -------------------------------------------------------------------------

    #[test]
    fn test_cleaned_output_byte_identical() {
        let raw = || {
            vec![
                price_row("2023-05", "VA", Some(12.5), Some(900.0)),
                price_row("2023-06", "CA", Some(22.0), Some(1200.0)),
                price_row("2023-06", "ZZ", Some(22.0), Some(1200.0)),
            ]
        };

        let (clean_a, _) = clean_price_rows(raw());
        let (clean_b, _) = clean_price_rows(raw());
        let bytes_a = write_csv(&clean_a).unwrap();
        let bytes_b = write_csv(&clean_b).unwrap();
        assert_eq!(bytes_a, bytes_b);
    }

    #[test]
    fn test_clean_price_csv_header() {
        let (clean, _) = clean_price_rows(vec![price_row("2023-05", "VA", Some(12.5), Some(900.0))]);
        let bytes = write_csv(&clean).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text.lines().next().unwrap(),
            "date,state,sector,price_cents_per_kwh,price_per_kwh,sales_mwh"
        );
        assert!(text.lines().nth(1).unwrap().starts_with("2023-05-01,VA,"));
    }

    // -------------------------------------------------------------------------
    // SNAPSHOT SELECTION TESTS
    // -------------------------------------------------------------------------

    #[test]
    fn test_pick_latest_by_timestamp() {
        let names = vec![
            "eia_electricity_prices_20240101_080000.csv".to_string(),
            "eia_electricity_prices_20240301_080000.csv".to_string(),
            "eia_electricity_prices_20240201_080000.csv".to_string(),
            "datacenters_sample_20240401_080000.csv".to_string(),
            "notes.txt".to_string(),
        ];
        assert_eq!(
            pick_latest(&names, PRICES_SNAPSHOT_PREFIX).unwrap(),
            "eia_electricity_prices_20240301_080000.csv"
        );
    }

    #[test]
    fn test_pick_latest_none_when_no_match() {
        let names = vec!["datacenters_sample_20240401_080000.csv".to_string()];
        assert_eq!(pick_latest(&names, PRICES_SNAPSHOT_PREFIX), None);
    }

    // -------------------------------------------------------------------------
    // QUALITY REPORT TESTS
    // -------------------------------------------------------------------------

    #[test]
    fn test_file_quality_counts() {
        let csv = "a,b,c\n1,2,3\n1,2,3\n4,,6\n";
        let quality = file_quality_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(quality.rows, 3);
        assert_eq!(quality.columns, 3);
        assert_eq!(quality.missing, 1);
        assert_eq!(quality.duplicates, 1);
    }

    #[test]
    fn test_file_quality_empty_file() {
        let csv = "a,b,c\n";
        let quality = file_quality_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(quality.rows, 0);
        assert_eq!(quality.duplicates, 0);
    }
}
