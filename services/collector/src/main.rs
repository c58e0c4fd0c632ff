//! Collector Service - Fetches energy-market statistics and the facility roster
//!
//! Responsibilities:
//! - Fetch monthly retail electricity prices from the EIA API, one request per state
//! - Fetch national generation data from the EIA API (single request)
//! - Emit the static datacenter facility roster
//! - Apply rate limiting between requests to avoid degrading the source API
//! - Write one timestamped raw snapshot file per dataset (never overwrites)
//!
//! Usage:
//!   # All datasets:
//!   cargo run --bin collector
//!
//!   # One dataset:
//!   cargo run --bin collector -- --dataset prices

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;

const EIA_RETAIL_SALES_URL: &str = "https://api.eia.gov/v2/electricity/retail-sales/data/";
const EIA_OPERATIONAL_URL: &str =
    "https://api.eia.gov/v2/electricity/electric-power-operational-data/data/";

/// U.S. state codes (plus DC) used as partition keys for price collection.
const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC",
];

#[derive(Parser, Debug)]
#[command(name = "collector", about = "Collects raw energy-market snapshots")]
struct Args {
    /// Restrict the run to a single dataset
    #[arg(long, value_enum)]
    dataset: Option<Dataset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Dataset {
    Prices,
    Generation,
    Datacenters,
}

impl Args {
    fn wants(&self, dataset: Dataset) -> bool {
        self.dataset.map_or(true, |d| d == dataset)
    }
}

#[derive(Debug, Clone)]
struct Config {
    api_key: String,
    start_period: String,
    end_period: String,
    raw_data_dir: PathBuf,
    rate_limit_ms: u64,
}

impl Config {
    fn from_env() -> Result<Self> {
        Ok(Self {
            api_key: std::env::var("EIA_API_KEY").context("EIA_API_KEY env var missing")?,
            start_period: std::env::var("DATA_START").unwrap_or_else(|_| "2020-01".to_string()),
            end_period: std::env::var("DATA_END").unwrap_or_else(|_| "2024-12".to_string()),
            raw_data_dir: PathBuf::from(
                std::env::var("RAW_DATA_DIR").unwrap_or_else(|_| "./data/raw".to_string()),
            ),
            rate_limit_ms: std::env::var("RATE_LIMIT_MS")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .unwrap_or(500),
        })
    }
}

// =============================================================================
// EIA API Types
// =============================================================================

/// JSON envelope returned by the EIA v2 API. A missing `response.data`
/// key means "no data", not an error.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    response: Option<ApiResponse<T>>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    data: Option<Vec<T>>,
}

impl<T> ApiEnvelope<T> {
    fn into_records(self) -> Vec<T> {
        self.response.and_then(|r| r.data).unwrap_or_default()
    }
}

/// One monthly retail-sales observation. Field names mirror the API so the
/// raw snapshot preserves the upstream schema verbatim.
#[derive(Debug, Deserialize, Serialize)]
struct PriceRecord {
    period: String,
    stateid: String,
    #[serde(rename = "stateDescription")]
    state_description: Option<String>,
    sectorid: Option<String>,
    #[serde(rename = "sectorName")]
    sector_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    price: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    sales: Option<f64>,
    #[serde(rename = "price-units")]
    price_units: Option<String>,
    #[serde(rename = "sales-units")]
    sales_units: Option<String>,
}

/// One monthly generation observation from the operational-data endpoint.
#[derive(Debug, Deserialize, Serialize)]
struct GenerationRecord {
    period: String,
    location: Option<String>,
    sectorid: Option<String>,
    fueltypeid: Option<String>,
    #[serde(rename = "fuelTypeDescription")]
    fuel_type_description: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    generation: Option<f64>,
    #[serde(rename = "generation-units")]
    generation_units: Option<String>,
}

/// The EIA API serializes numeric values as either JSON numbers or strings
/// depending on the series; accept both, and map anything else to null.
fn de_opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(d)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

// =============================================================================
// Facility Roster
// =============================================================================

#[derive(Debug, Serialize)]
struct DatacenterRecord {
    name: &'static str,
    company: &'static str,
    city: &'static str,
    state: &'static str,
    latitude: f64,
    longitude: f64,
    capacity_mw: f64,
    is_ai_focused: bool,
    opening_date: NaiveDate,
    renewable_pct: Option<f64>,
}

fn facility_roster() -> Result<Vec<DatacenterRecord>> {
    let seed: &[(&str, &str, &str, &str, f64, f64, f64, bool, &str, Option<f64>)] = &[
        ("Virginia Data Center 1", "AWS", "Ashburn", "VA", 39.0438, -77.4874, 150.0, true, "2020-06-15", Some(65.0)),
        ("Silicon Valley DC", "Google", "Mountain View", "CA", 37.4220, -122.0841, 120.0, true, "2019-03-20", Some(85.0)),
        ("Texas Mega Center", "Microsoft", "San Antonio", "TX", 29.4241, -98.4936, 200.0, true, "2021-01-10", Some(45.0)),
        ("Oregon Data Hub", "Meta", "Prineville", "OR", 44.2999, -120.8342, 100.0, false, "2018-09-01", Some(90.0)),
        ("Iowa Compute Center", "Google", "Council Bluffs", "IA", 41.2619, -95.8608, 130.0, true, "2020-11-05", Some(95.0)),
        ("Georgia AI Facility", "AWS", "Atlanta", "GA", 33.7490, -84.3880, 110.0, true, "2022-04-15", Some(55.0)),
        ("Illinois Data Complex", "Microsoft", "Chicago", "IL", 41.8781, -87.6298, 95.0, false, "2019-07-22", Some(60.0)),
        ("North Carolina Center", "Apple", "Maiden", "NC", 35.5732, -81.2212, 140.0, false, "2018-12-01", Some(100.0)),
    ];

    seed.iter()
        .map(|&(name, company, city, state, lat, lon, mw, ai, opened, pct)| {
            Ok(DatacenterRecord {
                name,
                company,
                city,
                state,
                latitude: lat,
                longitude: lon,
                capacity_mw: mw,
                is_ai_focused: ai,
                opening_date: NaiveDate::parse_from_str(opened, "%Y-%m-%d")
                    .context("invalid opening_date in facility roster")?,
                renewable_pct: pct,
            })
        })
        .collect()
}

// =============================================================================
// Snapshot Writing
// =============================================================================

/// Serialize rows to CSV and write a timestamped snapshot file. Returns the
/// path and the SHA-256 of the written bytes for provenance.
fn write_snapshot<T: Serialize>(
    dir: &Path,
    prefix: &str,
    timestamp: &str,
    rows: &[T],
) -> Result<(PathBuf, String)> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create snapshot dir {}", dir.display()))?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().context("failed to flush CSV buffer")?;

    let path = dir.join(format!("{}_{}.csv", prefix, timestamp));
    std::fs::write(&path, &bytes)
        .with_context(|| format!("failed to write snapshot {}", path.display()))?;

    let hash = format!("sha256:{:x}", Sha256::digest(&bytes));
    Ok((path, hash))
}

// =============================================================================
// Collection
// =============================================================================

/// Fetch one state's monthly price observations. A single request with a
/// fixed offset/length window; no retry.
async fn fetch_state_prices(
    client: &reqwest::Client,
    config: &Config,
    state: &str,
) -> Result<Vec<PriceRecord>> {
    let envelope: ApiEnvelope<PriceRecord> = client
        .get(EIA_RETAIL_SALES_URL)
        .query(&[
            ("api_key", config.api_key.as_str()),
            ("frequency", "monthly"),
            ("data[0]", "price"),
            ("data[1]", "sales"),
            ("facets[stateid][]", state),
            ("facets[sectorid][]", "ALL"),
            ("start", config.start_period.as_str()),
            ("end", config.end_period.as_str()),
            ("sort[0][column]", "period"),
            ("sort[0][direction]", "asc"),
            ("offset", "0"),
            ("length", "5000"),
        ])
        .send()
        .await?
        .error_for_status()
        .context("HTTP request failed")?
        .json()
        .await
        .context("failed to decode EIA response")?;

    Ok(envelope.into_records())
}

/// Fetch prices for every state. Per-state failures are logged and skipped;
/// the run continues with the remaining partitions.
async fn collect_electricity_prices(
    client: &reqwest::Client,
    config: &Config,
    timestamp: &str,
) -> Result<(usize, usize)> {
    println!("\nCollecting electricity price data ({} states)...", US_STATES.len());

    let mut all_records = Vec::new();
    let mut failed = 0;

    for state in US_STATES {
        sleep(Duration::from_millis(config.rate_limit_ms)).await;

        match fetch_state_prices(client, config, state).await {
            Ok(records) if records.is_empty() => {
                println!("  {} ⚠ no data", state);
            }
            Ok(records) => {
                println!("  {} ✓ {} records", state, records.len());
                all_records.extend(records);
            }
            Err(e) => {
                eprintln!("  {} ✗ {:#}", state, e);
                failed += 1;
            }
        }
    }

    let (path, hash) = write_snapshot(
        &config.raw_data_dir,
        "eia_electricity_prices",
        timestamp,
        &all_records,
    )?;
    println!("Saved {} price records to {}", all_records.len(), path.display());
    println!("  {}", hash);

    Ok((all_records.len(), failed))
}

/// Fetch national generation data in a single request. Failure is logged
/// and non-fatal; the snapshot is simply skipped.
async fn collect_generation(client: &reqwest::Client, config: &Config, timestamp: &str) -> usize {
    println!("\nCollecting generation data...");

    let result: Result<Vec<GenerationRecord>> = async {
        let envelope: ApiEnvelope<GenerationRecord> = client
            .get(EIA_OPERATIONAL_URL)
            .query(&[
                ("api_key", config.api_key.as_str()),
                ("frequency", "monthly"),
                ("data[0]", "generation"),
                ("start", config.start_period.as_str()),
                ("end", config.end_period.as_str()),
                ("sort[0][column]", "period"),
                ("sort[0][direction]", "asc"),
                ("offset", "0"),
                ("length", "5000"),
            ])
            .send()
            .await?
            .error_for_status()
            .context("HTTP request failed")?
            .json()
            .await
            .context("failed to decode EIA response")?;
        Ok(envelope.into_records())
    }
    .await;

    match result {
        Ok(records) if records.is_empty() => {
            println!("  ⚠ no data returned from API");
            0
        }
        Ok(records) => {
            match write_snapshot(&config.raw_data_dir, "eia_generation", timestamp, &records) {
                Ok((path, hash)) => {
                    println!("Saved {} generation records to {}", records.len(), path.display());
                    println!("  {}", hash);
                    records.len()
                }
                Err(e) => {
                    eprintln!("  ✗ failed to write snapshot: {:#}", e);
                    0
                }
            }
        }
        Err(e) => {
            eprintln!("  ✗ {:#}", e);
            0
        }
    }
}

/// Write the static facility roster as a raw snapshot, same handoff shape
/// as the fetched datasets.
fn collect_datacenter_roster(config: &Config, timestamp: &str) -> Result<usize> {
    println!("\nWriting datacenter facility roster...");

    let roster = facility_roster()?;
    let (path, hash) =
        write_snapshot(&config.raw_data_dir, "datacenters_sample", timestamp, &roster)?;
    println!("Saved {} facility records to {}", roster.len(), path.display());
    println!("  {}", hash);

    Ok(roster.len())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let config = Config::from_env()?;

    println!("=== Energy Warehouse Collector ===");
    println!("Period: {} to {}", config.start_period, config.end_period);
    println!("Snapshot dir: {}", config.raw_data_dir.display());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent("energy-warehouse-collector/0.1 (batch ETL; one request per partition)")
        .build()?;

    // One timestamp per run so all snapshots from the same invocation group together.
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();

    let mut price_count = 0;
    let mut price_failures = 0;
    let mut generation_count = 0;
    let mut roster_count = 0;

    if args.wants(Dataset::Prices) {
        let (count, failed) = collect_electricity_prices(&client, &config, &timestamp).await?;
        price_count = count;
        price_failures = failed;
    }

    if args.wants(Dataset::Generation) {
        generation_count = collect_generation(&client, &config, &timestamp).await;
    }

    if args.wants(Dataset::Datacenters) {
        roster_count = collect_datacenter_roster(&config, &timestamp)?;
    }

    println!("\n=== Collection Summary ===");
    if args.wants(Dataset::Prices) {
        println!("Prices: {} records ({} states failed)", price_count, price_failures);
    }
    if args.wants(Dataset::Generation) {
        println!("Generation: {} records", generation_count);
    }
    if args.wants(Dataset::Datacenters) {
        println!("Datacenters: {} records", roster_count);
    }
    println!("Next: cargo run --bin cleaner");

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_with_data() {
        let json = r#"{"response": {"data": [
            {"period": "2023-05", "stateid": "CA", "stateDescription": "California",
             "sectorid": "ALL", "sectorName": "all sectors",
             "price": 22.33, "sales": "12345.6",
             "price-units": "cents per kilowatthour", "sales-units": "million kilowatthours"}
        ]}}"#;

        let envelope: ApiEnvelope<PriceRecord> = serde_json::from_str(json).unwrap();
        let records = envelope.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].stateid, "CA");
        assert_eq!(records[0].price, Some(22.33));
        // String-encoded numbers must decode too.
        assert_eq!(records[0].sales, Some(12345.6));
    }

    #[test]
    fn test_envelope_missing_data_is_empty_not_error() {
        let json = r#"{"response": {}}"#;
        let envelope: ApiEnvelope<PriceRecord> = serde_json::from_str(json).unwrap();
        assert!(envelope.into_records().is_empty());

        let json = r#"{}"#;
        let envelope: ApiEnvelope<PriceRecord> = serde_json::from_str(json).unwrap();
        assert!(envelope.into_records().is_empty());
    }

    #[test]
    fn test_null_price_decodes_to_none() {
        let json = r#"{"response": {"data": [
            {"period": "2023-05", "stateid": "TX", "price": null, "sales": "not a number"}
        ]}}"#;

        let envelope: ApiEnvelope<PriceRecord> = serde_json::from_str(json).unwrap();
        let records = envelope.into_records();
        assert_eq!(records[0].price, None);
        assert_eq!(records[0].sales, None);
    }

    #[test]
    fn test_facility_roster_within_bounds() {
        let roster = facility_roster().unwrap();
        assert_eq!(roster.len(), 8);
        for dc in &roster {
            assert!((24.0..=71.0).contains(&dc.latitude), "{} latitude", dc.name);
            assert!((-180.0..=-66.0).contains(&dc.longitude), "{} longitude", dc.name);
        }
    }

    #[test]
    fn test_snapshot_roundtrip_preserves_headers() {
        let records = vec![PriceRecord {
            period: "2023-05".to_string(),
            stateid: "VA".to_string(),
            state_description: Some("Virginia".to_string()),
            sectorid: Some("ALL".to_string()),
            sector_name: Some("all sectors".to_string()),
            price: Some(12.5),
            sales: None,
            price_units: Some("cents per kilowatthour".to_string()),
            sales_units: None,
        }];

        let mut writer = csv::Writer::from_writer(Vec::new());
        for r in &records {
            writer.serialize(r).unwrap();
        }
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "period,stateid,stateDescription,sectorid,sectorName,price,sales,price-units,sales-units"
        );
    }
}
