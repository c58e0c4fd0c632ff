//! Loader Service - Moves cleaned tables into the warehouse
//!
//! Responsibilities:
//! - Bulk-append the datacenter dimension from the cleaned facility table
//! - Resolve natural dates to surrogate date keys via an in-memory hash-join
//!   against the fully materialized date dimension (no per-row queries)
//! - Bulk-append price facts; rows without a matching date key are excluded
//!   and counted, never loaded with a null key
//! - Generate synthetic monthly consumption estimates, tagged 'estimated'
//! - Verify referential integrity post-load (observational, no auto-repair)
//!
//! The whole run executes inside one transaction: any failure rolls back
//! every table touched by this run and the process exits non-zero. Loads are
//! append-only by default; rerunning against already-loaded files duplicates
//! fact rows. Pass --truncate to clear the owned tables first.
//!
//! Usage:
//!   cargo run --bin loader
//!   cargo run --bin loader -- --dry-run
//!   cargo run --bin loader -- --truncate

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use rand::Rng;
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgConnection;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const PRICES_CLEAN_FILE: &str = "eia_prices_clean.csv";
const DATACENTERS_CLEAN_FILE: &str = "datacenters_clean.csv";

/// Average hours in a month, used for capacity -> energy conversion.
const HOURS_PER_MONTH: f64 = 730.0;

/// Utilization and PUE draw ranges. AI-focused facilities run at higher
/// utilization with better power efficiency.
const AI_UTILIZATION: (f64, f64) = (0.85, 0.95);
const AI_PUE: (f64, f64) = (1.15, 1.30);
const DEFAULT_UTILIZATION: (f64, f64) = (0.70, 0.90);
const DEFAULT_PUE: (f64, f64) = (1.35, 1.60);

#[derive(Parser, Debug)]
#[command(name = "loader", about = "Loads cleaned tables into the warehouse")]
struct Args {
    /// Run every step, then roll back instead of committing
    #[arg(long, default_value = "false")]
    dry_run: bool,

    /// Clear the owned warehouse tables before loading (default is append-only)
    #[arg(long, default_value = "false")]
    truncate: bool,
}

#[derive(Debug, Clone)]
struct Config {
    db_url: String,
    processed_data_dir: PathBuf,
}

impl Config {
    fn from_env() -> Result<Self> {
        let host = std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port = std::env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string());
        let name = std::env::var("DB_NAME").unwrap_or_else(|_| "datacenter_energy".to_string());
        let user = std::env::var("DB_USER").unwrap_or_else(|_| "postgres".to_string());
        let password = std::env::var("DB_PASSWORD").unwrap_or_default();

        Ok(Self {
            db_url: format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, name),
            processed_data_dir: PathBuf::from(
                std::env::var("PROCESSED_DATA_DIR")
                    .unwrap_or_else(|_| "./data/processed".to_string()),
            ),
        })
    }
}

// =============================================================================
// Cleaned Table Types
// =============================================================================

#[derive(Debug, Deserialize)]
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

#[derive(Debug, Clone, Deserialize)]
struct CleanPriceRow {
    date: NaiveDate,
    state: String,
    sector: String,
    price_cents_per_kwh: f64,
    price_per_kwh: f64,
    sales_mwh: f64,
}

/// A price row with its surrogate date key resolved, ready for append.
#[derive(Debug, PartialEq)]
struct ResolvedPriceRow {
    region: String,
    date_id: i32,
    price_per_kwh: f64,
    price_cents_per_kwh: f64,
    sales_mwh: f64,
    sector: String,
}

/// Read a cleaned table. A missing file or a missing required column is
/// fatal for the stage.
fn read_cleaned_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("cleaned file {} not found - run the cleaner first", path.display()))?;

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize().enumerate() {
        let row = result
            .with_context(|| format!("bad row at line {} in {}", idx + 2, path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}

// =============================================================================
// Key Resolution
// =============================================================================

/// Resolve natural dates to surrogate keys via the in-memory date lookup.
/// Rows whose date has no dimension entry are excluded and counted, never
/// emitted with a null key.
fn resolve_date_keys(
    rows: Vec<CleanPriceRow>,
    dates: &HashMap<NaiveDate, i32>,
) -> (Vec<ResolvedPriceRow>, usize) {
    let mut resolved = Vec::with_capacity(rows.len());
    let mut unmatched = 0;

    for row in rows {
        match dates.get(&row.date) {
            Some(&date_id) => resolved.push(ResolvedPriceRow {
                region: row.state,
                date_id,
                price_per_kwh: row.price_per_kwh,
                price_cents_per_kwh: row.price_cents_per_kwh,
                sales_mwh: row.sales_mwh,
                sector: row.sector,
            }),
            None => unmatched += 1,
        }
    }

    (resolved, unmatched)
}

// =============================================================================
// Consumption Estimation
// =============================================================================

#[derive(Debug)]
struct ConsumptionEstimate {
    energy_consumed_mwh: f64,
    renewable_energy_mwh: f64,
    pue_ratio: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Synthesize one month of consumption for a facility. Explicitly a
/// placeholder generator, not a physical model; rows built from this are
/// tagged 'estimated' so they stay distinguishable from observations.
fn estimate_monthly_consumption<R: Rng>(
    capacity_mw: f64,
    is_ai_focused: bool,
    renewable_pct: Option<f64>,
    rng: &mut R,
) -> ConsumptionEstimate {
    let (utilization_range, pue_range) = if is_ai_focused {
        (AI_UTILIZATION, AI_PUE)
    } else {
        (DEFAULT_UTILIZATION, DEFAULT_PUE)
    };

    let utilization = rng.random_range(utilization_range.0..utilization_range.1);
    let pue_ratio = rng.random_range(pue_range.0..pue_range.1);

    let energy = capacity_mw * HOURS_PER_MONTH * utilization;
    let renewable = energy * renewable_pct.unwrap_or(0.0) / 100.0;

    ConsumptionEstimate {
        energy_consumed_mwh: round2(energy),
        renewable_energy_mwh: round2(renewable),
        pue_ratio: round2(pue_ratio),
    }
}

/// First-of-month window the estimates cover.
fn consumption_window() -> Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).context("invalid window start")?;
    let end = NaiveDate::from_ymd_opt(2024, 12, 1).context("invalid window end")?;
    Ok((start, end))
}

// =============================================================================
// Warehouse Operations
// =============================================================================

/// Materialize the full date dimension as natural date -> surrogate key.
async fn load_date_dimension(conn: &mut PgConnection) -> Result<HashMap<NaiveDate, i32>> {
    let rows: Vec<(i32, NaiveDate)> = sqlx::query_as("SELECT date_id, full_date FROM dim_date")
        .fetch_all(&mut *conn)
        .await
        .context("failed to read dim_date")?;

    Ok(rows.into_iter().map(|(id, date)| (date, id)).collect())
}

/// Bulk-append the cleaned facility table into dim_datacenters.
async fn load_datacenters(conn: &mut PgConnection, path: &Path) -> Result<u64> {
    println!("\nLoading datacenters...");

    let rows: Vec<CleanDatacenterRow> = read_cleaned_rows(path)?;
    println!("  Read {} facility rows from {}", rows.len(), path.display());

    let mut names = Vec::with_capacity(rows.len());
    let mut companies = Vec::with_capacity(rows.len());
    let mut cities = Vec::with_capacity(rows.len());
    let mut states = Vec::with_capacity(rows.len());
    let mut latitudes = Vec::with_capacity(rows.len());
    let mut longitudes = Vec::with_capacity(rows.len());
    let mut capacities = Vec::with_capacity(rows.len());
    let mut ai_flags = Vec::with_capacity(rows.len());
    let mut opening_dates = Vec::with_capacity(rows.len());
    let mut renewable_pcts = Vec::with_capacity(rows.len());

    for row in rows {
        names.push(row.name);
        companies.push(row.company);
        cities.push(row.city);
        states.push(row.state);
        latitudes.push(row.latitude);
        longitudes.push(row.longitude);
        capacities.push(row.capacity_mw);
        ai_flags.push(row.is_ai_focused);
        opening_dates.push(row.opening_date);
        renewable_pcts.push(row.renewable_pct);
    }

    let result = sqlx::query(
        r#"
        INSERT INTO dim_datacenters
        (name, company, location_city, location_state, latitude, longitude,
         capacity_mw, is_ai_focused, opening_date, renewable_energy_pct)
        SELECT * FROM UNNEST(
            $1::text[], $2::text[], $3::text[], $4::text[], $5::float8[],
            $6::float8[], $7::float8[], $8::bool[], $9::date[], $10::float8[])
        "#,
    )
    .bind(&names)
    .bind(&companies)
    .bind(&cities)
    .bind(&states)
    .bind(&latitudes)
    .bind(&longitudes)
    .bind(&capacities)
    .bind(&ai_flags)
    .bind(&opening_dates)
    .bind(&renewable_pcts)
    .execute(&mut *conn)
    .await
    .context("failed to append dim_datacenters")?;

    println!("  ✓ Appended {} datacenter rows", result.rows_affected());
    Ok(result.rows_affected())
}

/// Resolve date keys for the cleaned price table and bulk-append the
/// surviving rows into fact_electricity_prices.
async fn load_electricity_prices(
    conn: &mut PgConnection,
    path: &Path,
    dates: &HashMap<NaiveDate, i32>,
) -> Result<(u64, usize)> {
    println!("\nLoading electricity prices...");

    let rows: Vec<CleanPriceRow> = read_cleaned_rows(path)?;
    println!("  Read {} price rows from {}", rows.len(), path.display());

    let (resolved, unmatched) = resolve_date_keys(rows, dates);
    if unmatched > 0 {
        eprintln!("  ⚠ {} records have dates not in dim_date - excluded from load", unmatched);
    }

    let mut regions = Vec::with_capacity(resolved.len());
    let mut date_ids = Vec::with_capacity(resolved.len());
    let mut prices = Vec::with_capacity(resolved.len());
    let mut prices_cents = Vec::with_capacity(resolved.len());
    let mut sales = Vec::with_capacity(resolved.len());
    let mut sectors = Vec::with_capacity(resolved.len());

    for row in resolved {
        regions.push(row.region);
        date_ids.push(row.date_id);
        prices.push(row.price_per_kwh);
        prices_cents.push(row.price_cents_per_kwh);
        sales.push(row.sales_mwh);
        sectors.push(row.sector);
    }

    let result = sqlx::query(
        r#"
        INSERT INTO fact_electricity_prices
        (region, date_id, price_per_kwh, price_cents_per_kwh, sales_mwh, price_type, sector)
        SELECT region, date_id, price_per_kwh, price_cents_per_kwh, sales_mwh, 'retail', sector
        FROM UNNEST($1::text[], $2::int4[], $3::float8[], $4::float8[], $5::float8[], $6::text[])
             AS t(region, date_id, price_per_kwh, price_cents_per_kwh, sales_mwh, sector)
        "#,
    )
    .bind(&regions)
    .bind(&date_ids)
    .bind(&prices)
    .bind(&prices_cents)
    .bind(&sales)
    .bind(&sectors)
    .execute(&mut *conn)
    .await
    .context("failed to append fact_electricity_prices")?;

    println!("  ✓ Appended {} price rows", result.rows_affected());
    Ok((result.rows_affected(), unmatched))
}

#[derive(Debug, sqlx::FromRow)]
struct DatacenterDim {
    datacenter_id: i32,
    capacity_mw: f64,
    is_ai_focused: bool,
    renewable_energy_pct: Option<f64>,
}

/// Cross-product every loaded datacenter with every first-of-month date in
/// the fixed window and append one synthetic estimate per pair.
async fn generate_estimated_consumption(conn: &mut PgConnection) -> Result<u64> {
    println!("\nGenerating estimated energy consumption...");

    let datacenters: Vec<DatacenterDim> = sqlx::query_as(
        "SELECT datacenter_id, capacity_mw, is_ai_focused, renewable_energy_pct
         FROM dim_datacenters ORDER BY datacenter_id",
    )
    .fetch_all(&mut *conn)
    .await
    .context("failed to read dim_datacenters")?;

    let (window_start, window_end) = consumption_window()?;
    let months: Vec<(i32,)> = sqlx::query_as(
        "SELECT date_id FROM dim_date
         WHERE EXTRACT(DAY FROM full_date) = 1 AND full_date BETWEEN $1 AND $2
         ORDER BY full_date",
    )
    .bind(window_start)
    .bind(window_end)
    .fetch_all(&mut *conn)
    .await
    .context("failed to read first-of-month dates")?;

    println!("  {} datacenters x {} months", datacenters.len(), months.len());

    let pairs = datacenters.len() * months.len();
    let mut datacenter_ids = Vec::with_capacity(pairs);
    let mut date_ids = Vec::with_capacity(pairs);
    let mut energies = Vec::with_capacity(pairs);
    let mut renewables = Vec::with_capacity(pairs);
    let mut pues = Vec::with_capacity(pairs);

    let mut rng = rand::rng();
    for dc in &datacenters {
        for &(date_id,) in &months {
            let estimate = estimate_monthly_consumption(
                dc.capacity_mw,
                dc.is_ai_focused,
                dc.renewable_energy_pct,
                &mut rng,
            );
            datacenter_ids.push(dc.datacenter_id);
            date_ids.push(date_id);
            energies.push(estimate.energy_consumed_mwh);
            renewables.push(estimate.renewable_energy_mwh);
            pues.push(estimate.pue_ratio);
        }
    }

    let result = sqlx::query(
        r#"
        INSERT INTO fact_energy_consumption
        (datacenter_id, date_id, energy_consumed_mwh, renewable_energy_mwh, pue_ratio, source)
        SELECT datacenter_id, date_id, energy_consumed_mwh, renewable_energy_mwh, pue_ratio, 'estimated'
        FROM UNNEST($1::int4[], $2::int4[], $3::float8[], $4::float8[], $5::float8[])
             AS t(datacenter_id, date_id, energy_consumed_mwh, renewable_energy_mwh, pue_ratio)
        "#,
    )
    .bind(&datacenter_ids)
    .bind(&date_ids)
    .bind(&energies)
    .bind(&renewables)
    .bind(&pues)
    .execute(&mut *conn)
    .await
    .context("failed to append fact_energy_consumption")?;

    println!("  ✓ Appended {} estimated consumption rows", result.rows_affected());
    Ok(result.rows_affected())
}

#[derive(Debug)]
struct IntegrityReport {
    table_counts: Vec<(&'static str, i64)>,
    orphaned_consumption: i64,
}

/// Post-load check inside the same transaction: table counts plus a
/// left-anti-join for consumption rows whose datacenter key has no
/// dimension row. Observational only, no auto-repair.
async fn verify_integrity(conn: &mut PgConnection) -> Result<IntegrityReport> {
    println!("\nVerifying data integrity...");

    let tables = [
        "dim_datacenters",
        "dim_date",
        "fact_electricity_prices",
        "fact_energy_consumption",
    ];

    let mut table_counts = Vec::new();
    for table in tables {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&mut *conn)
            .await
            .with_context(|| format!("failed to count {}", table))?;
        println!("  {}: {} rows", table, count);
        table_counts.push((table, count));
    }

    let (orphaned_consumption,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM fact_energy_consumption ec
        LEFT JOIN dim_datacenters dc ON ec.datacenter_id = dc.datacenter_id
        WHERE dc.datacenter_id IS NULL
        "#,
    )
    .fetch_one(&mut *conn)
    .await
    .context("failed to run orphan check")?;

    if orphaned_consumption == 0 {
        println!("  ✓ No orphaned energy consumption rows");
    } else {
        println!("  ⚠ Found {} orphaned energy consumption rows", orphaned_consumption);
    }

    Ok(IntegrityReport { table_counts, orphaned_consumption })
}

// =============================================================================
// Run Orchestration
// =============================================================================

#[derive(Debug)]
struct LoadSummary {
    datacenters: u64,
    prices: u64,
    prices_unmatched: usize,
    consumption: u64,
    integrity: IntegrityReport,
}

async fn run_load(conn: &mut PgConnection, args: &Args, config: &Config) -> Result<LoadSummary> {
    if args.truncate {
        println!("\nClearing warehouse tables (--truncate)...");
        // Fact tables first, then the dimension they reference. dim_date is
        // owned by schema initialization and is never cleared here.
        for table in ["fact_energy_consumption", "fact_electricity_prices", "dim_datacenters"] {
            sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&mut *conn)
                .await
                .with_context(|| format!("failed to clear {}", table))?;
        }
        println!("  ✓ Cleared");
    }

    let datacenters =
        load_datacenters(conn, &config.processed_data_dir.join(DATACENTERS_CLEAN_FILE)).await?;

    let dates = load_date_dimension(conn).await?;
    let (prices, prices_unmatched) = load_electricity_prices(
        conn,
        &config.processed_data_dir.join(PRICES_CLEAN_FILE),
        &dates,
    )
    .await?;

    let consumption = generate_estimated_consumption(conn).await?;
    let integrity = verify_integrity(conn).await?;

    Ok(LoadSummary { datacenters, prices, prices_unmatched, consumption, integrity })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let config = Config::from_env()?;

    println!("=== Energy Warehouse Loader ===");
    println!("Processed dir: {}", config.processed_data_dir.display());
    println!("Mode: {}", if args.dry_run { "dry-run" } else { "live" });

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .context("Failed to connect to database")?;

    // The schema (including full date-dimension population) is owned by an
    // external initialization step; make that assumption an explicit check.
    let (date_rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM dim_date")
        .fetch_one(&pool)
        .await
        .context("failed to read dim_date")?;
    if date_rows == 0 {
        anyhow::bail!("dim_date is empty - run warehouse schema initialization first");
    }

    let mut tx = pool.begin().await.context("failed to open load transaction")?;

    let result = run_load(&mut tx, &args, &config).await;

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            tx.rollback().await.ok();
            eprintln!("\n✗ Load failed - this run's writes were rolled back");
            return Err(e);
        }
    };

    if args.dry_run {
        tx.rollback().await.context("failed to roll back dry run")?;
        println!("\nDry run - transaction rolled back, no rows committed");
    } else {
        tx.commit().await.context("failed to commit load transaction")?;
    }

    println!("\n=== Load Summary ===");
    println!("Datacenters appended: {}", summary.datacenters);
    println!("Price rows appended: {} ({} excluded, no date key)", summary.prices, summary.prices_unmatched);
    println!("Consumption rows generated: {}", summary.consumption);
    for (table, count) in &summary.integrity.table_counts {
        println!("{}: {} rows", table, count);
    }
    println!("Orphaned consumption rows: {}", summary.integrity.orphaned_consumption);

    Ok(())
}

// =============================================================================
// TESTS - key resolution and estimate synthesis are pure and tested here
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn price_row(d: NaiveDate) -> CleanPriceRow {
        CleanPriceRow {
            date: d,
            state: "VA".to_string(),
            sector: "all".to_string(),
            price_cents_per_kwh: 12.5,
            price_per_kwh: 0.125,
            sales_mwh: 900.0,
        }
    }

    // -------------------------------------------------------------------------
    // DATE KEY RESOLUTION
    // -------------------------------------------------------------------------

    #[test]
    fn test_resolve_matches_surrogate_key() {
        let mut dates = HashMap::new();
        dates.insert(date(2023, 5, 1), 1217);

        let (resolved, unmatched) = resolve_date_keys(vec![price_row(date(2023, 5, 1))], &dates);
        assert_eq!(unmatched, 0);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].date_id, 1217);
        assert_eq!(resolved[0].region, "VA");
    }

    #[test]
    fn test_resolve_excludes_unmatched_dates() {
        let mut dates = HashMap::new();
        dates.insert(date(2023, 5, 1), 1217);

        let rows = vec![price_row(date(2023, 5, 1)), price_row(date(1999, 1, 1))];
        let (resolved, unmatched) = resolve_date_keys(rows, &dates);
        // The unmatched row is excluded entirely, never emitted with a null key.
        assert_eq!(resolved.len(), 1);
        assert_eq!(unmatched, 1);
    }

    #[test]
    fn test_resolve_empty_dimension_excludes_everything() {
        let dates = HashMap::new();
        let (resolved, unmatched) = resolve_date_keys(vec![price_row(date(2023, 5, 1))], &dates);
        assert!(resolved.is_empty());
        assert_eq!(unmatched, 1);
    }

    #[test]
    fn test_resolve_preserves_measures() {
        let mut dates = HashMap::new();
        dates.insert(date(2023, 5, 1), 7);

        let (resolved, _) = resolve_date_keys(vec![price_row(date(2023, 5, 1))], &dates);
        assert_eq!(resolved[0].price_cents_per_kwh, 12.5);
        assert_eq!(resolved[0].price_per_kwh, 0.125);
        assert_eq!(resolved[0].sales_mwh, 900.0);
        assert_eq!(resolved[0].sector, "all");
    }

    // -------------------------------------------------------------------------
    // CONSUMPTION ESTIMATION
    // -------------------------------------------------------------------------

    #[test]
    fn test_ai_estimate_within_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let estimate = estimate_monthly_consumption(100.0, true, Some(50.0), &mut rng);
            // 100 MW * 730 h * [0.85, 0.95)
            assert!(estimate.energy_consumed_mwh >= 62050.0);
            assert!(estimate.energy_consumed_mwh <= 69350.0);
            assert!(estimate.pue_ratio >= 1.15 && estimate.pue_ratio <= 1.30);
        }
    }

    #[test]
    fn test_default_estimate_within_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let estimate = estimate_monthly_consumption(100.0, false, None, &mut rng);
            // 100 MW * 730 h * [0.70, 0.90)
            assert!(estimate.energy_consumed_mwh >= 51100.0);
            assert!(estimate.energy_consumed_mwh <= 65700.0);
            assert!(estimate.pue_ratio >= 1.35 && estimate.pue_ratio <= 1.60);
        }
    }

    #[test]
    fn test_missing_renewable_pct_means_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let estimate = estimate_monthly_consumption(150.0, true, None, &mut rng);
        assert_eq!(estimate.renewable_energy_mwh, 0.0);
    }

    #[test]
    fn test_renewable_share_of_energy() {
        let mut rng = StdRng::seed_from_u64(1);
        let estimate = estimate_monthly_consumption(150.0, false, Some(40.0), &mut rng);
        let expected = estimate.energy_consumed_mwh * 0.4;
        // Both values round to 2 decimals independently.
        assert!((estimate.renewable_energy_mwh - expected).abs() < 0.5);
    }

    #[test]
    fn test_estimates_rounded_to_cents() {
        let mut rng = StdRng::seed_from_u64(3);
        let estimate = estimate_monthly_consumption(123.45, true, Some(33.3), &mut rng);
        for value in [estimate.energy_consumed_mwh, estimate.renewable_energy_mwh, estimate.pue_ratio] {
            assert_eq!(round2(value), value);
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.005), 1.0);
        assert_eq!(round2(1.015), 1.01);
        assert_eq!(round2(62050.4567), 62050.46);
    }

    #[test]
    fn test_consumption_window_is_five_years_of_months() {
        let (start, end) = consumption_window().unwrap();
        assert_eq!(start, date(2020, 1, 1));
        assert_eq!(end, date(2024, 12, 1));
    }
}
