//! Verifier Service - Read-only warehouse integrity report
//!
//! Issues count and orphan-detection queries against the warehouse and
//! prints a textual summary for operator inspection. Purely observational:
//! no writes, no auto-repair, and orphans are reported rather than treated
//! as a process failure.
//!
//! Usage:
//!   cargo run --bin verifier

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

#[derive(Debug, Clone)]
struct Config {
    db_url: String,
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
        })
    }
}

async fn count(pool: &PgPool, sql: &str) -> Result<i64> {
    let (n,): (i64,) = sqlx::query_as(sql)
        .fetch_one(pool)
        .await
        .with_context(|| format!("query failed: {}", sql))?;
    Ok(n)
}

async fn report_date_dimension(pool: &PgPool) -> Result<()> {
    let (min_date, max_date, days): (Option<NaiveDate>, Option<NaiveDate>, i64) = sqlx::query_as(
        "SELECT MIN(full_date), MAX(full_date), COUNT(*) FROM dim_date",
    )
    .fetch_one(pool)
    .await
    .context("failed to summarize dim_date")?;

    match (min_date, max_date) {
        (Some(min), Some(max)) => println!("dim_date: {} days ({} to {})", days, min, max),
        _ => println!("dim_date: empty ⚠ (schema initialization has not run)"),
    }
    Ok(())
}

async fn report_datacenters(pool: &PgPool) -> Result<()> {
    let (facilities, companies, states): (i64, i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COUNT(DISTINCT company), COUNT(DISTINCT location_state)
         FROM dim_datacenters",
    )
    .fetch_one(pool)
    .await
    .context("failed to summarize dim_datacenters")?;

    println!(
        "dim_datacenters: {} facilities, {} companies, {} states",
        facilities, companies, states
    );
    Ok(())
}

async fn report_prices(pool: &PgPool) -> Result<()> {
    let (rows, regions, min_price, max_price): (i64, i64, Option<f64>, Option<f64>) =
        sqlx::query_as(
            "SELECT COUNT(*), COUNT(DISTINCT region),
                    MIN(price_cents_per_kwh), MAX(price_cents_per_kwh)
             FROM fact_electricity_prices",
        )
        .fetch_one(pool)
        .await
        .context("failed to summarize fact_electricity_prices")?;

    println!("fact_electricity_prices: {} rows, {} regions", rows, regions);
    if let (Some(min), Some(max)) = (min_price, max_price) {
        println!("  Price range: {:.2}¢ to {:.2}¢ per kWh", min, max);
    }
    Ok(())
}

async fn report_consumption(pool: &PgPool) -> Result<()> {
    let total = count(pool, "SELECT COUNT(*) FROM fact_energy_consumption").await?;
    let estimated = count(
        pool,
        "SELECT COUNT(*) FROM fact_energy_consumption WHERE source = 'estimated'",
    )
    .await?;

    println!("fact_energy_consumption: {} rows ({} estimated)", total, estimated);
    Ok(())
}

/// Left-anti-join orphan checks for every fact -> dimension reference.
async fn report_orphans(pool: &PgPool) -> Result<()> {
    println!("\nChecking referential integrity...");

    let checks: &[(&str, &str)] = &[
        (
            "consumption rows without a datacenter",
            "SELECT COUNT(*) FROM fact_energy_consumption ec
             LEFT JOIN dim_datacenters dc ON ec.datacenter_id = dc.datacenter_id
             WHERE dc.datacenter_id IS NULL",
        ),
        (
            "consumption rows without a date",
            "SELECT COUNT(*) FROM fact_energy_consumption ec
             LEFT JOIN dim_date d ON ec.date_id = d.date_id
             WHERE d.date_id IS NULL",
        ),
        (
            "price rows without a date",
            "SELECT COUNT(*) FROM fact_electricity_prices p
             LEFT JOIN dim_date d ON p.date_id = d.date_id
             WHERE d.date_id IS NULL",
        ),
    ];

    for (label, sql) in checks {
        let orphans = count(pool, sql).await?;
        if orphans == 0 {
            println!("  ✓ No {}", label);
        } else {
            println!("  ⚠ Found {} {}", orphans, label);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    println!("=== Warehouse Integrity Report ===");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .context("Failed to connect to database")?;

    report_date_dimension(&pool).await?;
    report_datacenters(&pool).await?;
    report_prices(&pool).await?;
    report_consumption(&pool).await?;
    report_orphans(&pool).await?;

    println!("\n=== Report Complete ===");

    Ok(())
}
