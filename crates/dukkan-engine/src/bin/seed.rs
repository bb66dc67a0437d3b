//! # Seed Data Generator
//!
//! Bootstraps a development database: the three default role accounts
//! and a small demo product set.
//!
//! ## Usage
//! ```bash
//! # Default database path (./dukkan_dev.db)
//! cargo run -p dukkan-engine --bin seed
//!
//! # Specify database path
//! cargo run -p dukkan-engine --bin seed -- --db ./data/store.db
//! ```
//!
//! Default accounts (change the passwords before real use):
//! - manager / 123
//! - seller / 456
//! - warehouse / 789

use std::env;

use chrono::{Duration, Local, NaiveDate};
use tracing_subscriber::EnvFilter;

use dukkan_core::{Money, NewProduct, Role};
use dukkan_db::{Database, DbConfig};
use dukkan_engine::AccessControl;

/// Default accounts: (name, role, password, can_apply_discount).
const DEFAULT_ACCOUNTS: &[(&str, Role, &str, bool)] = &[
    ("manager", Role::Manager, "123", true),
    ("seller", Role::Seller, "456", false),
    ("warehouse", Role::Warehouse, "789", false),
];

/// Demo products: (name, cost_cents, sell_cents, quantity, expires_in_days).
const DEMO_PRODUCTS: &[(&str, i64, i64, i64, Option<i64>)] = &[
    ("Whole Milk 1L", 600, 1000, 40, Some(10)),
    ("Skim Milk 1L", 550, 950, 25, Some(12)),
    ("White Bread", 200, 450, 30, Some(3)),
    ("Eggs Dozen", 800, 1400, 18, Some(20)),
    ("Greek Yogurt", 350, 700, 12, Some(14)),
    ("Olive Oil 750ml", 2200, 3800, 9, None),
    ("Rice 5kg", 1500, 2600, 14, None),
    ("Sugar 1kg", 300, 550, 50, None),
    ("Black Tea 100pk", 900, 1700, 22, None),
    ("Dish Soap", 250, 600, 35, None),
    ("Paper Towels", 400, 850, 16, None),
    ("Tomato Paste", 150, 350, 4, Some(200)),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./dukkan_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Dukkan POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./dukkan_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Dukkan POS Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Default accounts (hashed here; the store never sees a plaintext
    // password column).
    let access = AccessControl::new(db.clone());
    for (name, role, password, can_discount) in DEFAULT_ACCOUNTS {
        access
            .register(name, *role, password, *can_discount)
            .await?;
        println!("✓ Account '{}' ({})", name, role);
    }

    // Demo products
    let today: NaiveDate = Local::now().date_naive();
    let mut created = 0;
    for (name, cost, sell, qty, expires_in) in DEMO_PRODUCTS {
        let expiry = expires_in.map(|days| today + Duration::days(days));
        let new = NewProduct::new(
            name,
            Money::from_cents(*cost),
            Money::from_cents(*sell),
            *qty,
            expiry,
            None,
        )?;
        db.products().insert(&new).await?;
        created += 1;
    }
    println!("✓ {} demo products", created);

    // Show what the expiry/low-stock alerts would say on day one.
    let alerts = db.reports().expiry_alerts(today).await?;
    let low = db.reports().low_stock(dukkan_core::LOW_STOCK_THRESHOLD).await?;
    println!();
    println!("Expiring within 15 days: {}", alerts.len());
    for alert in &alerts {
        println!("  {} — {}", alert.product_name, alert.expiry_date);
    }
    println!("Low stock (≤ {}): {}", dukkan_core::LOW_STOCK_THRESHOLD, low.len());
    for product in &low {
        println!("  {} — {} left", product.name, product.quantity);
    }

    println!();
    println!("✓ Seed complete!");
    Ok(())
}
