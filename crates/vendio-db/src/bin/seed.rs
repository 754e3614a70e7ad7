//! # Seed Data Generator
//!
//! Populates the database with demo products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 50 products (default)
//! cargo run -p vendio-db --bin seed
//!
//! # Custom amount and database path
//! cargo run -p vendio-db --bin seed -- --count 200 --db ./vendio_dev.db
//! ```
//!
//! Values are derived from the product index, so runs are reproducible
//! without a random-number dependency.

use chrono::Utc;
use std::env;
use tracing::info;
use uuid::Uuid;
use vendio_core::Product;
use vendio_db::{Database, DbConfig};

/// Base names for generated products.
const PRODUCT_NAMES: &[&str] = &[
    "Walnut Desk",
    "Oak Bookshelf",
    "Linen Armchair",
    "Ceramic Lamp",
    "Wool Rug",
    "Steel Kettle",
    "Glass Carafe",
    "Maple Cutting Board",
    "Cast Iron Pan",
    "Canvas Tote",
    "Leather Journal",
    "Brass Bottle Opener",
    "Cotton Throw",
    "Bamboo Organizer",
    "Stoneware Mug",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 50;
    let mut db_path = String::from("./vendio_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Vendio Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 50)");
                println!("  -d, --db <PATH>    Database file path (default: ./vendio_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(count, db = %db_path, "Seeding products");

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let inventory = db.inventory();

    let now = Utc::now();
    for index in 0..count {
        let name = PRODUCT_NAMES[index % PRODUCT_NAMES.len()];

        let product = Product {
            id: Uuid::new_v4().to_string(),
            title: format!("{} #{}", name, index + 1),
            description: Some(format!("Demo listing for {}", name.to_lowercase())),
            // $4.99 .. $54.49 in 50c steps, index-derived
            price_cents: 499 + (index as i64 % 100) * 50,
            // Roughly one in eight products starts out of stock
            stock_quantity: if index % 8 == 0 { 0 } else { (index as i64 % 40) + 1 },
            sold_quantity: 0,
            created_at: now,
            updated_at: now,
        };

        inventory.insert_product(&product).await?;
    }

    let total = inventory.count().await?;
    info!(total, "Seed complete");

    db.close().await;
    Ok(())
}
