//! # Seed Data Generator
//!
//! Populates the database with a small grocery catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p niaga-db --bin seed
//!
//! # Specify database path
//! cargo run -p niaga-db --bin seed -- --db ./data/niaga.db
//!
//! # Also create a sample purchase order
//! cargo run -p niaga-db --bin seed -- --with-orders
//! ```
//!
//! Stock levels are spread so every stock status (Habis, Menipis, Aman)
//! shows up in the product list.

use niaga_core::draft::{DraftAction, OrderDraft};
use niaga_core::{Money, OrderKind, Percentage, ProductStatus, DEFAULT_TAX_RATE_BPS};
use niaga_db::{Database, DbConfig, NewProduct};
use std::env;

/// (category, unit, name, cost, price)
const PRODUCTS: &[(&str, &str, &str, i64, i64)] = &[
    ("Sembako", "karung", "Beras Premium 5kg", 68_000, 75_000),
    ("Sembako", "pcs", "Gula Pasir 1kg", 14_000, 16_500),
    ("Sembako", "botol", "Minyak Goreng 2L", 32_000, 36_000),
    ("Sembako", "pcs", "Tepung Terigu 1kg", 11_000, 13_000),
    ("Sembako", "pcs", "Telur Ayam 1kg", 26_000, 29_000),
    ("Minuman", "botol", "Air Mineral 600ml", 2_500, 3_500),
    ("Minuman", "botol", "Teh Botol 350ml", 3_800, 5_000),
    ("Minuman", "pcs", "Kopi Sachet", 1_200, 1_500),
    ("Minuman", "dus", "Susu UHT 1L", 16_000, 19_000),
    ("Makanan Ringan", "pcs", "Keripik Singkong", 7_000, 9_500),
    ("Makanan Ringan", "pcs", "Biskuit Kelapa", 8_000, 10_000),
    ("Makanan Ringan", "pcs", "Wafer Cokelat", 4_500, 6_000),
    ("Kebutuhan Rumah", "pcs", "Sabun Mandi", 3_500, 4_500),
    ("Kebutuhan Rumah", "botol", "Sampo 170ml", 18_000, 22_000),
    ("Kebutuhan Rumah", "pcs", "Pasta Gigi", 9_000, 11_500),
    ("Kebutuhan Rumah", "botol", "Sabun Cuci Piring", 12_000, 14_500),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./niaga_dev.db");
    let mut with_orders = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--with-orders" => with_orders = true,
            "--help" | "-h" => {
                println!("Niaga Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./niaga_dev.db)");
                println!("      --with-orders  Also create a draft purchase order");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Niaga Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let start = std::time::Instant::now();
    let mut created = Vec::new();

    for (idx, (category, unit, name, cost, price)) in PRODUCTS.iter().enumerate() {
        let category = db.catalog().create_or_get_category(category).await?;
        let unit = db.catalog().create_or_get_unit(unit).await?;

        // Minimum is 5: every fourth product is out, the next one is low.
        let stock = match idx % 4 {
            0 => 0,
            1 => 3,
            _ => 20 + idx as i64 * 5,
        };

        let input = NewProduct {
            code: None,
            name: name.to_string(),
            category_id: Some(category.id),
            unit_id: Some(unit.id),
            price: Money::from_rupiah(*price),
            cost: Money::from_rupiah(*cost),
            stock,
            min_stock: 5,
            status: ProductStatus::Active,
        };

        match db.products().insert(&input).await {
            Ok(product) => {
                println!(
                    "  {} {:<24} stok {:>3} ({})",
                    product.code,
                    product.name,
                    product.stock,
                    product.stock_status()
                );
                created.push(product);
            }
            Err(e) => eprintln!("Failed to insert {}: {}", name, e),
        }
    }

    println!();
    println!("✓ Generated {} products in {:?}", created.len(), start.elapsed());

    if with_orders && created.len() >= 2 {
        let mut draft = OrderDraft::new(OrderKind::Purchase).apply(DraftAction::SetCounterparty {
            counterparty_id: Some("supplier-sembako".to_string()),
        });
        for product in created.iter().take(3) {
            draft = draft.apply(DraftAction::AddItem {
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                product_code: product.code.clone(),
                unit_price: product.cost,
                quantity: 10,
            });
        }

        let order = db
            .orders()
            .create(&draft, Percentage::from_bps(DEFAULT_TAX_RATE_BPS))
            .await?;
        println!("✓ Created purchase order {} ({})", order.order_number, order.total_amount);
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
