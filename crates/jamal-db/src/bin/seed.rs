//! # Seed Data Generator
//!
//! Populates the database with demo data for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p jamal-db --bin seed
//!
//! # Specify database path
//! cargo run -p jamal-db --bin seed -- --db ./data/jamal.db
//! ```
//!
//! ## Generated Data
//! - The default categories of a hardware store (Outillage, Plomberie, …)
//! - A second store ("depot") next to the migration-seeded main store
//! - The reserved settings defaults
//! - A realistic product list with prices in centimes and stock levels
//!
//! Product seeding is skipped when the database already has products.

use std::env;

use jamal_core::{NewProduct, Store};
use jamal_db::{Database, DbConfig};

/// Default categories with their descriptions.
const CATEGORIES: &[(&str, &str)] = &[
    ("Outillage", "Outils à main et électroportatifs"),
    ("Quincaillerie", "Visserie, boulonnerie, fixations"),
    ("Plomberie", "Tuyaux, raccords, robinetterie"),
    ("Électricité", "Câbles, interrupteurs, ampoules"),
    ("Peinture", "Peintures, vernis, pinceaux"),
    ("Jardinage", "Outils et accessoires de jardin"),
    ("Autres", "Articles divers"),
];

/// Demo products: (name, category, cost_cents, price_cents, stock, min_stock).
const PRODUCTS: &[(&str, &str, i64, i64, i64, i64)] = &[
    ("Marteau arrache-clou", "Outillage", 2500, 4000, 50, 5),
    ("Tournevis cruciforme", "Outillage", 800, 1500, 35, 10),
    ("Tournevis plat", "Outillage", 700, 1400, 28, 10),
    ("Pince universelle", "Outillage", 1800, 3200, 15, 5),
    ("Scie égoïne", "Outillage", 3000, 5500, 8, 3),
    ("Perceuse 500W", "Outillage", 25000, 42000, 6, 2),
    ("Mètre ruban 5m", "Outillage", 900, 1800, 40, 10),
    ("Niveau à bulle 40cm", "Outillage", 1500, 2800, 12, 4),
    ("Vis à bois 4x40 (100pc)", "Quincaillerie", 1200, 2200, 80, 20),
    ("Vis à bois 5x60 (100pc)", "Quincaillerie", 1500, 2600, 60, 20),
    ("Clous 50mm (1kg)", "Quincaillerie", 1000, 1800, 45, 15),
    ("Chevilles 8mm (50pc)", "Quincaillerie", 600, 1200, 70, 20),
    ("Cadenas 40mm", "Quincaillerie", 1800, 3500, 25, 8),
    ("Charnière 80mm", "Quincaillerie", 500, 1000, 55, 15),
    ("Serrure 3 points", "Quincaillerie", 12000, 19500, 7, 3),
    ("Tuyau PVC 32mm (2m)", "Plomberie", 1400, 2500, 30, 10),
    ("Raccord laiton 1/2\"", "Plomberie", 800, 1600, 48, 15),
    ("Robinet de jardin", "Plomberie", 2200, 4000, 18, 6),
    ("Téflon (rouleau)", "Plomberie", 200, 500, 90, 25),
    ("Siphon lavabo", "Plomberie", 1500, 2800, 14, 5),
    ("Câble 2.5mm² (10m)", "Électricité", 3500, 5500, 22, 8),
    ("Interrupteur simple", "Électricité", 700, 1400, 38, 12),
    ("Prise murale", "Électricité", 800, 1500, 42, 12),
    ("Ampoule LED 9W", "Électricité", 900, 1800, 65, 20),
    ("Multiprise 4 ports", "Électricité", 2500, 4500, 16, 5),
    ("Peinture blanche 5L", "Peinture", 9000, 14500, 20, 6),
    ("Peinture grise 1L", "Peinture", 2800, 4800, 15, 5),
    ("Pinceau plat 50mm", "Peinture", 600, 1200, 33, 10),
    ("Rouleau + bac", "Peinture", 1800, 3200, 19, 6),
    ("White-spirit 1L", "Peinture", 1200, 2200, 26, 8),
    ("Pelle ronde", "Jardinage", 2800, 4800, 10, 3),
    ("Râteau 14 dents", "Jardinage", 2200, 3900, 9, 3),
    ("Tuyau arrosage 20m", "Jardinage", 6000, 9800, 11, 4),
    ("Sécateur", "Jardinage", 1900, 3500, 13, 4),
    ("Gants de travail", "Autres", 800, 1500, 58, 15),
    ("Bâche 3x4m", "Autres", 2500, 4200, 17, 5),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./jamal.db");

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
                println!("Quincaillerie Jamal Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./jamal.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Quincaillerie Jamal Seed Data Generator");
    println!("==========================================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database (runs migrations, which seed the main store)
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Categories: idempotent, each outcome reported
    let mut created_categories = 0;
    for (name, description) in CATEGORIES {
        if db
            .categories()
            .ensure(name, Some(description))
            .await?
            .is_created()
        {
            created_categories += 1;
        }
    }
    println!(
        "✓ Categories: {} created, {} already present",
        created_categories,
        CATEGORIES.len() - created_categories
    );

    // Settings defaults: never overwrite what an operator changed
    let outcomes = db.settings().ensure_defaults().await?;
    let created_settings = outcomes.iter().filter(|(_, o)| o.is_created()).count();
    println!(
        "✓ Settings: {} defaults created, {} kept",
        created_settings,
        outcomes.len() - created_settings
    );

    // Second store for multi-store demos
    if db.stores().get("depot").await?.is_none() {
        let now = chrono::Utc::now();
        db.stores()
            .insert(&Store {
                id: "depot".to_string(),
                name: "Dépôt Annexe".to_string(),
                address: Some("Route de Casablanca, km 4".to_string()),
                phone: Some("0522-000000".to_string()),
                is_main: false,
                created_at: now,
                updated_at: now,
            })
            .await?;
        println!("✓ Store 'depot' created");
    } else {
        println!("✓ Store 'depot' already present");
    }

    // Products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!();
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping product seed to avoid duplicates.");
        return Ok(());
    }

    println!();
    println!("Seeding products...");

    let ledger = db.ledger();
    let mut generated = 0;

    for (name, category, cost_cents, price_cents, stock, min_stock) in PRODUCTS {
        let input = NewProduct {
            name: Some(name.to_string()),
            category: Some(category.to_string()),
            barcode: Some(format!("611102400{:04}", generated)),
            cost_cents: Some(*cost_cents),
            price_cents: Some(*price_cents),
            stock: Some(*stock),
            min_stock: Some(*min_stock),
            store_id: None,
        };

        match ledger.add_product(input).await {
            Ok(_) => {
                generated += 1;
                if generated % 10 == 0 {
                    println!("  Seeded {} products...", generated);
                }
            }
            Err(e) => {
                eprintln!("Failed to seed {}: {}", name, e);
            }
        }
    }

    println!();
    println!("✓ Seeded {} products", generated);

    let low = ledger.low_stock("main").await?;
    println!("  Low stock right now: {} products", low.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
