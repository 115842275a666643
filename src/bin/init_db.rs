//! One-shot database initialization.
//!
//! Accepts a connection string, runs the embedded migrations and seeds a
//! small fixed data set through the regular services, so seeded products
//! get their initial-stock ledger rows like any other write.

use anyhow::Context;
use clap::Parser;
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};
use tracing::info;

use stockroom_api as api;

use api::entities::product;
use api::handlers::AppServices;
use api::services::categories::CategoryInput;
use api::services::products::ProductInput;
use api::services::suppliers::SupplierInput;

#[derive(Parser)]
#[command(
    name = "init-db",
    about = "Initialize the inventory database: run migrations and seed sample data"
)]
struct Args {
    /// Database connection string (falls back to DATABASE_URL)
    database_url: Option<String>,

    /// Only run migrations; skip the sample data
    #[arg(long)]
    skip_seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    api::config::init_tracing("info", false);

    let args = Args::parse();
    let url = args
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .context("provide a connection string argument or set DATABASE_URL")?;

    info!("Connecting to the database");
    let pool = api::db::establish_connection(&url).await?;

    api::db::run_migrations(&pool).await?;

    let pool = std::sync::Arc::new(pool);
    if args.skip_seed {
        info!("Skipping sample data (--skip-seed)");
    } else {
        seed(pool.clone()).await?;
    }

    if let Ok(pool) = std::sync::Arc::try_unwrap(pool) {
        api::db::close_pool(pool).await?;
    }
    info!("Database initialized");

    Ok(())
}

async fn seed(pool: std::sync::Arc<api::db::DbPool>) -> anyhow::Result<()> {
    let existing = product::Entity::find().count(pool.as_ref()).await?;
    if existing > 0 {
        info!(products = existing, "database already holds data; skipping seed");
        return Ok(());
    }

    let (event_sender, event_rx) = api::events::channel();
    let event_task = tokio::spawn(api::events::process_events(event_rx));

    let services = AppServices::new(pool, event_sender);

    info!("Seeding sample data");

    let tools = services
        .categories
        .create(CategoryInput {
            name: "Tools".to_string(),
            description: Some("Hand and power tools".to_string()),
        })
        .await?;
    let electronics = services
        .categories
        .create(CategoryInput {
            name: "Electronics".to_string(),
            description: Some("Electronic components and devices".to_string()),
        })
        .await?;
    let office = services
        .categories
        .create(CategoryInput {
            name: "Office Supplies".to_string(),
            description: None,
        })
        .await?;

    let acme = services
        .suppliers
        .create(SupplierInput {
            name: "Acme Industrial".to_string(),
            email: Some("sales@acme-industrial.example".to_string()),
            phone: Some("+1 555 0100".to_string()),
            address: Some("12 Forge Road, Springfield".to_string()),
        })
        .await?;
    let northline = services
        .suppliers
        .create(SupplierInput {
            name: "Northline Distribution".to_string(),
            email: Some("orders@northline.example".to_string()),
            phone: None,
            address: None,
        })
        .await?;

    let samples = vec![
        ProductInput {
            name: "Cordless drill".to_string(),
            sku: "TL-0001".to_string(),
            description: Some("18V cordless drill with two batteries".to_string()),
            category_id: Some(tools.id),
            supplier_id: Some(acme.id),
            price: dec!(129.90),
            stock: 25,
            min_stock: 5,
            image_url: None,
        },
        ProductInput {
            name: "Claw hammer".to_string(),
            sku: "TL-0002".to_string(),
            description: None,
            category_id: Some(tools.id),
            supplier_id: Some(acme.id),
            price: dec!(18.50),
            stock: 60,
            min_stock: 10,
            image_url: None,
        },
        ProductInput {
            name: "USB-C cable 2m".to_string(),
            sku: "EL-0001".to_string(),
            description: Some("Braided USB-C to USB-C cable".to_string()),
            category_id: Some(electronics.id),
            supplier_id: Some(northline.id),
            price: dec!(9.99),
            stock: 200,
            min_stock: 50,
            image_url: None,
        },
        ProductInput {
            name: "Wireless mouse".to_string(),
            sku: "EL-0002".to_string(),
            description: None,
            category_id: Some(electronics.id),
            supplier_id: Some(northline.id),
            price: dec!(24.00),
            stock: 4,
            min_stock: 15,
            image_url: None,
        },
        ProductInput {
            name: "A4 paper, 500 sheets".to_string(),
            sku: "OF-0001".to_string(),
            description: None,
            category_id: Some(office.id),
            supplier_id: None,
            price: dec!(6.20),
            stock: 80,
            min_stock: 20,
            image_url: None,
        },
    ];

    for input in samples {
        let sku = input.sku.clone();
        services.products.create(input).await?;
        info!(sku = %sku, "seeded product");
    }

    // Drop the services (and their event sender) so the processor drains
    drop(services);
    let _ = event_task.await;

    Ok(())
}
