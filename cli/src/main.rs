//! Car store - batch command line tools
//!
//! One-shot programs against the database configured through `DB_*` /
//! `DATABASE_URL` (a `.env` file is honoured).
//!
//! ```sh
//! # Apply pending schema migrations (creates cars, adds engine_type)
//! car-store migrate
//!
//! # Migrate, then load data/cars.csv in one transaction
//! car-store init-db --csv data/cars.csv
//!
//! # Create / read / update / list / delete walkthrough
//! car-store demo
//!
//! # Print every car as JSON
//! car-store list --json
//!
//! # Show the effective configuration without connecting
//! car-store check
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use car_store::application::{load_cars_from_path, DEFAULT_CSV_PATH};
use car_store::bootstrap::{connect, init_tracing};
use car_store::domain::{Car, CarChanges, CarRepository, DomainError, EngineType, NewCar};
use car_store::infrastructure::database::migrator::Migrator;
use car_store::{AppConfig, CarUnitOfWork};

/// Car store - persist cars through a repository and unit of work.
#[derive(Parser, Debug)]
#[command(name = "car-store", version, about)]
struct Cli {
    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending database migrations.
    Migrate,
    /// Apply migrations, then bulk-load cars from a CSV file.
    InitDb {
        /// CSV file with a make,model,year,color,price,engine_type header.
        #[arg(long, default_value = DEFAULT_CSV_PATH)]
        csv: PathBuf,
    },
    /// Run the CRUD walkthrough, one unit of work per step.
    Demo,
    /// List all cars.
    List {
        /// Print JSON instead of one line per car.
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration and exit without connecting.
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    init_tracing(&config.logging);

    match cli.command {
        Command::Check => {
            println!("✅ Configuration is valid");
            println!("   Database    : {}", config.database_config().redacted_url());
            println!("   Log level   : {}", config.logging.level);
            println!("   Log format  : {}", config.logging.format);
        }
        Command::Migrate => {
            let db = connect(&config).await?;
            println!(">>> Running migrations");
            let pending = Migrator::get_pending_migrations(db).await?.len();
            Migrator::up(db, None).await?;
            println!(">>> Migrations completed successfully ({} applied).", pending);
        }
        Command::InitDb { csv } => {
            let db = connect(&config).await?;
            println!(">>> init-db starting");
            Migrator::up(db, None).await?;
            println!("✔ Schema is up to date.");
            let rows = load_cars_from_path(db, &csv).await?;
            println!("✅ Inserted {} rows from {}", rows, csv.display());
        }
        Command::Demo => demo(connect(&config).await?).await?,
        Command::List { json } => {
            let db = connect(&config).await?;
            let cars = CarUnitOfWork::run::<_, _, DomainError>(db, |uow| {
                Box::pin(async move { uow.cars().list_all().await })
            })
            .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&cars)?);
            } else {
                println!("[LIST] All cars ({}):", cars.len());
                for car in &cars {
                    println!("    {}", car);
                }
            }
        }
    }

    info!("Done");
    Ok(())
}

fn describe(car: Option<&Car>) -> String {
    car.map_or_else(|| "None".to_string(), Car::to_string)
}

/// The demo's own car must still exist between steps.
fn require_car(car: Option<Car>, id: i32) -> Result<Car, DomainError> {
    car.ok_or_else(|| DomainError::NotFound {
        entity: "Car",
        field: "id",
        value: id.to_string(),
    })
}

async fn demo(db: &sea_orm_migration::sea_orm::DatabaseConnection) -> Result<(), DomainError> {
    println!(">>> demo starting");

    // 1. Create a car
    let car = CarUnitOfWork::run::<_, _, DomainError>(db, |uow| {
        Box::pin(async move {
            uow.cars()
                .create(NewCar::new(
                    "DemoMake",
                    "DemoModel",
                    2024,
                    "Green",
                    25000.0,
                    EngineType::Petrol,
                ))
                .await
        })
    })
    .await?;
    println!("[CREATE] Created car: {}", car);
    let id = car.id;

    // 2. Fetch the car
    let fetched = CarUnitOfWork::run::<_, _, DomainError>(db, move |uow| {
        Box::pin(async move { uow.cars().get_by_id(id).await })
    })
    .await?;
    let fetched = require_car(fetched, id)?;
    println!("[READ] Fetched car: {}", fetched);

    // 3. Update the car
    let updated = CarUnitOfWork::run::<_, _, DomainError>(db, move |uow| {
        Box::pin(async move {
            uow.cars()
                .update(id, CarChanges::new().color("Yellow").price(26000.0))
                .await
        })
    })
    .await?;
    let updated = require_car(updated, id)?;
    println!("[UPDATE] Updated car: {}", updated);

    // 4. List all cars
    let cars = CarUnitOfWork::run::<_, _, DomainError>(db, |uow| {
        Box::pin(async move { uow.cars().list_all().await })
    })
    .await?;
    println!("[LIST] All cars ({}):", cars.len());
    for c in &cars {
        println!("    {}", c);
    }

    // 5. Delete the demo car
    CarUnitOfWork::run::<_, _, DomainError>(db, move |uow| {
        Box::pin(async move { uow.cars().delete(id).await })
    })
    .await?;
    println!("[DELETE] Deleted car with id={}", id);

    // 6. Confirm deletion
    let deleted = CarUnitOfWork::run::<_, _, DomainError>(db, move |uow| {
        Box::pin(async move { uow.cars().get_by_id(id).await })
    })
    .await?;
    println!("[READ AFTER DELETE] Should be None -> {}", describe(deleted.as_ref()));

    println!(">>> demo finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car(id: i32) -> Car {
        Car {
            id,
            make: "DemoMake".to_string(),
            model: "DemoModel".to_string(),
            year: 2024,
            color: "Green".to_string(),
            price: 25000.0,
            engine_type: EngineType::Petrol,
        }
    }

    #[test]
    fn require_car_passes_an_existing_car_through() {
        assert_eq!(require_car(Some(car(3)), 3).unwrap(), car(3));
    }

    #[test]
    fn require_car_reports_a_vanished_car() {
        let err = require_car(None, 42).unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound { entity: "Car", field: "id", ref value } if value == "42"
        ));
        assert_eq!(err.to_string(), "Not found: Car with id=42");
    }

    #[test]
    fn describe_prints_none_for_a_missing_car() {
        assert_eq!(describe(None), "None");
    }
}
