#![allow(dead_code)]

use car_store::domain::{Car, CarRepository, DomainError, EngineType, NewCar};
use car_store::infrastructure::database::migrator::Migrator;
use car_store::{init_database, CarUnitOfWork, DatabaseConfig};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

/// Fresh in-memory database with every migration applied.
pub async fn setup_db() -> DatabaseConnection {
    let db = init_database(&DatabaseConfig::sqlite_in_memory())
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("apply migrations");
    db
}

pub fn sample_car(make: &str, model: &str, engine_type: EngineType) -> NewCar {
    NewCar::new(make, model, 2020, "Red", 12345.5, engine_type)
}

/// All cars, read in their own committed unit of work.
pub async fn all_cars(db: &DatabaseConnection) -> Vec<Car> {
    CarUnitOfWork::run::<_, _, DomainError>(db, |uow| {
        Box::pin(async move { uow.cars().list_all().await })
    })
    .await
    .expect("list cars")
}
