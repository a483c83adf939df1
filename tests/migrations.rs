mod common;

use car_store::domain::{DomainError, EngineType};
use car_store::infrastructure::database::migrator::{
    add_engine_type_column, backfill_engine_type, Migrator,
};
use car_store::{init_database, DatabaseConfig};
use sea_orm::ConnectionTrait;
use sea_orm_migration::{MigratorTrait, SchemaManager};

use common::{all_cars, setup_db};

#[tokio::test]
async fn fresh_schema_requires_engine_type() {
    let db = setup_db().await;

    let err = db
        .execute_unprepared(
            "INSERT INTO cars (make, model, year, color, price) VALUES ('A', 'B', 2020, 'Red', 1.0)",
        )
        .await
        .unwrap_err();

    assert!(DomainError::from(err).is_constraint_violation());
}

#[tokio::test]
async fn legacy_rows_are_backfilled_with_petrol() {
    let db = init_database(&DatabaseConfig::sqlite_in_memory()).await.unwrap();
    Migrator::up(&db, Some(1)).await.unwrap();

    db.execute_unprepared(
        "INSERT INTO cars (id, make, model, year, color, price) VALUES
            (4, 'Old', 'One', 1999, 'Red', 500.0),
            (9, 'Old', 'Two', 2001, 'Blue', 750.0)",
    )
    .await
    .unwrap();

    Migrator::up(&db, None).await.unwrap();

    let cars = all_cars(&db).await;
    let ids: Vec<i32> = cars.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![4, 9]);
    assert!(cars.iter().all(|c| c.engine_type == EngineType::Petrol));
    assert_eq!(cars[1].price, 750.0);
}

#[tokio::test]
async fn adding_the_column_twice_is_a_no_op() {
    let db = setup_db().await;
    let manager = SchemaManager::new(&db);

    assert!(!add_engine_type_column(&manager).await.unwrap());
}

#[tokio::test]
async fn backfill_on_migrated_schema_touches_nothing() {
    let db = setup_db().await;
    db.execute_unprepared(
        "INSERT INTO cars (make, model, year, color, price, engine_type)
            VALUES ('A', 'B', 2020, 'Red', 1.0, 'diesel')",
    )
    .await
    .unwrap();
    let manager = SchemaManager::new(&db);

    assert_eq!(backfill_engine_type(&manager).await.unwrap(), 0);
    assert_eq!(all_cars(&db).await[0].engine_type, EngineType::Diesel);
}

#[tokio::test]
async fn other_alter_failures_propagate() {
    // No migrations applied: there is no cars table
    let db = init_database(&DatabaseConfig::sqlite_in_memory()).await.unwrap();
    let manager = SchemaManager::new(&db);

    assert!(add_engine_type_column(&manager).await.is_err());
}

#[tokio::test]
async fn migrations_can_be_rolled_back_and_reapplied() {
    let db = setup_db().await;

    Migrator::down(&db, Some(1)).await.unwrap();
    db.execute_unprepared(
        "INSERT INTO cars (make, model, year, color, price) VALUES ('Legacy', 'Car', 2005, 'Grey', 3000.0)",
    )
    .await
    .unwrap();
    Migrator::up(&db, None).await.unwrap();

    let cars = all_cars(&db).await;
    assert_eq!(cars.len(), 1);
    assert_eq!(cars[0].engine_type, EngineType::Petrol);
}
