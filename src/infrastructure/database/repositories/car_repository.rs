//! SeaORM implementation of CarRepository

use async_trait::async_trait;
use log::{debug, info};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ActiveValue::NotSet, ColumnTrait, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, Value,
};

use crate::domain::car::{Car, CarChanges, CarRepository, EngineType, NewCar};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::car;

// ── Conversion helpers ──────────────────────────────────────────

fn entity_to_domain(m: car::Model) -> Car {
    Car {
        id: m.id,
        make: m.make,
        model: m.model,
        year: m.year,
        color: m.color,
        price: m.price,
        engine_type: match m.engine_type {
            car::EngineType::Petrol => EngineType::Petrol,
            car::EngineType::Diesel => EngineType::Diesel,
            car::EngineType::Electric => EngineType::Electric,
            car::EngineType::Hybrid => EngineType::Hybrid,
        },
    }
}

fn engine_to_entity(e: EngineType) -> car::EngineType {
    match e {
        EngineType::Petrol => car::EngineType::Petrol,
        EngineType::Diesel => car::EngineType::Diesel,
        EngineType::Electric => car::EngineType::Electric,
        EngineType::Hybrid => car::EngineType::Hybrid,
    }
}

fn set_or_skip<V: Into<Value>>(value: Option<V>) -> ActiveValue<V> {
    value.map_or(NotSet, Set)
}

/// Only the set fields end up in the UPDATE statement.
fn changes_to_active(changes: CarChanges) -> car::ActiveModel {
    car::ActiveModel {
        id: NotSet,
        make: set_or_skip(changes.make),
        model: set_or_skip(changes.model),
        year: set_or_skip(changes.year),
        color: set_or_skip(changes.color),
        price: set_or_skip(changes.price),
        engine_type: set_or_skip(changes.engine_type.map(engine_to_entity)),
    }
}

// ── SeaOrmCarRepository ─────────────────────────────────────────

/// Car repository borrowing an open transaction.
///
/// It only ever holds a shared reference, so it cannot commit or roll
/// back; that stays with the owner of the transaction.
pub struct SeaOrmCarRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> SeaOrmCarRepository<'a> {
    pub fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }
}

#[async_trait]
impl<'a> CarRepository for SeaOrmCarRepository<'a> {
    async fn create(&self, new_car: NewCar) -> DomainResult<Car> {
        let model = car::ActiveModel {
            id: NotSet,
            make: Set(new_car.make),
            model: Set(new_car.model),
            year: Set(new_car.year),
            color: Set(new_car.color),
            price: Set(new_car.price),
            engine_type: Set(engine_to_entity(new_car.engine_type)),
        };
        let result = model.insert(self.txn).await?;
        info!("Car staged: {} {} ({})", result.make, result.model, result.id);
        Ok(entity_to_domain(result))
    }

    async fn get_by_id(&self, id: i32) -> DomainResult<Option<Car>> {
        let model = car::Entity::find_by_id(id).one(self.txn).await?;
        Ok(model.map(entity_to_domain))
    }

    async fn list_all(&self) -> DomainResult<Vec<Car>> {
        let models = car::Entity::find()
            .order_by_asc(car::Column::Id)
            .all(self.txn)
            .await?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn update(&self, id: i32, changes: CarChanges) -> DomainResult<Option<Car>> {
        if changes.is_empty() {
            debug!("No updatable fields for car {}, returning current row", id);
            return self.get_by_id(id).await;
        }

        let result = car::Entity::update_many()
            .set(changes_to_active(changes))
            .filter(car::Column::Id.eq(id))
            .exec(self.txn)
            .await?;
        debug!("Car {} update matched {} row(s)", id, result.rows_affected);

        self.get_by_id(id).await
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = car::Entity::delete_by_id(id).exec(self.txn).await?;
        if result.rows_affected == 0 {
            debug!("Delete of car {} matched nothing", id);
        } else {
            info!("Car deleted: {}", id);
        }
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(car::Entity::find().count(self.txn).await?)
    }
}
