//! Car repository interface

use async_trait::async_trait;

use super::model::{Car, CarChanges, FieldValue, NewCar};
use crate::domain::DomainResult;

/// CRUD operations on cars, bound to a transaction owned by someone else.
///
/// Implementations never commit or roll back.
#[async_trait]
pub trait CarRepository: Send + Sync {
    /// Inserts and flushes the car, returning it with its assigned id.
    async fn create(&self, car: NewCar) -> DomainResult<Car>;
    async fn get_by_id(&self, id: i32) -> DomainResult<Option<Car>>;
    /// All cars, ascending by id.
    async fn list_all(&self) -> DomainResult<Vec<Car>>;
    /// Applies the set fields and returns the re-read row, or `None` when
    /// no car has this id. An empty change set writes nothing.
    async fn update(&self, id: i32, changes: CarChanges) -> DomainResult<Option<Car>>;
    /// Deleting a missing id is not an error.
    async fn delete(&self, id: i32) -> DomainResult<()>;
    async fn count(&self) -> DomainResult<u64>;

    /// [`CarRepository::update`] for loosely typed `(field, value)` pairs.
    async fn update_fields(
        &self,
        id: i32,
        fields: Vec<(String, FieldValue)>,
    ) -> DomainResult<Option<Car>> {
        let changes = CarChanges::from_fields(fields)?;
        self.update(id, changes).await
    }
}
