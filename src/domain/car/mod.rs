//! Car aggregate
//!
//! Contains the Car entity, its engine types, partial-update change sets
//! and the repository contract.

pub mod model;
pub mod repository;

pub use model::{Car, CarChanges, EngineType, FieldValue, NewCar};
pub use repository::CarRepository;
