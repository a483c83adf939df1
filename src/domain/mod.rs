pub mod car;

// Re-export commonly used types
pub use car::{Car, CarChanges, CarRepository, EngineType, FieldValue, NewCar};

pub use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
