//! Database repository implementations

pub mod car_repository;

pub use car_repository::SeaOrmCarRepository;
