//! Database entities module

pub mod car;

pub use car::Entity as Car;
