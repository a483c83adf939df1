//! Application layer - use cases driving the repositories

pub mod bulk_load;

pub use bulk_load::{load_cars, load_cars_from_path, normalize_engine_type, DEFAULT_CSV_PATH};
