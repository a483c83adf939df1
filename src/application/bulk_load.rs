//! CSV bulk loading of cars
//!
//! The whole file is loaded in one unit of work: a row that cannot be
//! parsed aborts the load and rolls back every car staged before it.
//!
//! Row policy:
//! - rows may be shorter than the header; absent trailing fields count as empty
//! - rows with an empty or missing `make` or `model` are skipped
//! - `engine_type` is trimmed and lowercased; unknown values become `petrol`
//! - `year` and `price` must parse, otherwise the load fails
//! - a missing `color` fails the load

use std::io::{Cursor, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use sea_orm::DatabaseConnection;
use tracing::{debug, info};

use crate::domain::{CarRepository, EngineType, NewCar};
use crate::infrastructure::CarUnitOfWork;
use crate::shared::{AppError, InfraError};

/// Where `init-db` looks for input when no path is given
pub const DEFAULT_CSV_PATH: &str = "data/cars.csv";

/// Position of each known column in the header row.
#[derive(Debug)]
struct Columns {
    make: Option<usize>,
    model: Option<usize>,
    year: Option<usize>,
    color: Option<usize>,
    price: Option<usize>,
    engine_type: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Self {
            make: find("make"),
            model: find("model"),
            year: find("year"),
            color: find("color"),
            price: find("price"),
            engine_type: find("engine_type"),
        }
    }
}

#[derive(Debug)]
struct CarRecord {
    make: Option<String>,
    model: Option<String>,
    year: Option<String>,
    color: Option<String>,
    price: Option<String>,
    engine_type: Option<String>,
}

impl CarRecord {
    /// Fields missing from a short row, or absent from the header, are `None`.
    fn from_record(record: &StringRecord, columns: &Columns) -> Self {
        let field = |index: Option<usize>| index.and_then(|i| record.get(i)).map(str::to_string);
        Self {
            make: field(columns.make),
            model: field(columns.model),
            year: field(columns.year),
            color: field(columns.color),
            price: field(columns.price),
            engine_type: field(columns.engine_type),
        }
    }

    /// `Ok(None)` for rows that are skipped.
    fn into_new_car(self, line: u64) -> Result<Option<NewCar>, InfraError> {
        let (Some(make), Some(model)) = (non_empty(self.make), non_empty(self.model)) else {
            return Ok(None);
        };

        let engine_type = normalize_engine_type(self.engine_type.as_deref());
        let year = parse_number::<i32>(line, "year", self.year)?;
        let price = parse_number::<f64>(line, "price", self.price)?;
        let color = non_empty(self.color).ok_or(InfraError::MissingField {
            line,
            field: "color",
        })?;

        Ok(Some(NewCar {
            make,
            model,
            year,
            color,
            price,
            engine_type,
        }))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_number<N: std::str::FromStr>(
    line: u64,
    field: &'static str,
    raw: Option<String>,
) -> Result<N, InfraError> {
    let raw = raw.unwrap_or_default();
    let parsed = raw.trim().parse::<N>();
    parsed.map_err(|_| InfraError::InvalidNumber { line, field, value: raw })
}

/// Lenient engine type for untrusted input: trimmed, lowercased, and
/// `petrol` when it does not name a known engine type.
pub fn normalize_engine_type(raw: Option<&str>) -> EngineType {
    let normalized = raw.unwrap_or_default().trim().to_lowercase();
    if !EngineType::is_valid_str(&normalized) {
        debug!("Unknown engine type {:?}, using petrol", raw);
        return EngineType::Petrol;
    }
    normalized.parse().unwrap_or(EngineType::Petrol)
}

/// Loads cars from CSV `input` (header row required) and returns how
/// many were staged.
///
/// `input` is read synchronously while the transaction is open, so pass
/// in-memory data or small files. [`load_cars_from_path`] reads the file
/// up front.
pub async fn load_cars<R>(db: &DatabaseConnection, input: R) -> Result<usize, AppError>
where
    R: Read + Send + 'static,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let columns = Columns::from_headers(reader.headers().map_err(InfraError::from)?);

    let inserted = CarUnitOfWork::run::<_, _, AppError>(db, move |uow| {
        Box::pin(async move {
            let cars = uow.cars();
            let mut inserted = 0usize;
            let mut record = StringRecord::new();

            while reader.read_record(&mut record).map_err(InfraError::from)? {
                let line = record.position().map_or(0, |p| p.line());
                let row = CarRecord::from_record(&record, &columns);

                let Some(new_car) = row.into_new_car(line)? else {
                    debug!("Skipping line {}: missing make or model", line);
                    continue;
                };
                cars.create(new_car).await?;
                inserted += 1;
            }

            Ok::<_, AppError>(inserted)
        })
    })
    .await?;

    info!("Staged {} cars from CSV", inserted);
    Ok(inserted)
}

/// [`load_cars`] from a file on disk. The file is read in full before the
/// unit of work opens.
pub async fn load_cars_from_path(
    db: &DatabaseConnection,
    path: impl AsRef<Path>,
) -> Result<usize, AppError> {
    let path = path.as_ref();
    let contents = match tokio::fs::read(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(InfraError::MissingInput(path.to_path_buf()).into());
        }
        Err(e) => return Err(InfraError::from(e).into()),
    };

    info!("Loading cars from {}", path.display());
    load_cars(db, Cursor::new(contents)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(make: &str, year: &str, price: &str, engine: &str) -> CarRecord {
        CarRecord {
            make: Some(make.to_string()),
            model: Some("Model".to_string()),
            year: Some(year.to_string()),
            color: Some("Red".to_string()),
            price: Some(price.to_string()),
            engine_type: Some(engine.to_string()),
        }
    }

    #[test]
    fn engine_type_is_trimmed_and_lowercased() {
        assert_eq!(normalize_engine_type(Some("  Electric ")), EngineType::Electric);
        assert_eq!(normalize_engine_type(Some("HYBRID")), EngineType::Hybrid);
    }

    #[test]
    fn unknown_or_missing_engine_type_falls_back_to_petrol() {
        assert_eq!(normalize_engine_type(Some("unknown")), EngineType::Petrol);
        assert_eq!(normalize_engine_type(Some("")), EngineType::Petrol);
        assert_eq!(normalize_engine_type(None), EngineType::Petrol);
    }

    #[test]
    fn rows_without_make_are_skipped() {
        let row = record("", "2020", "100.0", "diesel");
        assert!(row.into_new_car(2).unwrap().is_none());
    }

    #[test]
    fn rows_without_model_are_skipped_before_numbers_are_parsed() {
        let mut row = record("Make", "not-a-year", "100.0", "diesel");
        row.model = None;
        assert!(row.into_new_car(2).unwrap().is_none());
    }

    #[test]
    fn numeric_fields_are_parsed() {
        let car = record("Make", " 2019 ", "15000.5", "Diesel")
            .into_new_car(2)
            .unwrap()
            .unwrap();
        assert_eq!(car.year, 2019);
        assert_eq!(car.price, 15000.5);
        assert_eq!(car.engine_type, EngineType::Diesel);
    }

    #[test]
    fn bad_year_reports_line_and_value() {
        let err = record("Make", "twenty", "1.0", "petrol")
            .into_new_car(5)
            .unwrap_err();
        match err {
            InfraError::InvalidNumber { line, field, value } => {
                assert_eq!(line, 5);
                assert_eq!(field, "year");
                assert_eq!(value, "twenty");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn absent_price_is_an_invalid_number() {
        let mut row = record("Make", "2020", "", "petrol");
        row.price = None;
        match row.into_new_car(4).unwrap_err() {
            InfraError::InvalidNumber { line, field, value } => {
                assert_eq!(line, 4);
                assert_eq!(field, "price");
                assert_eq!(value, "");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn absent_color_fails_the_row() {
        let mut row = record("Make", "2020", "1.0", "petrol");
        row.color = None;
        assert!(matches!(
            row.into_new_car(6).unwrap_err(),
            InfraError::MissingField { line: 6, field: "color" }
        ));
    }

    #[test]
    fn short_records_leave_trailing_fields_empty() {
        let headers = StringRecord::from(vec!["make", "model", "year", "color", "price", "engine_type"]);
        let columns = Columns::from_headers(&headers);
        let row = CarRecord::from_record(&StringRecord::from(vec!["Ford", "Focus", "2018", "Blue", "15000"]), &columns);

        assert_eq!(row.price.as_deref(), Some("15000"));
        assert!(row.engine_type.is_none());
        let car = row.into_new_car(3).unwrap().unwrap();
        assert_eq!(car.engine_type, EngineType::Petrol);
    }

    #[test]
    fn columns_follow_header_order() {
        let headers = StringRecord::from(vec!["price", "make", "model", "color", "year"]);
        let columns = Columns::from_headers(&headers);
        let row = CarRecord::from_record(
            &StringRecord::from(vec!["9.5", "Fiat", "Panda", "White", "2015"]),
            &columns,
        );

        let car = row.into_new_car(2).unwrap().unwrap();
        assert_eq!(car.make, "Fiat");
        assert_eq!(car.year, 2015);
        assert_eq!(car.price, 9.5);
    }
}
