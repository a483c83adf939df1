//! Car domain entity

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::shared::DomainError;

/// Engine type of a car. Stored as its lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

impl EngineType {
    pub const ALL: [EngineType; 4] = [Self::Petrol, Self::Diesel, Self::Electric, Self::Hybrid];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Petrol => "petrol",
            Self::Diesel => "diesel",
            Self::Electric => "electric",
            Self::Hybrid => "hybrid",
        }
    }

    /// Exact membership test against the stored names (no case folding).
    pub fn is_valid_str(s: &str) -> bool {
        Self::ALL.iter().any(|e| e.as_str() == s)
    }
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses free text, case-insensitively. Anything outside the four
/// names is a validation error.
impl FromStr for EngineType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == lowered)
            .ok_or_else(|| {
                DomainError::Validation(format!(
                    "'{}' is not a valid engine type (expected one of petrol, diesel, electric, hybrid)",
                    s
                ))
            })
    }
}

/// A persisted car
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Car {
    /// Store-assigned id, stable once set
    pub id: i32,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub price: f64,
    pub engine_type: EngineType,
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Car(id={}, make={:?}, model={:?}, year={}, color={:?}, price={:.2}, engine_type={})",
            self.id, self.make, self.model, self.year, self.color, self.price, self.engine_type
        )
    }
}

/// Fields for a car that has not been inserted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewCar {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub price: f64,
    pub engine_type: EngineType,
}

impl NewCar {
    pub fn new(
        make: impl Into<String>,
        model: impl Into<String>,
        year: i32,
        color: impl Into<String>,
        price: f64,
        engine_type: EngineType,
    ) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
            year,
            color: color.into(),
            price,
            engine_type,
        }
    }
}

/// Loosely typed value for a named field update
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Float(f64),
    Engine(EngineType),
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<EngineType> for FieldValue {
    fn from(v: EngineType) -> Self {
        Self::Engine(v)
    }
}

/// Partial update of the updatable car columns. `None` leaves a column alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarChanges {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub price: Option<f64>,
    pub engine_type: Option<EngineType>,
}

impl CarChanges {
    pub const FIELDS: [&'static str; 6] = ["make", "model", "year", "color", "price", "engine_type"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.make.is_none()
            && self.model.is_none()
            && self.year.is_none()
            && self.color.is_none()
            && self.price.is_none()
            && self.engine_type.is_none()
    }

    pub fn make(mut self, make: impl Into<String>) -> Self {
        self.make = Some(make.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn engine_type(mut self, engine_type: EngineType) -> Self {
        self.engine_type = Some(engine_type);
        self
    }

    /// Builds a change set from `(field, value)` pairs.
    ///
    /// Names outside [`CarChanges::FIELDS`] are dropped without error.
    /// Engine types given as text are lowercased and must name one of the
    /// four engine types.
    pub fn from_fields<I, K>(fields: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (K, FieldValue)>,
        K: AsRef<str>,
    {
        let mut changes = Self::new();
        for (name, value) in fields {
            changes.apply(name.as_ref(), value)?;
        }
        Ok(changes)
    }

    fn apply(&mut self, name: &str, value: FieldValue) -> Result<(), DomainError> {
        match name {
            "make" => self.make = Some(text(name, value)?),
            "model" => self.model = Some(text(name, value)?),
            "color" => self.color = Some(text(name, value)?),
            "year" => self.year = Some(int(name, value)?),
            "price" => self.price = Some(float(name, value)?),
            "engine_type" => {
                self.engine_type = Some(match value {
                    FieldValue::Engine(e) => e,
                    FieldValue::Text(s) => s.parse()?,
                    other => return Err(mismatch(name, &other)),
                })
            }
            _ => log::debug!("Ignoring non-updatable car field '{}'", name),
        }
        Ok(())
    }
}

fn mismatch(name: &str, value: &FieldValue) -> DomainError {
    DomainError::Validation(format!("unsupported value {:?} for field '{}'", value, name))
}

fn text(name: &str, value: FieldValue) -> Result<String, DomainError> {
    match value {
        FieldValue::Text(s) => Ok(s),
        other => Err(mismatch(name, &other)),
    }
}

fn int(name: &str, value: FieldValue) -> Result<i32, DomainError> {
    match value {
        FieldValue::Int(v) => i32::try_from(v).map_err(|_| mismatch(name, &FieldValue::Int(v))),
        FieldValue::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| mismatch(name, &FieldValue::Text(s))),
        other => Err(mismatch(name, &other)),
    }
}

fn float(name: &str, value: FieldValue) -> Result<f64, DomainError> {
    match value {
        FieldValue::Float(v) => Ok(v),
        FieldValue::Int(v) => Ok(v as f64),
        FieldValue::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| mismatch(name, &FieldValue::Text(s))),
        other => Err(mismatch(name, &other)),
    }
}
