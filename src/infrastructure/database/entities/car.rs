//! Car entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Engine type column, stored as its lowercase name
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum EngineType {
    #[sea_orm(string_value = "petrol")]
    Petrol,
    #[sea_orm(string_value = "diesel")]
    Diesel,
    #[sea_orm(string_value = "electric")]
    Electric,
    #[sea_orm(string_value = "hybrid")]
    Hybrid,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cars")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub make: String,

    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub model: String,

    pub year: i32,

    #[sea_orm(column_type = "String(StringLen::N(30))")]
    pub color: String,

    #[sea_orm(column_type = "Double")]
    pub price: f64,

    /// Required, no database default
    pub engine_type: EngineType,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
