use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A stored employee record. The identifier is assigned by the database on
/// insert and never changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique, indexed)]
    pub email: String,
    pub position: String,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub salary: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
