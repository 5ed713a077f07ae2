//! Expenses: spending events of the ledger owner.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::MoneyCents;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub date: Date,
    pub item: String,
    pub amount: MoneyCents,
    pub category: String,
    /// `None` only for rows imported without a known healthiness.
    pub is_healthy: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date: Date,
    pub item: String,
    pub amount_minor: i64,
    pub category: String,
    pub is_healthy: Option<bool>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Expense {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            date: model.date,
            item: model.item,
            amount: MoneyCents::new(model.amount_minor),
            category: model.category,
            is_healthy: model.is_healthy,
        }
    }
}
