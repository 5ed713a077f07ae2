//! Learned item healthiness facts, keyed by normalized item name.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "item_health")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub item_norm: String,
    pub is_healthy: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
