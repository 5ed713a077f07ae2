//! Payments: immutable repayment chunks, each against one obligation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{MoneyCents, ObligationId, PartyId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub date: Date,
    pub obligation_id: ObligationId,
    pub payer_id: PartyId,
    pub amount: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date: Date,
    pub obligation_id: i64,
    pub payer_id: i64,
    pub amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::obligations::Entity",
        from = "Column::ObligationId",
        to = "super::obligations::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Obligations,
    #[sea_orm(
        belongs_to = "super::parties::Entity",
        from = "Column::PayerId",
        to = "super::parties::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Payer,
}

impl Related<super::obligations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Obligations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Payment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            date: model.date,
            obligation_id: ObligationId(model.obligation_id),
            payer_id: PartyId(model.payer_id),
            amount: MoneyCents::new(model.amount_minor),
        }
    }
}
