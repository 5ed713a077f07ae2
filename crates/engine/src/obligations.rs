//! Obligations: a borrower owing a lender a fixed original amount.
//!
//! An obligation is created `Active` and moves to `Settled` once, when the
//! payments applied to it reach the original amount. It never goes back.

use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, PartyId};

/// Obligation identifier. Lower ids were recorded first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObligationId(pub i64);

impl fmt::Display for ObligationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObligationStatus {
    Active,
    Settled,
}

impl ObligationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Settled => "Settled",
        }
    }
}

impl TryFrom<&str> for ObligationStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Active" => Ok(Self::Active),
            "Settled" => Ok(Self::Settled),
            other => Err(EngineError::StorageFailure(DbErr::Custom(format!(
                "invalid obligation status: {other}"
            )))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obligation {
    pub id: ObligationId,
    pub date: Date,
    pub borrower_id: PartyId,
    pub lender_id: PartyId,
    pub amount: MoneyCents,
    pub description: String,
    pub status: ObligationStatus,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "obligations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date: Date,
    pub borrower_id: i64,
    pub lender_id: i64,
    pub amount_minor: i64,
    pub description: String,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::parties::Entity",
        from = "Column::BorrowerId",
        to = "super::parties::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Borrower,
    #[sea_orm(
        belongs_to = "super::parties::Entity",
        from = "Column::LenderId",
        to = "super::parties::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Lender,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Obligation {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ObligationId(model.id),
            date: model.date,
            borrower_id: PartyId(model.borrower_id),
            lender_id: PartyId(model.lender_id),
            amount: MoneyCents::new(model.amount_minor),
            description: model.description,
            status: ObligationStatus::try_from(model.status.as_str())?,
        })
    }
}
