use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use serde::Serialize;

use crate::{
    EngineError, MoneyCents, Obligation, ObligationCmd, ObligationId, ObligationRecorded,
    ObligationStatus, Payment, ResultEngine, obligations, payments,
    util::{normalize_optional_text, require_positive},
};

use super::{Engine, with_tx};

/// An obligation with its parties' names and the payments made so far.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ObligationDetail {
    pub obligation: Obligation,
    pub borrower: String,
    pub lender: String,
    pub payments: Vec<Payment>,
    pub outstanding: MoneyCents,
}

impl Engine {
    /// Records that the borrower owes the lender `cmd.amount`.
    ///
    /// Both names must already resolve; parties are never created here.
    pub async fn create_obligation(&self, cmd: ObligationCmd) -> ResultEngine<ObligationRecorded> {
        require_positive(cmd.amount, "debt")?;
        let description = normalize_optional_text(Some(cmd.description.as_str()))
            .unwrap_or_else(|| ObligationCmd::DEFAULT_DESCRIPTION.to_string());

        let recorded = with_tx!(self, |db_tx| {
            let borrower = self.require_party(&db_tx, &cmd.borrower).await?;
            let lender = self.require_party(&db_tx, &cmd.lender).await?;
            if borrower.id == lender.id && !self.allow_self_obligations {
                return Err(EngineError::InvalidInput(format!(
                    "{} cannot owe themselves",
                    borrower.name
                )));
            }

            let active = obligations::ActiveModel {
                date: ActiveValue::Set(cmd.date),
                borrower_id: ActiveValue::Set(borrower.id.0),
                lender_id: ActiveValue::Set(lender.id.0),
                amount_minor: ActiveValue::Set(cmd.amount.cents()),
                description: ActiveValue::Set(description.clone()),
                status: ActiveValue::Set(ObligationStatus::Active.as_str().to_string()),
                ..Default::default()
            };
            let model = active.insert(&db_tx).await?;

            Ok(ObligationRecorded {
                id: ObligationId(model.id),
                borrower: borrower.name,
                lender: lender.name,
                amount: cmd.amount,
            })
        })?;

        tracing::info!(
            "recorded debt {}: {} owes {} {}",
            recorded.id,
            recorded.borrower,
            recorded.lender,
            recorded.amount
        );
        Ok(recorded)
    }

    /// Original amount minus everything paid against the obligation.
    pub async fn outstanding_balance(&self, id: ObligationId) -> ResultEngine<MoneyCents> {
        let obligation = Self::require_obligation(&self.database, id).await?;
        let paid = Self::paid_so_far(&self.database, id).await?;
        Self::balance_of(&obligation, paid)
    }

    /// Return an obligation with its payments.
    pub async fn obligation(&self, id: ObligationId) -> ResultEngine<ObligationDetail> {
        let obligation = Self::require_obligation(&self.database, id).await?;
        let payments: Vec<Payment> = payments::Entity::find()
            .filter(payments::Column::ObligationId.eq(id.0))
            .order_by_asc(payments::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Payment::from)
            .collect();
        let paid = MoneyCents::try_sum(payments.iter().map(|p| p.amount))?;
        let outstanding = Self::balance_of(&obligation, paid)?;
        let borrower = self.party(obligation.borrower_id).await?.name;
        let lender = self.party(obligation.lender_id).await?.name;

        Ok(ObligationDetail {
            obligation,
            borrower,
            lender,
            payments,
            outstanding,
        })
    }

    pub(super) async fn require_obligation<C: ConnectionTrait>(
        db: &C,
        id: ObligationId,
    ) -> ResultEngine<Obligation> {
        let model = obligations::Entity::find_by_id(id.0)
            .one(db)
            .await?
            .ok_or(EngineError::ObligationNotFound(id))?;
        Obligation::try_from(model)
    }

    /// Sum of the payments recorded against an obligation.
    pub(super) async fn paid_so_far<C: ConnectionTrait>(
        db: &C,
        id: ObligationId,
    ) -> ResultEngine<MoneyCents> {
        let paid = payments::Entity::find()
            .filter(payments::Column::ObligationId.eq(id.0))
            .all(db)
            .await?
            .into_iter()
            .map(|payment| MoneyCents::new(payment.amount_minor));
        MoneyCents::try_sum(paid)
    }

    pub(super) fn balance_of(obligation: &Obligation, paid: MoneyCents) -> ResultEngine<MoneyCents> {
        obligation
            .amount
            .checked_sub(paid)
            .filter(|balance| !balance.is_negative())
            .ok_or_else(|| {
                EngineError::InvariantViolation(format!(
                    "debt {} has {paid} paid against {}",
                    obligation.id, obligation.amount
                ))
            })
    }
}
