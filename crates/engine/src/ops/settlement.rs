use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::{Expr, SimpleExpr},
};

use crate::{
    Allocation, Obligation, ObligationStatus, PaymentCmd, PaymentOutcome, ResultEngine,
    Settlement, obligations, payments, util::require_positive,
};

use super::{Engine, with_tx};

impl Engine {
    /// Applies a payment from `payer` to `payee` across the payer's active
    /// obligations to the payee, oldest first.
    ///
    /// Each obligation receives `min(remaining, balance)`; obligations whose
    /// payments reach the original amount become `Settled`. Iteration stops as
    /// soon as the payment is used up, so younger obligations stay untouched.
    /// Whatever exceeds the total outstanding balance is reported in
    /// [`Settlement::unapplied`] and not stored anywhere.
    ///
    /// The whole allocation is one transaction, run under a lock on the
    /// payer→payee pair.
    pub async fn apply_payment(&self, cmd: PaymentCmd) -> ResultEngine<PaymentOutcome> {
        require_positive(cmd.amount, "payment")?;
        let payer = self.require_party(&self.database, &cmd.payer).await?;
        let payee = self.require_party(&self.database, &cmd.payee).await?;

        let _pair_guard = self.settlement_locks.acquire(payer.id, payee.id).await;

        let outcome = with_tx!(self, |db_tx| {
            // Writing first takes the storage write lock before any balance is
            // read, so another process cannot interleave on these rows.
            obligations::Entity::update_many()
                .col_expr(
                    obligations::Column::Status,
                    SimpleExpr::from(Expr::col(obligations::Column::Status)),
                )
                .filter(obligations::Column::BorrowerId.eq(payer.id.0))
                .filter(obligations::Column::LenderId.eq(payee.id.0))
                .filter(obligations::Column::Status.eq(ObligationStatus::Active.as_str()))
                .exec(&db_tx)
                .await?;

            let active = obligations::Entity::find()
                .filter(obligations::Column::BorrowerId.eq(payer.id.0))
                .filter(obligations::Column::LenderId.eq(payee.id.0))
                .filter(obligations::Column::Status.eq(ObligationStatus::Active.as_str()))
                .order_by_asc(obligations::Column::Date)
                .order_by_asc(obligations::Column::Id)
                .all(&db_tx)
                .await?;

            if active.is_empty() {
                Ok(PaymentOutcome::NoActiveObligations {
                    payer: payer.name.clone(),
                    payee: payee.name.clone(),
                    amount: cmd.amount,
                })
            } else {
                let mut remaining = cmd.amount;
                let mut allocations = Vec::new();
                let mut settled = Vec::new();

                for model in active {
                    if !remaining.is_positive() {
                        break;
                    }
                    let obligation = Obligation::try_from(model)?;
                    let already_paid = Self::paid_so_far(&db_tx, obligation.id).await?;
                    let balance = Self::balance_of(&obligation, already_paid)?;
                    let chunk = remaining.min(balance);

                    if chunk.is_positive() {
                        let payment = payments::ActiveModel {
                            date: ActiveValue::Set(cmd.date),
                            obligation_id: ActiveValue::Set(obligation.id.0),
                            payer_id: ActiveValue::Set(payer.id.0),
                            amount_minor: ActiveValue::Set(chunk.cents()),
                            ..Default::default()
                        };
                        payment.insert(&db_tx).await?;
                        remaining -= chunk;
                        allocations.push(Allocation {
                            obligation_id: obligation.id,
                            amount: chunk,
                            remaining_balance: balance - chunk,
                        });
                    }

                    if already_paid.try_add(chunk)? >= obligation.amount {
                        let settle = obligations::ActiveModel {
                            id: ActiveValue::Set(obligation.id.0),
                            status: ActiveValue::Set(ObligationStatus::Settled.as_str().to_string()),
                            ..Default::default()
                        };
                        settle.update(&db_tx).await?;
                        settled.push(obligation.id);
                    }
                }

                Ok(PaymentOutcome::Applied(Settlement {
                    payer: payer.name.clone(),
                    payee: payee.name.clone(),
                    total_applied: cmd.amount - remaining,
                    allocations,
                    settled,
                    unapplied: remaining,
                }))
            }
        })?;

        match &outcome {
            PaymentOutcome::Applied(settlement) => tracing::info!(
                "{} paid {} {}: {} obligation(s) settled, {} unapplied",
                settlement.payer,
                settlement.payee,
                settlement.total_applied,
                settlement.settled.len(),
                settlement.unapplied
            ),
            PaymentOutcome::NoActiveObligations { payer, payee, amount } => tracing::warn!(
                "payment of {amount} from {payer} to {payee} has no active debt to settle"
            ),
        }
        Ok(outcome)
    }
}
