//! Tagged results of engine operations.
//!
//! Outcomes that are not failures (an item that needs a healthiness answer, a
//! payment with nothing to settle) are variants here rather than errors, so
//! surfaces match on them exhaustively.

use serde::Serialize;

use crate::{MoneyCents, ObligationId, Party};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExpenseOutcome {
    Recorded {
        expense_id: i64,
        item: String,
        amount: MoneyCents,
        is_healthy: bool,
    },
    /// Healthiness is unknown; nothing was written. Learn the item and retry.
    NeedsClarification { item: String, amount: MoneyCents },
}

impl ExpenseOutcome {
    pub fn message(&self) -> String {
        match self {
            Self::Recorded {
                item,
                amount,
                is_healthy,
                ..
            } => format!(
                "Logged: {item} ({amount}) as {}",
                health_label(*is_healthy)
            ),
            Self::NeedsClarification { item, .. } => format!(
                "Unknown item '{item}': is it healthy or unhealthy? Learn it, then log again."
            ),
        }
    }
}

pub(crate) fn health_label(is_healthy: bool) -> &'static str {
    if is_healthy { "Healthy" } else { "Unhealthy" }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "party", rename_all = "snake_case")]
pub enum PartyOutcome {
    Added(Party),
    AlreadyExists(Party),
}

impl PartyOutcome {
    pub fn party(&self) -> &Party {
        match self {
            Self::Added(party) | Self::AlreadyExists(party) => party,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Added(party) => format!("Friend added: {}", party.name),
            Self::AlreadyExists(party) => format!("Friend '{}' already exists.", party.name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ObligationRecorded {
    pub id: ObligationId,
    pub borrower: String,
    pub lender: String,
    pub amount: MoneyCents,
}

impl ObligationRecorded {
    pub fn message(&self) -> String {
        format!("Success: {} owes {} {}", self.borrower, self.lender, self.amount)
    }
}

/// One chunk of a payment applied to one obligation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Allocation {
    pub obligation_id: ObligationId,
    pub amount: MoneyCents,
    /// Balance left on the obligation after this chunk.
    pub remaining_balance: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub payer: String,
    pub payee: String,
    pub total_applied: MoneyCents,
    pub allocations: Vec<Allocation>,
    /// Obligations that transitioned to `Settled` during this payment.
    pub settled: Vec<ObligationId>,
    /// Excess over the total outstanding balance. Reported, never stored.
    pub unapplied: MoneyCents,
}

impl Settlement {
    pub fn message(&self) -> String {
        let mut message = format!(
            "Payment recorded: {} paid {} {}.",
            self.payer, self.payee, self.total_applied
        );
        for id in &self.settled {
            message.push_str(&format!(" Settled Debt {id}."));
        }
        if self.unapplied.is_positive() {
            message.push_str(&format!(
                " {} exceeded the outstanding debt and was not applied.",
                self.unapplied
            ));
        }
        message
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PaymentOutcome {
    Applied(Settlement),
    /// No active obligation from payer to payee; nothing was written.
    NoActiveObligations {
        payer: String,
        payee: String,
        amount: MoneyCents,
    },
}

impl PaymentOutcome {
    pub fn message(&self) -> String {
        match self {
            Self::Applied(settlement) => settlement.message(),
            Self::NoActiveObligations { payer, payee, .. } => {
                format!("No active debts found for {payer} -> {payee}.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settlement_message_lists_settled_and_excess() {
        let settlement = Settlement {
            payer: "Alice".to_string(),
            payee: "Me".to_string(),
            total_applied: MoneyCents::new(8000),
            allocations: Vec::new(),
            settled: vec![ObligationId(1), ObligationId(2)],
            unapplied: MoneyCents::new(2000),
        };
        assert_eq!(
            settlement.message(),
            "Payment recorded: Alice paid Me ₹80.00. Settled Debt #1. Settled Debt #2. \
             ₹20.00 exceeded the outstanding debt and was not applied."
        );
    }

    #[test]
    fn expense_message_mentions_health() {
        let outcome = ExpenseOutcome::Recorded {
            expense_id: 1,
            item: "Salad".to_string(),
            amount: MoneyCents::new(1550),
            is_healthy: true,
        };
        assert_eq!(outcome.message(), "Logged: Salad (₹15.50) as Healthy");
    }
}
