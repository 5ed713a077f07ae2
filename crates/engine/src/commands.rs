//! Command structs for engine write operations.
//!
//! These types group parameters for expense, obligation and payment writes,
//! keeping call sites readable and avoiding long argument lists. Every command
//! defaults to today's (UTC) date; surfaces that import history can override
//! it with `.date(..)`.

use chrono::{NaiveDate, Utc};

use crate::MoneyCents;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Record a personal expense.
#[derive(Clone, Debug)]
pub struct ExpenseCmd {
    pub item: String,
    pub amount: MoneyCents,
    pub category: String,
    /// Caller supplied healthiness. `None` defers to learned facts.
    pub is_healthy: Option<bool>,
    pub date: NaiveDate,
}

impl ExpenseCmd {
    pub const DEFAULT_CATEGORY: &'static str = "General";

    #[must_use]
    pub fn new(item: impl Into<String>, amount: MoneyCents) -> Self {
        Self {
            item: item.into(),
            amount,
            category: Self::DEFAULT_CATEGORY.to_string(),
            is_healthy: None,
            date: today(),
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn healthy(mut self, is_healthy: Option<bool>) -> Self {
        self.is_healthy = is_healthy;
        self
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }
}

/// Record that `borrower` owes `lender`.
#[derive(Clone, Debug)]
pub struct ObligationCmd {
    pub borrower: String,
    pub lender: String,
    pub amount: MoneyCents,
    pub description: String,
    pub date: NaiveDate,
}

impl ObligationCmd {
    pub const DEFAULT_DESCRIPTION: &'static str = "Loan";

    #[must_use]
    pub fn new(
        borrower: impl Into<String>,
        lender: impl Into<String>,
        amount: MoneyCents,
    ) -> Self {
        Self {
            borrower: borrower.into(),
            lender: lender.into(),
            amount,
            description: Self::DEFAULT_DESCRIPTION.to_string(),
            date: today(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }
}

/// Pay back `payee` on behalf of `payer`.
#[derive(Clone, Debug)]
pub struct PaymentCmd {
    pub payer: String,
    pub payee: String,
    pub amount: MoneyCents,
    pub date: NaiveDate,
}

impl PaymentCmd {
    #[must_use]
    pub fn new(payer: impl Into<String>, payee: impl Into<String>, amount: MoneyCents) -> Self {
        Self {
            payer: payer.into(),
            payee: payee.into(),
            amount,
            date: today(),
        }
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }
}
