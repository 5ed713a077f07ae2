//! Ledger & settlement engine.
//!
//! Tracks the owner's expenses, debts between parties and their repayments.
//! All state lives in the database handed to [`Engine::builder`]; the engine
//! keeps no in-memory copy of it.
//!
//! - Parties are resolved by normalized name; "me", "myself", ... resolve to
//!   the configured owner.
//! - Expenses need a healthiness, either given or learned.
//! - Payments settle the payer's oldest debts to the payee first.

pub use commands::{ExpenseCmd, ObligationCmd, PaymentCmd};
pub use error::EngineError;
pub use expenses::Expense;
pub use money::MoneyCents;
pub use obligations::{Obligation, ObligationId, ObligationStatus};
pub use ops::{
    BalanceRow, CategorySpend, DEFAULT_OWNER_NAME, Engine, EngineBuilder, HealthStatus,
    HistoryEntry, HistoryKind, LedgerQuery, MonthlySummary, ObligationDetail, current_month,
    parse_month,
};
pub use outcomes::{
    Allocation, ExpenseOutcome, ObligationRecorded, PartyOutcome, PaymentOutcome, Settlement,
};
pub use parties::{Party, PartyId};
pub use payments::Payment;

mod commands;
mod error;
mod expenses;
mod item_health;
mod money;
mod obligations;
mod ops;
mod outcomes;
mod parties;
mod payments;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
