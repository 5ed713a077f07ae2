//! CSV export of the ledger tables.
//!
//! Every file starts with its header row, so an empty table still produces a
//! valid (header-only) file.

use std::{
    collections::HashMap,
    error::Error,
    path::{Path, PathBuf},
};

use engine::{Engine, MoneyCents, PartyId};
use serde::Serialize;

const EXPENSE_HEADER: [&str; 6] = ["id", "date", "item", "amount", "category", "is_healthy"];
const DEBT_HEADER: [&str; 7] = [
    "id",
    "date",
    "borrower",
    "lender",
    "amount",
    "description",
    "status",
];
const PAYMENT_HEADER: [&str; 5] = ["id", "date", "debt_id", "payer", "amount"];

#[derive(Serialize)]
struct ExpenseRow {
    id: i64,
    date: String,
    item: String,
    amount: String,
    category: String,
    is_healthy: Option<bool>,
}

#[derive(Serialize)]
struct DebtRow {
    id: i64,
    date: String,
    borrower: String,
    lender: String,
    amount: String,
    description: String,
    status: &'static str,
}

#[derive(Serialize)]
struct PaymentRow {
    id: i64,
    date: String,
    debt_id: i64,
    payer: String,
    amount: String,
}

/// Files written by [`export_all`] and their row counts.
#[derive(Debug)]
pub(crate) struct ExportSummary {
    pub files: Vec<(PathBuf, usize)>,
}

/// Plain decimal form (`12.34`) for spreadsheets.
fn decimal(amount: MoneyCents) -> String {
    let cents = amount.cents();
    let sign = if cents < 0 { "-" } else { "" };
    format!("{sign}{}.{:02}", (cents / 100).abs(), (cents % 100).abs())
}

fn name(names: &HashMap<PartyId, String>, id: PartyId) -> String {
    names.get(&id).cloned().unwrap_or_else(|| id.to_string())
}

fn write_csv<R: Serialize>(
    path: &Path,
    header: &[&str],
    rows: &[R],
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub(crate) async fn export_all(
    engine: &Engine,
    dir: &Path,
) -> Result<ExportSummary, Box<dyn Error + Send + Sync>> {
    std::fs::create_dir_all(dir)?;
    let names = engine.party_names().await?;

    let expenses: Vec<ExpenseRow> = engine
        .all_expenses()
        .await?
        .into_iter()
        .map(|expense| ExpenseRow {
            id: expense.id,
            date: expense.date.to_string(),
            item: expense.item,
            amount: decimal(expense.amount),
            category: expense.category,
            is_healthy: expense.is_healthy,
        })
        .collect();

    let debts: Vec<DebtRow> = engine
        .all_obligations()
        .await?
        .into_iter()
        .map(|obligation| DebtRow {
            id: obligation.id.0,
            date: obligation.date.to_string(),
            borrower: name(&names, obligation.borrower_id),
            lender: name(&names, obligation.lender_id),
            amount: decimal(obligation.amount),
            description: obligation.description,
            status: obligation.status.as_str(),
        })
        .collect();

    let payments: Vec<PaymentRow> = engine
        .all_payments()
        .await?
        .into_iter()
        .map(|payment| PaymentRow {
            id: payment.id,
            date: payment.date.to_string(),
            debt_id: payment.obligation_id.0,
            payer: name(&names, payment.payer_id),
            amount: decimal(payment.amount),
        })
        .collect();

    let expenses_path = dir.join("expenses.csv");
    let debts_path = dir.join("debts.csv");
    let payments_path = dir.join("payments.csv");
    write_csv(&expenses_path, &EXPENSE_HEADER, &expenses)?;
    write_csv(&debts_path, &DEBT_HEADER, &debts)?;
    write_csv(&payments_path, &PAYMENT_HEADER, &payments)?;
    tracing::info!("exported ledger to {}", dir.display());

    Ok(ExportSummary {
        files: vec![
            (expenses_path, expenses.len()),
            (debts_path, debts.len()),
            (payments_path, payments.len()),
        ],
    })
}
