//! Read-only views over the ledger.
//!
//! Nothing here writes. Every query returns an empty collection (or a zeroed
//! summary) when there is no data.

use std::{
    collections::{BTreeMap, HashMap},
    str::FromStr,
};

use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{QueryFilter, QueryOrder, prelude::*};
use serde::Serialize;

use crate::{
    EngineError, Expense, MoneyCents, Obligation, ObligationId, ObligationStatus, Party, PartyId,
    Payment, ResultEngine, expenses, obligations, parties, payments,
};

use super::Engine;

/// Spending totals for one calendar month.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub count: usize,
    pub total: MoneyCents,
    pub healthy: MoneyCents,
    pub unhealthy: MoneyCents,
    pub unknown: MoneyCents,
}

impl MonthlySummary {
    /// Share of spending on healthy items, in percent. `None` without spending.
    pub fn healthy_share(&self) -> Option<f64> {
        if !self.total.is_positive() {
            return None;
        }
        Some(self.healthy.as_f64() / self.total.as_f64() * 100.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    Unknown,
}

impl HealthStatus {
    fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Self::Healthy,
            Some(false) => Self::Unhealthy,
            None => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Unhealthy => "Unhealthy",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategorySpend {
    pub category: String,
    pub health: HealthStatus,
    pub total: MoneyCents,
}

/// Outstanding amount a borrower owes a lender over all active obligations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BalanceRow {
    pub borrower: String,
    pub lender: String,
    pub outstanding: MoneyCents,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum HistoryKind {
    Debt,
    Payment,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub kind: HistoryKind,
    pub obligation_id: ObligationId,
    pub borrower: String,
    pub lender: String,
    pub description: String,
    pub amount: MoneyCents,
}

/// Social ledger question kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerQuery {
    /// "Who owes whom, and how much?"
    Balance,
    /// "What happened between us?"
    History,
}

impl FromStr for LedgerQuery {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BALANCE" => Ok(Self::Balance),
            "HISTORY" => Ok(Self::History),
            other => Err(EngineError::InvalidInput(format!(
                "unknown query type '{other}', expected BALANCE or HISTORY"
            ))),
        }
    }
}

fn month_bounds(year: i32, month: u32) -> ResultEngine<(NaiveDate, NaiveDate)> {
    let invalid = || EngineError::InvalidInput(format!("invalid month {month}/{year}"));
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    Ok((start, end))
}

/// Parses a `YYYY-MM` month.
pub fn parse_month(value: &str) -> ResultEngine<(i32, u32)> {
    let value = value.trim();
    let date = NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").map_err(|_| {
        EngineError::InvalidInput(format!("month '{value}' is not in YYYY-MM format"))
    })?;
    Ok((date.year(), date.month()))
}

/// `(year, month)` of today, for reports called without a month.
pub fn current_month() -> (i32, u32) {
    let today = Utc::now().date_naive();
    (today.year(), today.month())
}

impl Engine {
    /// Expenses dated within the given month, oldest first.
    pub async fn expenses_in_month(&self, year: i32, month: u32) -> ResultEngine<Vec<Expense>> {
        let (start, end) = month_bounds(year, month)?;
        let models = expenses::Entity::find()
            .filter(expenses::Column::Date.gte(start))
            .filter(expenses::Column::Date.lt(end))
            .order_by_asc(expenses::Column::Date)
            .order_by_asc(expenses::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Expense::from).collect())
    }

    /// Total, healthy, unhealthy and unknown spending of a month.
    pub async fn monthly_summary(&self, year: i32, month: u32) -> ResultEngine<MonthlySummary> {
        let expenses = self.expenses_in_month(year, month).await?;
        let mut summary = MonthlySummary {
            year,
            month,
            count: expenses.len(),
            ..Default::default()
        };
        for expense in expenses {
            summary.total = summary.total.try_add(expense.amount)?;
            let bucket = match HealthStatus::from_flag(expense.is_healthy) {
                HealthStatus::Healthy => &mut summary.healthy,
                HealthStatus::Unhealthy => &mut summary.unhealthy,
                HealthStatus::Unknown => &mut summary.unknown,
            };
            *bucket = bucket.try_add(expense.amount)?;
        }
        Ok(summary)
    }

    /// Spending of a month grouped by category and health status.
    pub async fn spending_by_category(
        &self,
        year: i32,
        month: u32,
    ) -> ResultEngine<Vec<CategorySpend>> {
        let expenses = self.expenses_in_month(year, month).await?;
        let mut totals: BTreeMap<(String, HealthStatus), MoneyCents> = BTreeMap::new();
        for expense in expenses {
            let health = HealthStatus::from_flag(expense.is_healthy);
            let total = totals.entry((expense.category, health)).or_default();
            *total = total.try_add(expense.amount)?;
        }
        Ok(totals
            .into_iter()
            .map(|((category, health), total)| CategorySpend {
                category,
                health,
                total,
            })
            .collect())
    }

    /// Outstanding balances per borrower→lender pair over active obligations,
    /// optionally restricted to pairs involving `person`.
    pub async fn balances(&self, person: Option<&str>) -> ResultEngine<Vec<BalanceRow>> {
        let person = self.person_filter(person).await?;
        let names = self.party_names().await?;
        let active = obligations::Entity::find()
            .filter(obligations::Column::Status.eq(ObligationStatus::Active.as_str()))
            .order_by_asc(obligations::Column::Id)
            .all(&self.database)
            .await?;
        let mut paid_by_obligation = self.paid_by_obligation().await?;

        let mut totals: BTreeMap<(PartyId, PartyId), MoneyCents> = BTreeMap::new();
        for model in active {
            let obligation = Obligation::try_from(model)?;
            if !involves(&obligation, person) {
                continue;
            }
            let paid = paid_by_obligation
                .remove(&obligation.id)
                .unwrap_or_default();
            let balance = Self::balance_of(&obligation, paid)?;
            let total = totals
                .entry((obligation.borrower_id, obligation.lender_id))
                .or_default();
            *total = total.try_add(balance)?;
        }

        Ok(totals
            .into_iter()
            .filter(|(_, outstanding)| outstanding.is_positive())
            .map(|((borrower, lender), outstanding)| BalanceRow {
                borrower: name_of(&names, borrower),
                lender: name_of(&names, lender),
                outstanding,
            })
            .collect())
    }

    /// Debts and payments, optionally restricted to those involving
    /// `person`, in date order (a debt before the payments of the same day).
    pub async fn history(&self, person: Option<&str>) -> ResultEngine<Vec<HistoryEntry>> {
        let person = self.person_filter(person).await?;
        let names = self.party_names().await?;
        let obligations: HashMap<ObligationId, Obligation> = self
            .all_obligations()
            .await?
            .into_iter()
            .filter(|obligation| involves(obligation, person))
            .map(|obligation| (obligation.id, obligation))
            .collect();

        let mut entries: Vec<HistoryEntry> = obligations
            .values()
            .map(|obligation| HistoryEntry {
                date: obligation.date,
                kind: HistoryKind::Debt,
                obligation_id: obligation.id,
                borrower: name_of(&names, obligation.borrower_id),
                lender: name_of(&names, obligation.lender_id),
                description: obligation.description.clone(),
                amount: obligation.amount,
            })
            .collect();

        for payment in self.all_payments().await? {
            let Some(obligation) = obligations.get(&payment.obligation_id) else {
                continue;
            };
            entries.push(HistoryEntry {
                date: payment.date,
                kind: HistoryKind::Payment,
                obligation_id: obligation.id,
                borrower: name_of(&names, obligation.borrower_id),
                lender: name_of(&names, obligation.lender_id),
                description: format!("payment towards {}", obligation.description),
                amount: payment.amount,
            });
        }

        entries.sort_by(|a, b| {
            (a.date, a.kind, a.obligation_id).cmp(&(b.date, b.kind, b.obligation_id))
        });
        Ok(entries)
    }

    /// Every expense, oldest first.
    pub async fn all_expenses(&self) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .order_by_asc(expenses::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Expense::from).collect())
    }

    /// Every obligation, in recording order.
    pub async fn all_obligations(&self) -> ResultEngine<Vec<Obligation>> {
        obligations::Entity::find()
            .order_by_asc(obligations::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Obligation::try_from)
            .collect()
    }

    /// Every payment, in recording order.
    pub async fn all_payments(&self) -> ResultEngine<Vec<Payment>> {
        let models = payments::Entity::find()
            .order_by_asc(payments::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Payment::from).collect())
    }

    /// Id → display name of every party.
    pub async fn party_names(&self) -> ResultEngine<HashMap<PartyId, String>> {
        let models = parties::Entity::find().all(&self.database).await?;
        Ok(models
            .into_iter()
            .map(Party::from)
            .map(|party| (party.id, party.name))
            .collect())
    }

    async fn person_filter(&self, person: Option<&str>) -> ResultEngine<Option<PartyId>> {
        match person.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => Ok(Some(self.resolve(name).await?)),
            None => Ok(None),
        }
    }

    async fn paid_by_obligation(&self) -> ResultEngine<HashMap<ObligationId, MoneyCents>> {
        let mut paid: HashMap<ObligationId, MoneyCents> = HashMap::new();
        for payment in self.all_payments().await? {
            let total = paid.entry(payment.obligation_id).or_default();
            *total = total.try_add(payment.amount)?;
        }
        Ok(paid)
    }
}

fn involves(obligation: &Obligation, person: Option<PartyId>) -> bool {
    match person {
        Some(id) => obligation.borrower_id == id || obligation.lender_id == id,
        None => true,
    }
}

fn name_of(names: &HashMap<PartyId, String>, id: PartyId) -> String {
    names
        .get(&id)
        .cloned()
        .unwrap_or_else(|| format!("party {id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn december_rolls_into_next_year() {
        let (start, end) = month_bounds(2025, 12).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn parse_month_reads_year_and_month() {
        assert_eq!(parse_month("2023-11").unwrap(), (2023, 11));
        assert_eq!(parse_month(" 2026-03 ").unwrap(), (2026, 3));
        assert!(parse_month("2023-13").is_err());
        assert!(parse_month("November").is_err());
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(month_bounds(2025, 13).is_err());
        assert!(month_bounds(2025, 0).is_err());
    }

    #[test]
    fn ledger_query_is_case_insensitive() {
        assert_eq!("balance".parse::<LedgerQuery>().unwrap(), LedgerQuery::Balance);
        assert_eq!(" History ".parse::<LedgerQuery>().unwrap(), LedgerQuery::History);
        assert!("totals".parse::<LedgerQuery>().is_err());
    }

    #[test]
    fn healthy_share_needs_spending() {
        let empty = MonthlySummary::default();
        assert_eq!(empty.healthy_share(), None);

        let summary = MonthlySummary {
            total: MoneyCents::new(400),
            healthy: MoneyCents::new(100),
            ..Default::default()
        };
        assert_eq!(summary.healthy_share(), Some(25.0));
    }
}
