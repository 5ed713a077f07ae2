use engine::{
    Engine, HistoryKind, LedgerQuery, MoneyCents, ObligationCmd, PartyOutcome, PaymentCmd,
    PaymentOutcome,
};

use crate::{
    ServerError,
    types::{AddFriend, CheckSocialFinances, LogDebt, RecordPayment, ToolResponse, ToolStatus},
};

use super::degrade;

pub(super) async fn add_friend(
    engine: &Engine,
    args: AddFriend,
) -> Result<ToolResponse, ServerError> {
    let outcome = engine.add_party(&args.name, args.phone.as_deref()).await?;
    let status = match outcome {
        PartyOutcome::Added(_) => ToolStatus::Success,
        PartyOutcome::AlreadyExists(_) => ToolStatus::AlreadyExists,
    };
    Ok(ToolResponse::new(status, outcome.message()))
}

pub(super) async fn log_debt(engine: &Engine, args: LogDebt) -> Result<ToolResponse, ServerError> {
    let amount = MoneyCents::from_f64(args.amount)?;
    let mut cmd = ObligationCmd::new(args.borrower, args.lender, amount);
    if let Some(description) = args.description {
        cmd = cmd.description(description);
    }
    let recorded = engine.create_obligation(cmd).await?;
    Ok(ToolResponse::success(recorded.message()))
}

pub(super) async fn record_payment(
    engine: &Engine,
    args: RecordPayment,
) -> Result<ToolResponse, ServerError> {
    let amount = MoneyCents::from_f64(args.amount)?;
    let outcome = engine
        .apply_payment(PaymentCmd::new(args.payer, args.receiver, amount))
        .await?;
    let status = match outcome {
        PaymentOutcome::Applied(_) => ToolStatus::Success,
        PaymentOutcome::NoActiveObligations { .. } => ToolStatus::NoActiveObligations,
    };
    Ok(ToolResponse::new(status, outcome.message()))
}

pub(super) async fn check_social_finances(
    engine: &Engine,
    args: CheckSocialFinances,
) -> Result<ToolResponse, ServerError> {
    let query: LedgerQuery = args.query_type.parse()?;
    let person = args.person.as_deref();
    let mode = match query {
        LedgerQuery::Balance => "BALANCE",
        LedgerQuery::History => "HISTORY",
    };

    let lines: Vec<String> = match query {
        LedgerQuery::Balance => degrade(engine.balances(person).await, "balances")?
            .into_iter()
            .map(|row| format!("💰 {} owes {}: {}", row.borrower, row.lender, row.outstanding))
            .collect(),
        LedgerQuery::History => degrade(engine.history(person).await, "history")?
            .into_iter()
            .map(|entry| {
                let kind = match entry.kind {
                    HistoryKind::Debt => "debt",
                    HistoryKind::Payment => "payment",
                };
                format!(
                    "{} | {kind} | {} -> {} | {} | {}",
                    entry.date, entry.borrower, entry.lender, entry.description, entry.amount
                )
            })
            .collect(),
    };

    if lines.is_empty() {
        let who = person
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("everyone");
        return Ok(ToolResponse::new(
            ToolStatus::NoRecords,
            format!("No records found for '{who}' in mode {mode}."),
        ));
    }

    let mut message = format!("--- Social Report ({mode}) ---");
    for line in lines {
        message.push('\n');
        message.push_str(&line);
    }
    Ok(ToolResponse::success(message))
}
