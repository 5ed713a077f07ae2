use std::{error::Error, io::IsTerminal, path::PathBuf};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use engine::{
    DEFAULT_OWNER_NAME, Engine, EngineError, ExpenseCmd, ExpenseOutcome, HistoryKind, MoneyCents,
    ObligationCmd, ObligationId, PaymentCmd, current_month,
};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

mod export;
mod prompt;

#[derive(Parser, Debug)]
#[command(name = "fiscalfit")]
#[command(about = "Personal expenses, shared debts and paybacks")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./fiscalfit.db?mode=rwc"
    )]
    database_url: String,

    /// Name of the ledger owner; "me", "i", "myself", ... refer to it.
    #[arg(long, env = "FISCALFIT_OWNER", default_value = DEFAULT_OWNER_NAME)]
    owner: String,

    /// Refuse debts where borrower and lender are the same party.
    #[arg(long)]
    forbid_self_debts: bool,

    /// Log level for diagnostics on stderr.
    #[arg(long, env = "FISCALFIT_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log a personal expense.
    LogExpense(LogExpenseArgs),
    /// Teach whether an item is healthy.
    Learn(LearnArgs),
    /// Register a friend.
    AddParty(AddPartyArgs),
    /// Log a debt: BORROWER owes LENDER.
    LogDebt(LogDebtArgs),
    /// Record a payback, settling the oldest debts first.
    RecordPayment(RecordPaymentArgs),
    /// Show every registered party.
    ListParties,
    /// Spending summary of a month.
    Report(ReportArgs),
    /// Outstanding balances per borrower and lender.
    Balances(PersonArgs),
    /// Debts and payments in date order.
    History(PersonArgs),
    /// Show one debt with its payments.
    Debt(DebtArgs),
    /// Write expenses.csv, debts.csv and payments.csv.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct LogExpenseArgs {
    item: String,
    amount: MoneyCents,
    #[arg(long = "cat", default_value = ExpenseCmd::DEFAULT_CATEGORY)]
    category: String,
    /// 1 for healthy, 0 for unhealthy; asked interactively when unknown.
    #[arg(long, value_parser = parse_flag)]
    healthy: Option<bool>,
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct LearnArgs {
    item: String,
    /// 1 for healthy, 0 for unhealthy.
    #[arg(action = clap::ArgAction::Set, value_parser = parse_flag)]
    healthy: bool,
}

#[derive(Args, Debug)]
struct AddPartyArgs {
    name: String,
    #[arg(long)]
    phone: Option<String>,
}

#[derive(Args, Debug)]
struct LogDebtArgs {
    borrower: String,
    lender: String,
    amount: MoneyCents,
    #[arg(long = "desc", default_value = ObligationCmd::DEFAULT_DESCRIPTION)]
    description: String,
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct RecordPaymentArgs {
    payer: String,
    receiver: String,
    amount: MoneyCents,
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Month number (1-12); defaults to the current month.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
    #[arg(long)]
    year: Option<i32>,
}

#[derive(Args, Debug)]
struct PersonArgs {
    #[arg(long)]
    person: Option<String>,
}

#[derive(Args, Debug)]
struct DebtArgs {
    id: i64,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[arg(long, default_value = "reports")]
    dir: PathBuf,
}

fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "healthy" => Ok(true),
        "0" | "false" | "no" | "unhealthy" => Ok(false),
        other => Err(format!("expected 1 or 0, got '{other}'")),
    }
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn log_expense(
    engine: &Engine,
    args: LogExpenseArgs,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut cmd = ExpenseCmd::new(&args.item, args.amount)
        .category(&args.category)
        .healthy(args.healthy);
    if let Some(date) = args.date {
        cmd = cmd.date(date);
    }

    let mut outcome = engine.record_expense(cmd.clone()).await?;
    if let ExpenseOutcome::NeedsClarification { item, .. } = &outcome {
        if !std::io::stdin().is_terminal() {
            return Err(format!(
                "'{item}' is unknown: learn it first or pass --healthy 1|0"
            )
            .into());
        }
        let healthy = prompt::ask_healthy(item)?;
        engine.learn_item_health(item, healthy).await?;
        outcome = engine.record_expense(cmd.healthy(Some(healthy))).await?;
    }

    match outcome {
        ExpenseOutcome::Recorded { .. } => println!("✅ {}", outcome.message()),
        ExpenseOutcome::NeedsClarification { .. } => eprintln!("❌ {}", outcome.message()),
    }
    Ok(())
}

async fn report(engine: &Engine, args: ReportArgs) -> Result<(), EngineError> {
    let (current_year, current) = current_month();
    let month = args.month.unwrap_or(current);
    let year = args.year.unwrap_or(current_year);

    let summary = engine.monthly_summary(year, month).await?;
    println!("--- 📅 Monthly Report for {month}/{year} ---");
    if summary.count == 0 {
        println!("No expenses recorded for this month.");
        return Ok(());
    }
    println!("💰 Total Spent:   {}", summary.total);
    println!("🥗 Healthy:       {}", summary.healthy);
    println!("🍔 Unhealthy:     {}", summary.unhealthy);
    if summary.unknown.is_positive() {
        println!("❔ Unknown:       {}", summary.unknown);
    }
    if let Some(share) = summary.healthy_share() {
        println!("📈 Diet Score:    {share:.1}% Healthy Spending");
    }

    let by_category = engine.spending_by_category(year, month).await?;
    if !by_category.is_empty() {
        println!();
        for row in by_category {
            println!("• {} ({}): {}", row.category, row.health.as_str(), row.total);
        }
    }
    Ok(())
}

async fn execute(engine: &Engine, command: Command) -> Result<(), Box<dyn Error + Send + Sync>> {
    match command {
        Command::LogExpense(args) => log_expense(engine, args).await?,
        Command::Learn(args) => {
            engine.learn_item_health(&args.item, args.healthy).await?;
            let label = if args.healthy { "Healthy" } else { "Unhealthy" };
            println!("✅ Learned that '{}' is {label}", args.item.trim());
        }
        Command::AddParty(args) => {
            let outcome = engine.add_party(&args.name, args.phone.as_deref()).await?;
            println!("{}", outcome.message());
        }
        Command::LogDebt(args) => {
            let mut cmd = ObligationCmd::new(args.borrower, args.lender, args.amount)
                .description(args.description);
            if let Some(date) = args.date {
                cmd = cmd.date(date);
            }
            let recorded = engine.create_obligation(cmd).await?;
            println!("{} (debt {})", recorded.message(), recorded.id);
        }
        Command::RecordPayment(args) => {
            let mut cmd = PaymentCmd::new(args.payer, args.receiver, args.amount);
            if let Some(date) = args.date {
                cmd = cmd.date(date);
            }
            let outcome = engine.apply_payment(cmd).await?;
            println!("{}", outcome.message());
        }
        Command::ListParties => {
            println!("--- Friends List ---");
            for party in engine.list_parties().await? {
                match party.contact {
                    Some(contact) => println!("- {} ({contact})", party.name),
                    None => println!("- {}", party.name),
                }
            }
        }
        Command::Report(args) => report(engine, args).await?,
        Command::Balances(args) => {
            let rows = engine.balances(args.person.as_deref()).await?;
            if rows.is_empty() {
                println!("No outstanding debts.");
            }
            for row in rows {
                println!("💰 {} owes {}: {}", row.borrower, row.lender, row.outstanding);
            }
        }
        Command::History(args) => {
            let entries = engine.history(args.person.as_deref()).await?;
            if entries.is_empty() {
                println!("No records found.");
            }
            for entry in entries {
                let kind = match entry.kind {
                    HistoryKind::Debt => "debt",
                    HistoryKind::Payment => "payment",
                };
                println!(
                    "{} | {kind:<7} | {} -> {} | {} | {}",
                    entry.date, entry.borrower, entry.lender, entry.description, entry.amount
                );
            }
        }
        Command::Debt(args) => {
            let detail = engine.obligation(ObligationId(args.id)).await?;
            let obligation = &detail.obligation;
            println!(
                "Debt {}: {} owes {} {} ({}, {})",
                obligation.id,
                detail.borrower,
                detail.lender,
                obligation.amount,
                obligation.description,
                obligation.status.as_str()
            );
            for payment in &detail.payments {
                println!("  {} paid {}", payment.date, payment.amount);
            }
            println!("Outstanding: {}", detail.outstanding);
        }
        Command::Export(args) => {
            let summary = export::export_all(engine, &args.dir).await?;
            for (path, rows) in summary.files {
                println!("📊 {} ({rows} rows)", path.display());
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "fiscalfit={},engine={}",
            cli.log_level, cli.log_level
        ))
        .init();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder()
        .database(db)
        .owner_name(cli.owner.as_str())
        .allow_self_obligations(!cli.forbid_self_debts)
        .build()
        .await?;
    engine.ensure_owner().await?;

    if let Err(err) = execute(&engine, cli.command).await {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_accept_one_or_zero() {
        assert_eq!(parse_flag("1"), Ok(true));
        assert_eq!(parse_flag(" 0 "), Ok(false));
        assert_eq!(parse_flag("Healthy"), Ok(true));
        assert!(parse_flag("2").is_err());
    }

    #[test]
    fn log_expense_parses_amount_and_flag() {
        let cli = Cli::try_parse_from([
            "fiscalfit",
            "log-expense",
            "Burger",
            "15,50",
            "--cat",
            "Food",
            "--healthy",
            "0",
        ])
        .unwrap();
        let Command::LogExpense(args) = cli.command else {
            panic!("expected log-expense");
        };
        assert_eq!(args.amount, MoneyCents::new(1550));
        assert_eq!(args.healthy, Some(false));
        assert_eq!(args.category, "Food");
    }

    #[test]
    fn report_month_is_bounded() {
        assert!(Cli::try_parse_from(["fiscalfit", "report", "--month", "13"]).is_err());
    }

    #[test]
    fn non_numeric_amounts_are_rejected() {
        let parsed = Cli::try_parse_from(["fiscalfit", "log-debt", "Me", "Alice", "lots"]);
        assert!(parsed.is_err());
    }
}
