use engine::{Engine, current_month, parse_month};

use crate::{
    ServerError,
    types::{AnalyzeSpending, ToolResponse, ToolStatus},
};

use super::degrade;

pub(super) async fn analyze_spending(
    engine: &Engine,
    args: AnalyzeSpending,
) -> Result<ToolResponse, ServerError> {
    let (year, month) = match args.month.as_deref() {
        Some(value) => parse_month(value)?,
        None => current_month(),
    };
    let label = format!("{year:04}-{month:02}");

    let rows = degrade(
        engine.spending_by_category(year, month).await,
        "spending analysis",
    )?;
    if rows.is_empty() {
        return Ok(ToolResponse::new(
            ToolStatus::NoRecords,
            format!("No spending data found for {label}."),
        ));
    }

    let mut message = format!("--- Spending Analysis ({label}) ---");
    for row in rows {
        message.push_str(&format!(
            "\n• {} ({}): {}",
            row.category,
            row.health.as_str(),
            row.total
        ));
    }
    Ok(ToolResponse::success(message))
}
