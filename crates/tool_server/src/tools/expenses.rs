use engine::{Engine, ExpenseCmd, ExpenseOutcome, MoneyCents};

use crate::{
    ServerError,
    types::{LearnFoodHealth, LogPersonalExpense, ToolResponse, ToolStatus},
};

/// Tool callers log food by default.
pub(super) const DEFAULT_CATEGORY: &str = "Food";

pub(super) async fn log_personal_expense(
    engine: &Engine,
    args: LogPersonalExpense,
) -> Result<ToolResponse, ServerError> {
    let amount = MoneyCents::from_f64(args.amount)?;
    let category = args
        .category
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    let cmd = ExpenseCmd::new(args.item, amount)
        .category(category)
        .healthy(args.is_healthy);

    let response = match engine.record_expense(cmd).await? {
        outcome @ ExpenseOutcome::Recorded { .. } => ToolResponse::success(outcome.message()),
        ExpenseOutcome::NeedsClarification { item, .. } => ToolResponse::new(
            ToolStatus::NeedsClarification,
            format!(
                "STOP: I cannot log '{item}' yet because I don't know if it is healthy. \
                 Please ask the user: 'Is {item} considered healthy or unhealthy?' \
                 Once they answer, use the 'learn_food_health' tool."
            ),
        ),
    };
    Ok(response)
}

pub(super) async fn learn_food_health(
    engine: &Engine,
    args: LearnFoodHealth,
) -> Result<ToolResponse, ServerError> {
    engine.learn_item_health(&args.item, args.is_healthy).await?;
    let label = if args.is_healthy { "Healthy" } else { "Unhealthy" };
    Ok(ToolResponse::success(format!(
        "Success: I have learned that '{}' is {label}. You can now try logging the expense again.",
        args.item.trim()
    )))
}
