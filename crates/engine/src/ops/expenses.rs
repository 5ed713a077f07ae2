use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{
    ExpenseCmd, ExpenseOutcome, ResultEngine, expenses,
    util::{normalize_display, normalize_key, normalize_optional_text, require_positive},
};

use super::{Engine, with_tx};

impl Engine {
    /// Records a personal expense.
    ///
    /// Healthiness comes from the command or, when absent, from the learned
    /// facts. If neither knows, nothing is written and the outcome asks the
    /// caller for clarification; the caller is expected to
    /// [`learn_item_health`](Engine::learn_item_health) and call again.
    pub async fn record_expense(&self, cmd: ExpenseCmd) -> ResultEngine<ExpenseOutcome> {
        let item = normalize_display(&cmd.item, "item")?;
        let key = normalize_key(&cmd.item, "item")?;
        require_positive(cmd.amount, "expense")?;
        let category = normalize_optional_text(Some(cmd.category.as_str()))
            .unwrap_or_else(|| ExpenseCmd::DEFAULT_CATEGORY.to_string());

        let outcome = with_tx!(self, |db_tx| {
            let known = match cmd.is_healthy {
                Some(value) => Some(value),
                None => Self::find_item_health(&db_tx, &key).await?,
            };
            match known {
                None => Ok(ExpenseOutcome::NeedsClarification {
                    item: item.clone(),
                    amount: cmd.amount,
                }),
                Some(is_healthy) => {
                    let active = expenses::ActiveModel {
                        date: ActiveValue::Set(cmd.date),
                        item: ActiveValue::Set(item.clone()),
                        amount_minor: ActiveValue::Set(cmd.amount.cents()),
                        category: ActiveValue::Set(category.clone()),
                        is_healthy: ActiveValue::Set(Some(is_healthy)),
                        ..Default::default()
                    };
                    let model = active.insert(&db_tx).await?;
                    Ok(ExpenseOutcome::Recorded {
                        expense_id: model.id,
                        item: item.clone(),
                        amount: cmd.amount,
                        is_healthy,
                    })
                }
            }
        })?;

        match &outcome {
            ExpenseOutcome::Recorded { expense_id, .. } => {
                tracing::info!("recorded expense {expense_id}: {item} {}", cmd.amount);
            }
            ExpenseOutcome::NeedsClarification { .. } => {
                tracing::debug!("healthiness of '{item}' unknown, asking for clarification");
            }
        }
        Ok(outcome)
    }
}
