//! Named tools, their input schemas and dispatch.

use engine::{Engine, EngineError};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::{
    ServerError,
    types::{ToolDefinition, ToolResponse},
};

mod analysis;
mod expenses;
mod social;

pub(crate) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "log_personal_expense".to_string(),
            description: "Logs a personal expense. Leave is_healthy out when unknown; the \
                          response asks for clarification if the item was never learned."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "item": {"type": "string", "description": "What was bought"},
                    "amount": {"type": "number", "description": "Amount spent", "exclusiveMinimum": 0},
                    "category": {"type": "string", "description": "Spending category", "default": expenses::DEFAULT_CATEGORY},
                    "is_healthy": {"type": "boolean", "description": "Whether the item is healthy"}
                },
                "required": ["item", "amount"]
            }),
        },
        ToolDefinition {
            name: "learn_food_health".to_string(),
            description: "Teaches whether a food item is healthy. Use it when the user answers \
                          a clarification question."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "item": {"type": "string"},
                    "is_healthy": {"type": "boolean"}
                },
                "required": ["item", "is_healthy"]
            }),
        },
        ToolDefinition {
            name: "add_friend".to_string(),
            description: "Registers a friend for tracking shared debts.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "phone": {"type": "string", "description": "Optional contact"}
                },
                "required": ["name"]
            }),
        },
        ToolDefinition {
            name: "log_debt".to_string(),
            description: "Logs that the borrower owes the lender. Use 'Me' for the user, \
                          e.g. borrower='Me', lender='Alice' when the user owes Alice."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "borrower": {"type": "string"},
                    "lender": {"type": "string"},
                    "amount": {"type": "number", "exclusiveMinimum": 0},
                    "description": {"type": "string", "default": "Loan"}
                },
                "required": ["borrower", "lender", "amount"]
            }),
        },
        ToolDefinition {
            name: "record_payment".to_string(),
            description: "Records a payback and settles the payer's oldest debts to the \
                          receiver first."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "payer": {"type": "string"},
                    "receiver": {"type": "string"},
                    "amount": {"type": "number", "exclusiveMinimum": 0}
                },
                "required": ["payer", "receiver", "amount"]
            }),
        },
        ToolDefinition {
            name: "check_social_finances".to_string(),
            description: "BALANCE answers who owes whom; HISTORY lists debts and payments. \
                          Optionally filtered by person."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query_type": {"type": "string", "enum": ["BALANCE", "HISTORY"]},
                    "person": {"type": "string"}
                },
                "required": ["query_type"]
            }),
        },
        ToolDefinition {
            name: "analyze_spending".to_string(),
            description: "Spending of a month by category and health.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "month": {"type": "string", "pattern": "^\\d{4}-\\d{2}$", "description": "YYYY-MM, defaults to the current month"}
                }
            }),
        },
    ]
}

pub(crate) async fn call(
    engine: &Engine,
    name: &str,
    arguments: Value,
) -> Result<ToolResponse, ServerError> {
    match name {
        "log_personal_expense" => expenses::log_personal_expense(engine, parse(arguments)?).await,
        "learn_food_health" => expenses::learn_food_health(engine, parse(arguments)?).await,
        "add_friend" => social::add_friend(engine, parse(arguments)?).await,
        "log_debt" => social::log_debt(engine, parse(arguments)?).await,
        "record_payment" => social::record_payment(engine, parse(arguments)?).await,
        "check_social_finances" => {
            social::check_social_finances(engine, parse(arguments)?).await
        }
        "analyze_spending" => analysis::analyze_spending(engine, parse(arguments)?).await,
        other => Err(ServerError::UnknownTool(other.to_string())),
    }
}

fn parse<T: DeserializeOwned>(arguments: Value) -> Result<T, ServerError> {
    serde_json::from_value(arguments)
        .map_err(|err| ServerError::InvalidArguments(format!("invalid arguments: {err}")))
}

/// Read-only tools answer "no data" instead of failing when storage does.
fn degrade<T: Default>(result: Result<T, EngineError>, what: &str) -> Result<T, ServerError> {
    match result {
        Ok(value) => Ok(value),
        Err(EngineError::StorageFailure(db_err)) => {
            tracing::warn!("{what} unavailable, answering with no data: {db_err}");
            Ok(T::default())
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tool_has_an_object_schema() {
        let defs = definitions();
        assert_eq!(defs.len(), 7);
        for def in defs {
            assert_eq!(def.input_schema["type"], "object", "{}", def.name);
        }
    }

    #[test]
    fn degrade_hides_storage_failures_only() {
        let storage: Result<Vec<u8>, EngineError> =
            Err(EngineError::StorageFailure(sea_orm::DbErr::Custom("gone".to_string())));
        assert_eq!(degrade(storage, "test").ok(), Some(Vec::new()));

        let missing: Result<Vec<u8>, EngineError> =
            Err(EngineError::PartyNotFound("Zed".to_string()));
        assert!(degrade(missing, "test").is_err());
    }
}
