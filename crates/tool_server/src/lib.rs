use api_types::tool::{ToolResponse, ToolStatus};
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use server::{ServerState, router, run_with_listener};

mod server;
mod tools;

pub mod types {
    pub use api_types::{
        analysis::AnalyzeSpending,
        expense::{LearnFoodHealth, LogPersonalExpense},
        social::{AddFriend, CheckSocialFinances, LogDebt, RecordPayment},
        tool::{ToolDefinition, ToolList, ToolResponse, ToolStatus},
    };
}

pub enum ServerError {
    Engine(EngineError),
    /// Arguments that do not match the tool's input schema.
    InvalidArguments(String),
    UnknownTool(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::PartyNotFound(_) | EngineError::ObligationNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        EngineError::InvariantViolation(_) | EngineError::StorageFailure(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::StorageFailure(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::InvariantViolation(detail) => {
            tracing::error!("ledger invariant violated: {detail}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::InvalidArguments(err) => (StatusCode::UNPROCESSABLE_ENTITY, err),
            ServerError::UnknownTool(name) => {
                (StatusCode::NOT_FOUND, format!("Unknown tool: {name}"))
            }
        };

        (status, Json(ToolResponse::new(ToolStatus::Error, message))).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_invalid_input_maps_to_422() {
        let res = ServerError::from(EngineError::InvalidInput("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn engine_party_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::PartyNotFound("Zed".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_obligation_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::ObligationNotFound(engine::ObligationId(3)))
            .into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_failure_maps_to_500_and_is_redacted() {
        let err = EngineError::StorageFailure(sea_orm_err("disk I/O error"));
        assert_eq!(status_for_engine_error(&err), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message_for_engine_error(err), "internal server error");
    }

    #[test]
    fn invariant_violation_maps_to_500() {
        let res = ServerError::from(EngineError::InvariantViolation("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn bad_arguments_map_to_422() {
        let res = ServerError::InvalidArguments("missing field `item`".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn unknown_tool_maps_to_404() {
        let res = ServerError::UnknownTool("nope".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    fn sea_orm_err(message: &str) -> sea_orm::DbErr {
        sea_orm::DbErr::Custom(message.to_string())
    }
}
