use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod tool {
    use super::*;

    /// A tool as listed by `GET /tools`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ToolDefinition {
        pub name: String,
        pub description: String,
        /// JSON Schema of the tool arguments.
        #[serde(rename = "inputSchema")]
        pub input_schema: Value,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ToolList {
        pub tools: Vec<ToolDefinition>,
    }

    /// How a tool call ended.
    ///
    /// Only `Error` is a failure; the others are outcomes the caller reacts to
    /// (ask the user, register a party first, ...).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ToolStatus {
        Success,
        NeedsClarification,
        AlreadyExists,
        NoActiveObligations,
        NoRecords,
        Error,
    }

    /// Body of every tool response, errors included.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ToolResponse {
        pub status: ToolStatus,
        pub message: String,
    }

    impl ToolResponse {
        pub fn new(status: ToolStatus, message: impl Into<String>) -> Self {
            Self {
                status,
                message: message.into(),
            }
        }

        pub fn success(message: impl Into<String>) -> Self {
            Self::new(ToolStatus::Success, message)
        }
    }
}

pub mod expense {
    use super::*;

    /// Arguments of `log_personal_expense`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LogPersonalExpense {
        pub item: String,
        pub amount: f64,
        #[serde(default)]
        pub category: Option<String>,
        /// Leave empty when unknown; the server checks what it learned.
        #[serde(default)]
        pub is_healthy: Option<bool>,
    }

    /// Arguments of `learn_food_health`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LearnFoodHealth {
        pub item: String,
        pub is_healthy: bool,
    }
}

pub mod social {
    use super::*;

    /// Arguments of `add_friend`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AddFriend {
        pub name: String,
        #[serde(default)]
        pub phone: Option<String>,
    }

    /// Arguments of `log_debt`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LogDebt {
        pub borrower: String,
        pub lender: String,
        pub amount: f64,
        #[serde(default)]
        pub description: Option<String>,
    }

    /// Arguments of `record_payment`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordPayment {
        pub payer: String,
        pub receiver: String,
        pub amount: f64,
    }

    /// Arguments of `check_social_finances`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CheckSocialFinances {
        /// `BALANCE` or `HISTORY`, any case.
        pub query_type: String,
        #[serde(default)]
        pub person: Option<String>,
    }
}

pub mod analysis {
    use super::*;

    /// Arguments of `analyze_spending`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AnalyzeSpending {
        /// `YYYY-MM`; the current month when absent.
        #[serde(default)]
        pub month: Option<String>,
    }
}
