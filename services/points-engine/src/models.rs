use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /addTransaction`
///
/// Fields are kept as raw JSON so every malformed field can be reported at
/// once instead of failing on the first bad type.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AddTransactionRequest {
    #[serde(default)]
    pub payer: Value,
    #[serde(default)]
    pub points: Value,
    #[serde(default)]
    pub timestamp: Value,
}

/// Body of `POST /spendPoints`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpendPointsRequest {
    #[serde(default)]
    pub points: Value,
}

/// A contribution that passed payload validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTransaction {
    pub payer: String,
    pub points: i64,
    pub timestamp: DateTime<Utc>,
}

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body returned when a payload fails validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub message: String,
    pub error: Vec<String>,
}

pub const TRANSACTION_ADDED: &str = "Transaction added successfully.";
pub const NO_BALANCES: &str = "No balances on record.";
pub const CORRECT_REQUEST_BODY: &str = "Please correct request body.";
