use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse failure classification, stable enough to log and to assert on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request was never sent: anonymous session or malformed input.
    Precondition,
    /// The network call itself failed.
    Transport,
    /// The server answered with a non-success status.
    Application,
    /// The server answered with success but an unreadable body.
    Decode,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Precondition => "precondition",
            Self::Transport => "transport",
            Self::Application => "application",
            Self::Decode => "decode",
        }
    }
}

/// Error body the storefront returns alongside failing statuses, e.g.
/// `{"error": "User not authenticated"}` or `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Validation failure for checkout forms. The display text is the message
/// shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Please fill in all required fields before proceeding.")]
    MissingFields(Vec<&'static str>),
    #[error("Please select a shipping method before proceeding.")]
    NoShippingMethod,
}
