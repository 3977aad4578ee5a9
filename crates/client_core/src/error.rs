use shared::error::{CheckoutError, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("anonymous session cannot mutate server-side cart state")]
    Anonymous,
    #[error("invalid cart control: {0}")]
    InvalidControl(String),
    #[error("invalid storefront url {value:?}: {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} was rejected with status {status}{}", detail_suffix(.detail))]
    Status {
        url: String,
        status: u16,
        detail: Option<String>,
    },
    #[error("invalid response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|detail| format!(": {detail}"))
        .unwrap_or_default()
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Anonymous
            | Self::InvalidControl(_)
            | Self::InvalidUrl { .. }
            | Self::HttpClient(_)
            | Self::Checkout(_) => ErrorKind::Precondition,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Status { .. } => ErrorKind::Application,
            Self::Decode { .. } => ErrorKind::Decode,
        }
    }
}
