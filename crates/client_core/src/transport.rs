use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::error::ApiErrorBody;
use tracing::{debug, warn};
use url::Url;

use crate::{config::ClientSettings, error::ClientError, session::SessionContext};

pub const CSRF_HEADER: &str = "X-CSRFToken";

/// JSON-over-HTTP plumbing shared by the cart and checkout clients.
pub struct StorefrontTransport {
    http: Client,
    base_url: Url,
    session: SessionContext,
}

impl StorefrontTransport {
    pub fn new(settings: &ClientSettings, session: SessionContext) -> Result<Self, ClientError> {
        let base_url = Url::parse(&settings.base_url).map_err(|source| ClientError::InvalidUrl {
            value: settings.base_url.clone(),
            source,
        })?;

        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::HttpClient)?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|source| ClientError::InvalidUrl {
                value: path.to_string(),
                source,
            })
    }

    /// POSTs `body` as JSON and decodes a JSON reply. Any non-2xx status is a
    /// failure, whatever the body says.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let url_text = url.to_string();

        let mut request = self.http.post(url).json(body);
        match &self.session.security_token {
            Some(token) => request = request.header(CSRF_HEADER, token.as_str()),
            None => warn!(url = %url_text, "no security token available, sending without {CSRF_HEADER}"),
        }

        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url_text.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .ok()
                .and_then(|text| serde_json::from_str::<ApiErrorBody>(&text).ok())
                .and_then(|body| body.error)
                .or_else(|| status.canonical_reason().map(str::to_string));
            return Err(ClientError::Status {
                url: url_text,
                status: status.as_u16(),
                detail,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport {
                url: url_text.clone(),
                source,
            })?;
        debug!(url = %url_text, status = status.as_u16(), bytes = bytes.len(), "storefront response");

        serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
            url: url_text,
            source,
        })
    }
}
