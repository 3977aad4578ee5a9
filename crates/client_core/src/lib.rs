use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};

use serde_json::Value;
use shared::{
    domain::{ActionTag, CartLineAction, ProductId},
    error::ErrorKind,
    protocol::CartUpdateRequest,
};
use tracing::{debug, error, info, warn};

pub mod checkout;
pub mod config;
pub mod cookie;
pub mod error;
pub mod session;
pub mod transport;

pub use checkout::{CheckoutClient, CheckoutFlow, CheckoutStep};
pub use config::{load_settings, ClientSettings};
pub use cookie::{cookie_value, SecurityToken};
pub use error::ClientError;
pub use session::{SessionContext, SessionUser};
pub use transport::StorefrontTransport;

/// The page the client runs against. Reconciliation after a cart mutation is a
/// full reload; the server is the only source of truth for cart state.
pub trait PageHost: Send + Sync {
    fn reload(&self);
    fn navigate(&self, path: &str);
    fn alert(&self, message: &str);
}

/// Where terminal failures end up. Nothing propagates past this point.
pub trait ErrorSink: Send + Sync {
    fn report(&self, error: &ClientError);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, err: &ClientError) {
        error!(kind = err.kind().as_str(), error = %err, "storefront request failed");
    }
}

/// The `data-product` / `data-action` attributes of an `update-cart` control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartControl {
    pub product: Option<String>,
    pub action: Option<String>,
}

impl CartControl {
    pub fn new(product: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            product: Some(product.into()),
            action: Some(action.into()),
        }
    }

    pub fn line_action(&self) -> Result<CartLineAction, ClientError> {
        let product = self
            .product
            .as_deref()
            .filter(|product| !product.trim().is_empty())
            .ok_or_else(|| ClientError::InvalidControl("missing product id".into()))?;
        let raw_action = self
            .action
            .as_deref()
            .ok_or_else(|| ClientError::InvalidControl("missing action".into()))?;
        let tag = ActionTag::parse(raw_action).ok_or_else(|| {
            ClientError::InvalidControl(format!("unknown action tag {raw_action:?}"))
        })?;
        Ok(CartLineAction::new(product, tag))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Anonymous,
    InFlight,
    InvalidControl,
}

/// What a click ended up doing. Clicks never fail towards their caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Reloaded,
    Failed(ErrorKind),
    Skipped(SkipReason),
}

/// Translates quantity-control clicks into `POST /updateitem/` calls.
pub struct CartUpdateClient {
    transport: StorefrontTransport,
    update_item_path: String,
    host: Arc<dyn PageHost>,
    errors: Arc<dyn ErrorSink>,
    in_flight: Mutex<HashSet<ProductId>>,
}

impl CartUpdateClient {
    pub fn new(
        settings: &ClientSettings,
        session: SessionContext,
        host: Arc<dyn PageHost>,
    ) -> Result<Self, ClientError> {
        Self::with_error_sink(settings, session, host, Arc::new(TracingErrorSink))
    }

    pub fn with_error_sink(
        settings: &ClientSettings,
        session: SessionContext,
        host: Arc<dyn PageHost>,
        errors: Arc<dyn ErrorSink>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            transport: StorefrontTransport::new(settings, session)?,
            update_item_path: settings.update_item_path.clone(),
            host,
            errors,
            in_flight: Mutex::new(HashSet::new()),
        })
    }

    pub fn session(&self) -> &SessionContext {
        self.transport.session()
    }

    pub async fn handle_control_click(&self, control: &CartControl) -> ClickOutcome {
        if !self.session().is_authenticated() {
            info!(product = ?control.product, "anonymous session, cart update not sent");
            return ClickOutcome::Skipped(SkipReason::Anonymous);
        }

        let line = match control.line_action() {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "ignoring click on malformed cart control");
                return ClickOutcome::Skipped(SkipReason::InvalidControl);
            }
        };
        debug!(
            product_id = %line.product_id,
            action = line.tag.raw(),
            "cart control clicked"
        );

        let Some(_slot) = self.claim(&line.product_id) else {
            debug!(product_id = %line.product_id, "cart update already in flight, click dropped");
            return ClickOutcome::Skipped(SkipReason::InFlight);
        };

        match self.submit_cart_update(&line).await {
            Ok(data) => {
                debug!(product_id = %line.product_id, %data, "cart updated, reloading page");
                self.host.reload();
                ClickOutcome::Reloaded
            }
            Err(err) => {
                self.errors.report(&err);
                ClickOutcome::Failed(err.kind())
            }
        }
    }

    /// Issues a single update for one cart line. The reply body is returned
    /// for logging only; callers decide between reload and no-op.
    pub async fn submit_cart_update(&self, line: &CartLineAction) -> Result<Value, ClientError> {
        if !self.session().is_authenticated() {
            return Err(ClientError::Anonymous);
        }
        info!(
            product_id = %line.product_id,
            action = line.tag.raw(),
            "sending cart update"
        );
        self.transport
            .post_json(&self.update_item_path, &CartUpdateRequest::from(line))
            .await
    }

    fn claim(&self, product_id: &ProductId) -> Option<InFlightSlot<'_>> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        in_flight.insert(product_id.clone()).then(|| InFlightSlot {
            in_flight: &self.in_flight,
            product_id: product_id.clone(),
        })
    }
}

/// Marks a product as having an outstanding update until dropped.
struct InFlightSlot<'a> {
    in_flight: &'a Mutex<HashSet<ProductId>>,
    product_id: ProductId,
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.product_id);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
