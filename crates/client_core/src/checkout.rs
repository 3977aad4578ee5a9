//! Checkout details/shipping validation and order submission.

use std::sync::Arc;

use shared::{
    domain::{CheckoutForm, ShippingOption},
    error::CheckoutError,
    protocol::{OrderSnapshot, ProcessOrderResponse},
};
use tracing::{info, warn};

use crate::{
    config::ClientSettings, error::ClientError, session::SessionContext,
    transport::StorefrontTransport, ErrorSink, PageHost, TracingErrorSink,
};

const ORDER_FAILED_MESSAGE: &str = "Error placing order. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    Cart,
    Details,
    Shipping,
    Payment,
}

impl CheckoutStep {
    pub fn path(self) -> &'static str {
        match self {
            Self::Cart => "/cart/",
            Self::Details => "/checkout/",
            Self::Shipping => "/checkout/shipping/",
            Self::Payment => "/checkout/payment/",
        }
    }
}

/// Checks the details form and returns the step to move to.
///
/// `state` comes from a select element and is checked as given; every other
/// required field must be non-blank after trimming.
pub fn validate_checkout_form(form: &CheckoutForm) -> Result<CheckoutStep, CheckoutError> {
    let trimmed_fields = [
        ("first_name", &form.first_name),
        ("last_name", &form.last_name),
        ("email", &form.email),
        ("address", &form.address),
    ];

    let mut missing: Vec<&'static str> = trimmed_fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if form.state.is_empty() {
        missing.push("state");
    }
    if form.zip.trim().is_empty() {
        missing.push("zip");
    }

    if missing.is_empty() {
        Ok(CheckoutStep::Shipping)
    } else {
        Err(CheckoutError::MissingFields(missing))
    }
}

/// Returns the selected shipping method, if any radio button is checked.
pub fn validate_shipping_selection(
    options: &[ShippingOption],
) -> Result<&ShippingOption, CheckoutError> {
    options
        .iter()
        .find(|option| option.checked)
        .ok_or(CheckoutError::NoShippingMethod)
}

/// Drives the "proceed" buttons: validate, then either navigate to the next
/// step or alert the shopper.
pub struct CheckoutFlow {
    host: Arc<dyn PageHost>,
}

impl CheckoutFlow {
    pub fn new(host: Arc<dyn PageHost>) -> Self {
        Self { host }
    }

    pub fn proceed_to_shipping(&self, form: &CheckoutForm) -> bool {
        match validate_checkout_form(form) {
            Ok(next) => {
                self.host.navigate(next.path());
                true
            }
            Err(err) => {
                if let CheckoutError::MissingFields(fields) = &err {
                    info!(?fields, "checkout details incomplete");
                }
                self.host.alert(&err.to_string());
                false
            }
        }
    }

    pub fn proceed_to_payment(&self, options: &[ShippingOption]) -> bool {
        match validate_shipping_selection(options) {
            Ok(option) => {
                info!(method = %option.value, "shipping method selected");
                self.host.navigate(CheckoutStep::Payment.path());
                true
            }
            Err(err) => {
                self.host.alert(&err.to_string());
                false
            }
        }
    }
}

/// Submits order snapshots to `POST /checkout/process_order/`.
pub struct CheckoutClient {
    transport: StorefrontTransport,
    process_order_path: String,
    host: Arc<dyn PageHost>,
    errors: Arc<dyn ErrorSink>,
}

impl CheckoutClient {
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
            process_order_path: settings.process_order_path.clone(),
            host,
            errors,
        })
    }

    /// Success is the HTTP status alone; a `message` field in the reply is
    /// informational.
    pub async fn process_order(
        &self,
        snapshot: &OrderSnapshot,
    ) -> Result<ProcessOrderResponse, ClientError> {
        if !self.transport.session().is_authenticated() {
            return Err(ClientError::Anonymous);
        }
        if snapshot.items.is_empty() {
            warn!("submitting order snapshot without items");
        }
        info!(
            items = snapshot.items.len(),
            total = snapshot.total(),
            "submitting order"
        );
        self.transport
            .post_json(&self.process_order_path, snapshot)
            .await
    }

    /// Submits the order and moves on to shipping, or alerts the shopper.
    pub async fn place_order_and_redirect(&self, snapshot: &OrderSnapshot) -> bool {
        match self.process_order(snapshot).await {
            Ok(response) => {
                info!(
                    order_number = response.order_number.as_deref().unwrap_or("-"),
                    "order accepted"
                );
                self.host.navigate(CheckoutStep::Shipping.path());
                true
            }
            Err(err) => {
                self.errors.report(&err);
                self.host.alert(ORDER_FAILED_MESSAGE);
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/checkout_tests.rs"]
mod tests;
