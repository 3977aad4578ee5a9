use serde::{Deserialize, Serialize};

use crate::domain::{CartLineAction, CheckoutForm};

const MISSING_CITY: &str = "N/A";

/// Body of `POST /updateitem/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartUpdateRequest {
    #[serde(rename = "productID")]
    pub product_id: String,
    pub action: String,
}

impl From<&CartLineAction> for CartUpdateRequest {
    fn from(line: &CartLineAction) -> Self {
        Self {
            product_id: line.product_id.0.clone(),
            action: line.tag.raw().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

/// Denormalized order sent to `POST /checkout/process_order/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub items: Vec<OrderLine>,
}

impl OrderSnapshot {
    pub fn from_form(form: &CheckoutForm, items: Vec<OrderLine>) -> Self {
        Self {
            name: format!("{} {}", form.first_name, form.last_name),
            email: form.email.clone(),
            address: form.address.clone(),
            city: form
                .city
                .clone()
                .unwrap_or_else(|| MISSING_CITY.to_string()),
            state: form.state.clone(),
            zip: form.zip.clone(),
            items,
        }
    }

    pub fn total(&self) -> f64 {
        self.items
            .iter()
            .map(|line| line.price * f64::from(line.quantity))
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOrderResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
}
