use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id_newtype!(ProductId);

/// Quantity adjustment a cart control asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartAction {
    Increment,
    Decrement,
    Remove,
}

impl CartAction {
    /// Classifies a UI action tag. Storefront templates are not consistent
    /// about vocabulary, so the common synonyms are accepted.
    pub fn classify(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "increment" | "add" => Some(Self::Increment),
            "decrement" | "subtract" => Some(Self::Decrement),
            "remove" | "delete" => Some(Self::Remove),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Increment => "increment",
            Self::Decrement => "decrement",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for CartAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action tag exactly as the control carried it, paired with its
/// classification. The raw tag is what goes over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionTag {
    raw: String,
    action: CartAction,
}

impl ActionTag {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let action = CartAction::classify(trimmed)?;
        Some(Self {
            raw: trimmed.to_string(),
            action,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn action(&self) -> CartAction {
        self.action
    }
}

impl From<CartAction> for ActionTag {
    fn from(action: CartAction) -> Self {
        Self {
            raw: action.as_str().to_string(),
            action,
        }
    }
}

/// The (item, operation) pair behind a single quantity-adjustment click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineAction {
    pub product_id: ProductId,
    pub tag: ActionTag,
}

impl CartLineAction {
    pub fn new(product_id: impl Into<String>, tag: ActionTag) -> Self {
        Self {
            product_id: ProductId(product_id.into()),
            tag,
        }
    }
}

/// Values of the checkout details form, as read from its inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    pub state: String,
    pub zip: String,
}

/// One radio button of the shipping method group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingOption {
    pub value: String,
    pub checked: bool,
}
