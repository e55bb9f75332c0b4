//! The invoice record as delivered by the backend.
//!
//! These types are read-only inputs to the export pipeline. Keys follow the
//! backend's camelCase JSON; line items may arrive as `items` or
//! `invoiceDetails`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, de};
use std::fmt;
use thiserror::Error;

/// An invoice identifier; the backend sends either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvoiceId(String);

impl InvoiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for InvoiceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum IdDef {
            Str(String),
            Int(u64),
        }

        match IdDef::deserialize(deserializer)? {
            IdDef::Str(s) if s.trim().is_empty() => Err(de::Error::custom("invoice id is empty")),
            IdDef::Str(s) => Ok(InvoiceId(s)),
            IdDef::Int(n) => Ok(InvoiceId(n.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Brand {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Category {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    #[serde(alias = "unitPrice")]
    pub price: f64,
    #[serde(default)]
    pub brand: Option<Brand>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product: Product,
    pub quantity: f64,
    #[serde(default)]
    pub subtotal: Option<f64>,
}

impl LineItem {
    /// The stored subtotal, or `unit price × quantity` when the backend left it out.
    pub fn subtotal(&self) -> f64 {
        self.subtotal
            .unwrap_or(self.product.price * self.quantity)
    }

    /// Product name, followed by the brand and the category names when present.
    pub fn description(&self) -> String {
        let mut text = self.product.name.clone();
        if let Some(brand) = self.product.brand.as_ref().filter(|b| !b.name.is_empty()) {
            text.push_str(" - ");
            text.push_str(&brand.name);
        }
        let categories: Vec<&str> = self
            .product
            .categories
            .iter()
            .map(|c| c.name.as_str())
            .filter(|name| !name.is_empty())
            .collect();
        if !categories.is_empty() {
            text.push_str(&format!(" ({})", categories.join(", ")));
        }
        text
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// The user who issued the invoice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Creator {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// The "bill to" fields an invoice resolves to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl Contact {
    /// Present, non-blank fields in display order.
    pub fn lines(&self) -> Vec<&str> {
        [&self.name, &self.email, &self.phone, &self.address]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub price_total: Option<f64>,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default, alias = "createdBy")]
    pub user: Option<Creator>,
    #[serde(default, alias = "invoiceDetails")]
    pub items: Option<Vec<LineItem>>,
}

impl Invoice {
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: InvoiceId::new(id),
            created_at,
            price_total: None,
            customer: None,
            user: None,
            items: None,
        }
    }

    pub fn items(&self) -> &[LineItem] {
        self.items.as_deref().unwrap_or_default()
    }

    /// Sum of every item's explicit or derived subtotal.
    pub fn computed_subtotal(&self) -> f64 {
        self.items().iter().map(LineItem::subtotal).sum()
    }

    /// The stored total when present, otherwise the computed subtotal.
    pub fn total(&self) -> f64 {
        self.price_total.unwrap_or_else(|| self.computed_subtotal())
    }

    /// The linked customer's contact fields, or the creator's name and email
    /// when no customer is linked.
    pub fn billing_contact(&self) -> Contact {
        match (&self.customer, &self.user) {
            (Some(customer), _) => Contact {
                name: customer.name.clone(),
                email: customer.email.clone(),
                phone: customer.phone.clone(),
                address: customer.address.clone(),
            },
            (None, Some(user)) => Contact {
                name: user.name.clone(),
                email: user.email.clone(),
                ..Default::default()
            },
            (None, None) => Contact::default(),
        }
    }

    /// Rejects negative or non-finite amounts before anything is laid out.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(total) = self.price_total {
            check_amount("priceTotal", total)?;
        }
        for (index, item) in self.items().iter().enumerate() {
            check_amount(&format!("items[{}].quantity", index), item.quantity)?;
            check_amount(
                &format!("items[{}].product.price", index),
                item.product.price,
            )?;
            if let Some(subtotal) = item.subtotal {
                check_amount(&format!("items[{}].subtotal", index), subtotal)?;
            }
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Field '{field}' has unsupported value {value}")]
pub struct ValidationError {
    pub field: String,
    pub value: f64,
}

fn check_amount(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError {
            field: field.to_string(),
            value,
        })
    }
}
