use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of the product drop-down. Value and label are both the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
}

impl ProductOption {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn value(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.name
    }
}

/// Where the form sits in the category → product → price → submit flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FormPhase {
    #[default]
    Idle,
    CategorySelected,
    ProductsLoaded,
    ProductListFailed,
    ProductSelected,
    PriceLoaded,
    PriceFailed,
    Submitting,
    Submitted,
}

/// What the product drop-down currently shows above its options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ProductListStatus {
    #[default]
    Prompt,
    Loading,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormState {
    pub category: String,
    pub product: String,
    pub products: Vec<ProductOption>,
    pub list_status: ProductListStatus,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
    pub status: Option<String>,
    pub order_date: Option<NaiveDate>,
    pub dialog_open: bool,
    pub phase: FormPhase,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            category: String::new(),
            product: String::new(),
            products: Vec::new(),
            list_status: ProductListStatus::Prompt,
            unit_price: Decimal::ZERO,
            quantity: 1,
            subtotal: Decimal::ZERO,
            status: None,
            order_date: None,
            dialog_open: false,
            phase: FormPhase::Idle,
        }
    }
}

impl FormState {
    pub fn has_product(&self) -> bool {
        !self.product.trim().is_empty()
    }

    /// 價格與小計歸零
    pub fn zero_prices(&mut self) {
        self.unit_price = Decimal::ZERO;
        self.subtotal = Decimal::ZERO;
    }

    /// Drops everything the order entry collected; the date and dialog flag survive.
    pub fn clear_entry(&mut self) {
        let order_date = self.order_date;
        let dialog_open = self.dialog_open;
        *self = Self {
            order_date,
            dialog_open,
            ..Self::default()
        };
    }
}

/// The free-text part of the entry form that the controller does not own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_name: Option<String>,
    pub status: Option<String>,
    pub note: Option<String>,
    pub order_date: Option<NaiveDate>,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl OrderDraft {
    pub fn with_customer(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_extra(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(field.into(), value.into());
        self
    }
}

/// Form-encoded body of the create request, in field order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderSubmission {
    pub fields: Vec<(String, String)>,
}

impl OrderSubmission {
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 3xx with a Location header, already resolved against the base URL.
    Redirect(String),
    Accepted,
}
