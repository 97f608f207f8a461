use crate::domain::model::{OrderSubmission, ProductOption, SubmitOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// The CRUD backend behind the order page.
#[async_trait]
pub trait OrderBackend: Send + Sync {
    async fn list_products(&self, category: &str) -> Result<Vec<ProductOption>>;
    async fn product_price(&self, product: &str) -> Result<Decimal>;
    async fn submit_order(&self, submission: &OrderSubmission) -> Result<SubmitOutcome>;
    async fn delete_order(&self, order_id: &str) -> Result<serde_json::Value>;
}

/// The visible surface of the entry form.
///
/// Implementations only render; every decision is made by the controller.
/// Methods take `&self` because handlers run concurrently against one view.
pub trait FormView: Send + Sync {
    /// Replaces the product drop-down: a disabled placeholder followed by `options`.
    fn render_products(&self, placeholder: &str, options: &[ProductOption]);
    fn show_unit_price(&self, text: &str);
    fn show_subtotal(&self, text: &str);
    fn show_quantity(&self, quantity: u32);
    fn show_date(&self, field: &str, iso_date: &str);
    fn set_dialog_visible(&self, visible: bool);
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
    fn navigate(&self, location: &str);
}
