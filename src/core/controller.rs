use crate::config::{AppConfig, FieldNames, FormSettings};
use crate::core::request_seq::RequestSequence;
use crate::core::subtotal::{clamp_quantity, format_money, parse_quantity, round_money, subtotal};
use crate::domain::model::{
    FormPhase, FormState, OrderDraft, OrderSubmission, ProductListStatus, SubmitOutcome,
};
use crate::domain::ports::{FormView, OrderBackend};
use crate::utils::error::{FormError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Controller behind the order entry form.
///
/// One instance per page. Handlers take `&self` and may run concurrently;
/// the state lock is never held across a backend call, and lookups follow a
/// most-recent-request-wins policy so a slow, superseded response never
/// overwrites a newer one.
pub struct OrderFormController<B: OrderBackend, V: FormView> {
    backend: B,
    view: V,
    settings: FormSettings,
    fields: FieldNames,
    state: Mutex<FormState>,
    product_requests: RequestSequence,
    price_requests: RequestSequence,
}

impl<B: OrderBackend, V: FormView> OrderFormController<B, V> {
    pub fn new(backend: B, view: V, settings: FormSettings, fields: FieldNames) -> Self {
        Self {
            backend,
            view,
            settings,
            fields,
            state: Mutex::new(FormState::default()),
            product_requests: RequestSequence::new(),
            price_requests: RequestSequence::new(),
        }
    }

    pub fn from_config(backend: B, view: V, config: &AppConfig) -> Self {
        Self::new(backend, view, config.form.clone(), config.fields.clone())
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn snapshot(&self) -> FormState {
        self.state.lock().await.clone()
    }

    pub async fn phase(&self) -> FormPhase {
        self.state.lock().await.phase
    }

    /// Page-load hook: today's date into the date field, then a clean form.
    pub async fn on_load(&self) {
        self.init_today().await;
        self.reset_fields().await;
    }

    pub async fn open_dialog(&self) {
        let mut state = self.state.lock().await;
        state.dialog_open = true;
        self.view.set_dialog_visible(true);
        self.reset_locked(&mut state);
    }

    pub async fn close_dialog(&self) {
        self.product_requests.invalidate();
        self.price_requests.invalidate();

        let mut state = self.state.lock().await;
        state.clear_entry();
        state.dialog_open = false;
        self.view.set_dialog_visible(false);
    }

    pub async fn reset_fields(&self) {
        let mut state = self.state.lock().await;
        self.reset_locked(&mut state);
    }

    pub async fn init_today(&self) -> bool {
        self.init_date(chrono::Local::now().date_naive()).await
    }

    /// Fills the date field once; later calls leave it alone and return false.
    pub async fn init_date(&self, date: NaiveDate) -> bool {
        let mut state = self.state.lock().await;
        if state.order_date.is_some() {
            return false;
        }
        state.order_date = Some(date);
        self.view
            .show_date(&self.fields.date, &date.format(DATE_FORMAT).to_string());
        true
    }

    pub async fn on_category_change(&self, category: &str) -> Result<()> {
        let category = category.trim();
        if category.is_empty() {
            // 沒有選擇種類：清空商品列表並重設
            let mut state = self.state.lock().await;
            state.category.clear();
            self.reset_locked(&mut state);
            return Ok(());
        }

        let ticket = self.product_requests.issue();
        // 換了種類，先前的單價查詢已無意義
        self.price_requests.invalidate();
        {
            let mut state = self.state.lock().await;
            state.category = category.to_string();
            state.product.clear();
            state.products.clear();
            state.list_status = ProductListStatus::Loading;
            state.zero_prices();
            state.phase = FormPhase::CategorySelected;
            self.render_products(&state);
            self.render_prices(&state);
        }

        tracing::info!("Loading products for category '{}'", category);
        let result = self.backend.list_products(category).await;

        let mut state = self.state.lock().await;
        if !self.product_requests.is_current(ticket) {
            tracing::debug!("Dropping stale product list for category '{}'", category);
            return Ok(());
        }

        match result {
            Ok(products) => {
                tracing::debug!("Category '{}' loaded {} products", category, products.len());
                state.products = products;
                state.list_status = ProductListStatus::Prompt;
                state.phase = FormPhase::ProductsLoaded;
                self.render_products(&state);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Fetch product list by category failed: {}", e);
                state.products.clear();
                state.list_status = ProductListStatus::Failed;
                state.phase = FormPhase::ProductListFailed;
                self.render_products(&state);
                self.view
                    .alert(&format!("Could not load the product list: {}", e.user_message()));
                Err(e)
            }
        }
    }

    pub async fn on_product_change(&self, product: &str) -> Result<()> {
        let product = product.trim();
        let ticket = self.price_requests.issue();

        if product.is_empty() {
            let mut state = self.state.lock().await;
            state.product.clear();
            state.zero_prices();
            state.phase = if state.category.is_empty() {
                FormPhase::Idle
            } else {
                FormPhase::ProductsLoaded
            };
            self.render_prices(&state);
            return Ok(());
        }

        {
            let mut state = self.state.lock().await;
            state.product = product.to_string();
            state.phase = FormPhase::ProductSelected;
        }

        tracing::info!("Loading price for product '{}'", product);
        let result = self.backend.product_price(product).await;

        let mut state = self.state.lock().await;
        if !self.price_requests.is_current(ticket) {
            tracing::debug!("Dropping stale price for product '{}'", product);
            return Ok(());
        }

        // 單價以兩位小數顯示，小計以顯示的單價計算
        let quantity = state.quantity.max(1);
        let result = result.and_then(|price| {
            let unit_price = round_money(price);
            subtotal(unit_price, quantity).map(|_| unit_price)
        });

        match result {
            Ok(unit_price) => {
                state.unit_price = unit_price;
                state.phase = FormPhase::PriceLoaded;
                self.view.show_unit_price(&format_money(state.unit_price));
                self.compute_subtotal_locked(&mut state)?;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Fetch product price failed: {}", e);
                state.zero_prices();
                state.phase = FormPhase::PriceFailed;
                self.render_prices(&state);
                self.view
                    .alert(&format!("Could not load the product price: {}", e.user_message()));
                Err(e)
            }
        }
    }

    /// Input/change handler of the quantity field.
    ///
    /// A quantity that is too large for the field, or whose subtotal would
    /// overflow, is rejected: the previous quantity and subtotal stay in place
    /// and the user gets an alert.
    pub async fn on_quantity_change(&self, raw: &str) -> Result<Decimal> {
        let mut state = self.state.lock().await;
        let unit_price = state.unit_price;
        let checked = clamp_quantity(parse_quantity(raw))
            .and_then(|quantity| subtotal(unit_price, quantity).map(|_| quantity));

        match checked {
            Ok(quantity) => {
                state.quantity = quantity;
                self.compute_subtotal_locked(&mut state)
            }
            Err(e) => {
                tracing::warn!("Rejected quantity '{}': {}", raw.trim(), e);
                self.view.show_quantity(state.quantity);
                self.view.alert(&e.user_message());
                Err(e)
            }
        }
    }

    pub async fn compute_subtotal(&self) -> Result<Decimal> {
        let mut state = self.state.lock().await;
        self.compute_subtotal_locked(&mut state)
    }

    pub async fn submit(&self, draft: OrderDraft) -> Result<SubmitOutcome> {
        let submission = {
            let mut state = self.state.lock().await;
            if let Err(e) = self.compute_subtotal_locked(&mut state) {
                self.view.alert(&e.user_message());
                return Err(e);
            }

            if !state.has_product() {
                tracing::warn!("Submit aborted: no product selected");
                let message = "Please select a product first";
                self.view.alert(message);
                return Err(FormError::validation(message));
            }

            let submission = self.build_submission(&state, &draft);
            state.phase = FormPhase::Submitting;
            submission
        };

        tracing::info!(
            "Submitting order for '{}'",
            submission.get(&self.fields.product).unwrap_or_default()
        );

        match self.backend.submit_order(&submission).await {
            Ok(outcome) => {
                let location = match &outcome {
                    SubmitOutcome::Redirect(location) => location.clone(),
                    SubmitOutcome::Accepted => self.settings.root_location.clone(),
                };
                tracing::info!("✅ Order submitted, navigating to {}", location);

                let mut state = self.state.lock().await;
                state.clear_entry();
                state.phase = FormPhase::Submitted;
                self.view.navigate(&location);
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!("Order submission failed: {}", e);
                let mut state = self.state.lock().await;
                // 送出期間若已換種類或關閉對話框，保留新的狀態
                if state.phase == FormPhase::Submitting {
                    state.phase = FormPhase::PriceLoaded;
                }
                self.view
                    .alert(&format!("Order submission failed: {}", e.user_message()));
                Err(e)
            }
        }
    }

    /// Deletes an order. Returns `Ok(false)` when the user declined.
    pub async fn delete_order(&self, order_id: &str) -> Result<bool> {
        let order_id = order_id.trim();
        if order_id.is_empty() {
            let message = "Missing order id, nothing to delete";
            self.view.alert(message);
            return Err(FormError::validation(message));
        }

        if self.settings.confirm_delete
            && !self.view.confirm(&format!("Delete order {}?", order_id))
        {
            tracing::info!("Delete of order {} cancelled", order_id);
            return Ok(false);
        }

        match self.backend.delete_order(order_id).await {
            Ok(body) => {
                tracing::debug!("Delete response: {}", body);
                tracing::info!("🗑️ Order {} deleted", order_id);
                self.view.navigate(&self.settings.root_location);
                Ok(true)
            }
            Err(e) => {
                tracing::error!("Delete of order {} failed: {}", order_id, e);
                self.view.alert("Delete failed, please try again later");
                Err(e)
            }
        }
    }

    fn reset_locked(&self, state: &mut FormState) {
        self.product_requests.invalidate();
        self.price_requests.invalidate();

        state.product.clear();
        state.products.clear();
        state.list_status = ProductListStatus::Prompt;
        state.zero_prices();
        state.quantity = state.quantity.max(1);
        state.phase = FormPhase::Idle;

        self.render_products(state);
        self.render_prices(state);
        self.view.show_quantity(state.quantity);
    }

    fn compute_subtotal_locked(&self, state: &mut FormState) -> Result<Decimal> {
        state.quantity = state.quantity.max(1);
        state.subtotal = subtotal(state.unit_price, state.quantity)?;

        self.view.show_quantity(state.quantity);
        self.view.show_subtotal(&format_money(state.subtotal));
        Ok(state.subtotal)
    }

    fn build_submission(&self, state: &FormState, draft: &OrderDraft) -> OrderSubmission {
        let fields = &self.fields;
        let mut submission = OrderSubmission::default();

        if let Some(date) = draft.order_date.or(state.order_date) {
            submission.push(&fields.date, date.format(DATE_FORMAT).to_string());
        }
        submission.push(&fields.customer, draft.customer_name.clone().unwrap_or_default());
        submission.push(&fields.product, state.product.clone());
        submission.push(&fields.quantity, state.quantity.to_string());
        submission.push(&fields.total, format_money(state.subtotal));

        // 狀態欄位預設為「未付款」
        let status = draft
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.settings.default_status.as_str());
        submission.push(&fields.status, status);
        submission.push(&fields.note, draft.note.clone().unwrap_or_default());

        for (name, value) in &draft.extra {
            if submission.get(name).is_some() {
                tracing::warn!("Ignoring extra field '{}' that shadows a form field", name);
                continue;
            }
            submission.push(name, value);
        }

        submission
    }

    fn render_products(&self, state: &FormState) {
        let placeholder = match state.list_status {
            ProductListStatus::Prompt => &self.settings.select_placeholder,
            ProductListStatus::Loading => &self.settings.loading_placeholder,
            ProductListStatus::Failed => &self.settings.failed_placeholder,
        };
        self.view.render_products(placeholder, &state.products);
    }

    fn render_prices(&self, state: &FormState) {
        self.view.show_unit_price(&format_money(state.unit_price));
        self.view.show_subtotal(&format_money(state.subtotal));
    }
}
