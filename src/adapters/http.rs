use crate::config::BackendConfig;
use crate::domain::model::{OrderSubmission, ProductOption, SubmitOutcome};
use crate::domain::ports::OrderBackend;
use crate::core::subtotal::parse_price;
use crate::utils::error::{FormError, Result};
use async_trait::async_trait;
use reqwest::{redirect, Client, Response};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const UA: &str = concat!("order-desk/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ProductListResponse {
    #[serde(default)]
    product: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    #[serde(default)]
    price: Option<serde_json::Value>,
}

/// `OrderBackend` over the `/product` resource of the order service.
#[derive(Debug, Clone)]
pub struct HttpOrderBackend {
    client: Client,
    base_url: Url,
    endpoint: Url,
}

impl HttpOrderBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| FormError::InvalidConfigValueError {
            field: "backend.base_url".to_string(),
            value: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        let endpoint = base_url
            .join(&config.product_path)
            .map_err(|e| FormError::InvalidConfigValueError {
                field: "backend.product_path".to_string(),
                value: config.product_path.clone(),
                reason: e.to_string(),
            })?;

        // 重新導向交給畫面處理，不由 client 自動跟隨
        let mut builder = Client::builder()
            .redirect(redirect::Policy::none())
            .user_agent(config.user_agent.as_deref().unwrap_or(UA));
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(FormError::HttpError {
            status: status.as_u16(),
            body,
        })
    }

    fn resolve_location(&self, location: &str) -> String {
        match self.base_url.join(location) {
            Ok(url) => url.to_string(),
            Err(_) => location.to_string(),
        }
    }
}

#[async_trait]
impl OrderBackend for HttpOrderBackend {
    async fn list_products(&self, category: &str) -> Result<Vec<ProductOption>> {
        tracing::debug!("GET {} category={}", self.endpoint, category);
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("category", category)])
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let body: ProductListResponse = response.json().await?;
        let products = body
            .product
            .unwrap_or_default()
            .into_iter()
            .map(ProductOption::new)
            .collect::<Vec<_>>();

        tracing::debug!("category {} has {} products", category, products.len());
        Ok(products)
    }

    async fn product_price(&self, product: &str) -> Result<Decimal> {
        tracing::debug!("GET {} product={}", self.endpoint, product);
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("product", product)])
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let body: PriceResponse = response.json().await?;
        parse_price(body.price.as_ref())
    }

    async fn submit_order(&self, submission: &OrderSubmission) -> Result<SubmitOutcome> {
        tracing::debug!(
            "POST {} with {} fields",
            self.endpoint,
            submission.fields.len()
        );
        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&submission.fields)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("submit response status: {}", status);

        if status.is_redirection() {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(|location| self.resolve_location(location));
            return Ok(match location {
                Some(location) => SubmitOutcome::Redirect(location),
                None => SubmitOutcome::Accepted,
            });
        }

        Self::ensure_success(response).await?;
        Ok(SubmitOutcome::Accepted)
    }

    async fn delete_order(&self, order_id: &str) -> Result<serde_json::Value> {
        tracing::debug!("DELETE {} order_id={}", self.endpoint, order_id);
        let response = self
            .client
            .delete(self.endpoint.clone())
            .query(&[("order_id", order_id)])
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        Ok(response.json().await?)
    }
}
