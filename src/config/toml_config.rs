use crate::utils::error::{FormError, Result};
use crate::utils::validation::{
    validate_endpoint_path, validate_non_empty_string, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Whole configuration file. Every section is optional; missing sections
/// fall back to the layout of the stock order page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub form: FormSettings,
    pub fields: FieldNames,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub product_path: String,
    /// 不設定則不逾時，與原頁面行為相同
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            product_path: "/product".to_string(),
            timeout_seconds: None,
            user_agent: None,
        }
    }
}

/// Behaviour switches and texts that differ between deployments of the form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSettings {
    pub default_status: String,
    pub confirm_delete: bool,
    /// Where to go after a submit or delete that did not redirect.
    pub root_location: String,
    pub select_placeholder: String,
    pub loading_placeholder: String,
    pub failed_placeholder: String,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            default_status: "unpaid".to_string(),
            confirm_delete: true,
            root_location: "/".to_string(),
            select_placeholder: "Select a product".to_string(),
            loading_placeholder: "Loading...".to_string(),
            failed_placeholder: "Failed to load".to_string(),
        }
    }
}

/// Names of the form fields as the backend expects them in the POST body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    pub date: String,
    pub customer: String,
    pub product: String,
    pub quantity: String,
    pub total: String,
    pub status: String,
    pub note: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            date: "product_date".to_string(),
            customer: "customer_name".to_string(),
            product: "product_name".to_string(),
            quantity: "product_amount".to_string(),
            total: "product_total".to_string(),
            status: "product_status".to_string(),
            note: "product_note".to_string(),
        }
    }
}

impl FieldNames {
    fn all(&self) -> [(&'static str, &str); 7] {
        [
            ("fields.date", &self.date),
            ("fields.customer", &self.customer),
            ("fields.product", &self.product),
            ("fields.quantity", &self.quantity),
            ("fields.total", &self.total),
            ("fields.status", &self.status),
            ("fields.note", &self.note),
        ]
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| FormError::config(format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${ORDER_DESK_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| FormError::config(format!("invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.backend.base_url = url;
        }
        self
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("backend.base_url", &self.backend.base_url)?;
        validate_endpoint_path("backend.product_path", &self.backend.product_path)?;

        if let Some(timeout) = self.backend.timeout_seconds {
            validate_range("backend.timeout_seconds", timeout, 1, 3600)?;
        }

        validate_non_empty_string("form.default_status", &self.form.default_status)?;
        validate_non_empty_string("form.root_location", &self.form.root_location)?;

        let fields = self.fields.all();
        for (label, name) in fields.iter() {
            validate_non_empty_string(label, name)?;
        }

        // 欄位名稱不可重複，否則送出的表單會互相覆蓋
        for (i, (label, name)) in fields.iter().enumerate() {
            if fields[..i].iter().any(|(_, other)| other == name) {
                return Err(FormError::InvalidConfigValueError {
                    field: label.to_string(),
                    value: name.to_string(),
                    reason: "Field name is used twice".to_string(),
                });
            }
        }

        Ok(())
    }
}
