use anyhow::Result;
use httpmock::prelude::*;
use order_desk::utils::validation::Validate;
use order_desk::{AppConfig, HttpOrderBackend, OrderDraft, OrderFormController, RecordingView};
use tempfile::TempDir;

/// 以設定檔切換欄位名稱、預設狀態與刪除確認
#[tokio::test]
async fn test_variant_config_drives_the_form() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/orders/product")
            .query_param("category", "麵食");
        then.status(200)
            .json_body(serde_json::json!({"product": ["牛肉麵"]}));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/orders/product")
            .query_param("product", "牛肉麵");
        then.status(200).json_body(serde_json::json!({"price": 150.0}));
    });
    let submit_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/orders/product")
            .body_contains("item=")
            .body_contains("qty=2")
            .body_contains("total=300.00");
        then.status(302).header("Location", "/orders/");
    });
    let delete_mock = server.mock(|when, then| {
        when.method(DELETE).path("/orders/product");
        then.status(200).json_body(serde_json::json!({"message": "ok"}));
    });

    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("order-desk.toml");
    std::env::set_var("ORDER_DESK_FLOW_BASE_URL", server.base_url());
    tokio::fs::write(
        &config_path,
        r#"
[backend]
base_url = "${ORDER_DESK_FLOW_BASE_URL}"
product_path = "/orders/product"

[form]
default_status = "未付款"
confirm_delete = false

[fields]
product = "item"
quantity = "qty"
total = "total"
"#,
    )
    .await?;

    let config = AppConfig::from_file(&config_path)?;
    std::env::remove_var("ORDER_DESK_FLOW_BASE_URL");
    config.validate()?;

    let backend = HttpOrderBackend::new(&config.backend)?;
    // 拒絕所有確認，驗證此設定下刪除不會詢問
    let form = OrderFormController::from_config(backend, RecordingView::answering(false), &config);

    form.on_category_change("麵食").await?;
    form.on_product_change("牛肉麵").await?;
    form.on_quantity_change("2").await?;
    form.submit(OrderDraft::default()).await?;

    submit_mock.assert();
    assert_eq!(
        form.view().snapshot().navigations,
        vec![server.url("/orders/")]
    );

    assert!(form.delete_order("OD202401010001").await?);
    delete_mock.assert();
    assert!(form.view().snapshot().confirmations.is_empty());

    Ok(())
}

#[test]
fn test_missing_config_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = AppConfig::from_file(temp_dir.path().join("nope.toml"));
    assert!(matches!(result, Err(order_desk::FormError::IoError(_))));
}
