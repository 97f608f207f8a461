use anyhow::Context;
use clap::Parser;
use order_desk::config::cli::{CliArgs, Command};
use order_desk::utils::{logger, validation::Validate};
use order_desk::{AppConfig, FormError, HttpOrderBackend, OrderDraft, OrderFormController, TerminalView};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    let config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match AppConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    std::process::exit(1);
                }
            }
        }
        None => AppConfig::default(),
    }
    .with_base_url(args.base_url.clone());

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_message());
        std::process::exit(1);
    }
    tracing::debug!("Config: {:?}", config);

    let assume_yes = matches!(args.command, Command::Delete { yes: true, .. });
    let backend =
        HttpOrderBackend::new(&config.backend).context("Failed to build the HTTP client")?;
    let form = OrderFormController::from_config(backend, TerminalView::new(assume_yes), &config);

    match run(&form, args.command).await {
        Ok(()) => Ok(()),
        Err(e) => {
            // 畫面已經顯示過錯誤訊息，這裡只記錄並以狀態碼結束
            tracing::debug!("Command failed ({:?}): {}", e.kind(), e);
            std::process::exit(exit_code(&e));
        }
    }
}

async fn run(
    form: &OrderFormController<HttpOrderBackend, TerminalView>,
    command: Command,
) -> order_desk::Result<()> {
    form.on_load().await;

    match command {
        Command::Products { category } => {
            form.on_category_change(&category).await?;
        }
        Command::Price {
            category,
            product,
            quantity,
        } => {
            form.on_category_change(&category).await?;
            form.on_quantity_change(&quantity).await?;
            form.on_product_change(&product).await?;
        }
        Command::Submit {
            category,
            product,
            quantity,
            customer,
            status,
            note,
            date,
        } => {
            form.open_dialog().await;
            form.on_category_change(&category).await?;
            form.on_quantity_change(&quantity).await?;
            if let Some(product) = product {
                form.on_product_change(&product).await?;
            }

            let draft = OrderDraft {
                customer_name: customer,
                status,
                note,
                order_date: date,
                ..OrderDraft::default()
            };
            form.submit(draft).await?;
        }
        Command::Delete { order_id, .. } => {
            form.delete_order(&order_id).await?;
        }
    }

    Ok(())
}

fn exit_code(error: &FormError) -> i32 {
    use order_desk::utils::error::ErrorKind;

    match error.kind() {
        ErrorKind::Validation => 2,
        ErrorKind::Network => 3,
        ErrorKind::Http => 4,
        ErrorKind::Config => 1,
    }
}
