use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "order-desk")]
#[command(about = "Drive the order entry form against an order backend")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override backend.base_url from the config file
    #[arg(long)]
    pub base_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the products of a category
    Products { category: String },

    /// Look up a product's unit price and the subtotal for a quantity
    Price {
        category: String,
        product: String,
        #[arg(short, long, default_value = "1")]
        quantity: String,
    },

    /// Fill in the entry form and submit the order
    Submit {
        #[arg(long)]
        category: String,
        #[arg(long)]
        product: Option<String>,
        #[arg(long, default_value = "1")]
        quantity: String,
        #[arg(long)]
        customer: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        note: Option<String>,
        /// Order date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Delete an order by id
    Delete {
        order_id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
