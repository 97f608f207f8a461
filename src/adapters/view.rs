use crate::domain::model::ProductOption;
use crate::domain::ports::FormView;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::sync::{Mutex, MutexGuard};

/// Everything a `RecordingView` has been told to show.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewSnapshot {
    pub placeholder: String,
    pub options: Vec<ProductOption>,
    pub unit_price: String,
    pub subtotal: String,
    pub quantity: u32,
    pub dates: BTreeMap<String, String>,
    pub dialog_visible: bool,
    pub alerts: Vec<String>,
    pub confirmations: Vec<String>,
    pub navigations: Vec<String>,
}

impl ViewSnapshot {
    pub fn option_names(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.label()).collect()
    }
}

/// Headless view that keeps the last rendered state in memory.
#[derive(Debug)]
pub struct RecordingView {
    snapshot: Mutex<ViewSnapshot>,
    confirm_answer: bool,
}

impl Default for RecordingView {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingView {
    pub fn new() -> Self {
        Self {
            snapshot: Mutex::new(ViewSnapshot::default()),
            confirm_answer: true,
        }
    }

    /// Answer every confirmation prompt with `answer`.
    pub fn answering(answer: bool) -> Self {
        Self {
            confirm_answer: answer,
            ..Self::new()
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, ViewSnapshot> {
        self.snapshot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FormView for RecordingView {
    fn render_products(&self, placeholder: &str, options: &[ProductOption]) {
        let mut snapshot = self.lock();
        snapshot.placeholder = placeholder.to_string();
        snapshot.options = options.to_vec();
    }

    fn show_unit_price(&self, text: &str) {
        self.lock().unit_price = text.to_string();
    }

    fn show_subtotal(&self, text: &str) {
        self.lock().subtotal = text.to_string();
    }

    fn show_quantity(&self, quantity: u32) {
        self.lock().quantity = quantity;
    }

    fn show_date(&self, field: &str, iso_date: &str) {
        self.lock()
            .dates
            .insert(field.to_string(), iso_date.to_string());
    }

    fn set_dialog_visible(&self, visible: bool) {
        self.lock().dialog_visible = visible;
    }

    fn alert(&self, message: &str) {
        self.lock().alerts.push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        self.lock().confirmations.push(message.to_string());
        self.confirm_answer
    }

    fn navigate(&self, location: &str) {
        self.lock().navigations.push(location.to_string());
    }
}

/// View for the CLI: form updates go to stdout, alerts to stderr,
/// confirmations are read from stdin.
#[derive(Debug, Default)]
pub struct TerminalView {
    assume_yes: bool,
}

impl TerminalView {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl FormView for TerminalView {
    fn render_products(&self, placeholder: &str, options: &[ProductOption]) {
        println!("product: [{}]", placeholder);
        for option in options {
            println!("  - {}", option.label());
        }
    }

    fn show_unit_price(&self, text: &str) {
        println!("unit price: {}", text);
    }

    fn show_subtotal(&self, text: &str) {
        println!("subtotal: {}", text);
    }

    fn show_quantity(&self, quantity: u32) {
        println!("quantity: {}", quantity);
    }

    fn show_date(&self, field: &str, iso_date: &str) {
        tracing::debug!("{} = {}", field, iso_date);
    }

    fn set_dialog_visible(&self, visible: bool) {
        tracing::debug!("entry dialog visible: {}", visible);
    }

    fn alert(&self, message: &str) {
        eprintln!("❌ {}", message);
    }

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", message);
        if std::io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                tracing::warn!("could not read confirmation: {}", e);
                false
            }
        }
    }

    fn navigate(&self, location: &str) {
        println!("➡️  {}", location);
    }
}
