pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{HttpOrderBackend, RecordingView, TerminalView};
pub use crate::config::{AppConfig, FieldNames, FormSettings};
pub use crate::core::controller::OrderFormController;
pub use crate::domain::model::{FormPhase, FormState, OrderDraft, OrderSubmission, ProductOption, SubmitOutcome};
pub use crate::utils::error::{FormError, Result};
