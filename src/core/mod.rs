pub mod controller;
pub mod request_seq;
pub mod subtotal;

pub use crate::domain::model::{FormPhase, FormState, OrderDraft, OrderSubmission, ProductOption, SubmitOutcome};
pub use crate::domain::ports::{FormView, OrderBackend};
pub use crate::utils::error::Result;
