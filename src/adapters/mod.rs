// Adapters layer: concrete implementations of the domain ports.

pub mod http;
pub mod view;

pub use http::HttpOrderBackend;
pub use view::{RecordingView, TerminalView, ViewSnapshot};
