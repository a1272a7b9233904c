//! HTTP middleware components.

pub mod key_auth;
pub mod logging;
pub mod metrics;
pub mod trace_id;

pub use key_auth::{require_admin_key, require_reader_key};
pub use metrics::{init_metrics, metrics_handler, metrics_middleware};
pub use trace_id::trace_id;
