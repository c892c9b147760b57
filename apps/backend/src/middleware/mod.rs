pub mod auth_gate;
pub mod cors;
pub mod request_trace;
pub mod structured_logger;
pub mod trace_span;

pub use auth_gate::AuthGate;
pub use cors::cors_middleware;
pub use request_trace::{RequestId, RequestTrace};
pub use structured_logger::StructuredLogger;
pub use trace_span::TraceSpan;
