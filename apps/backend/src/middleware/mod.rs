pub mod request_trace;
pub mod require_role;
pub mod session_gate;
pub mod structured_logger;
pub mod trace_span;

pub use request_trace::RequestTrace;
pub use require_role::RequireRole;
pub use session_gate::SessionGate;
pub use structured_logger::StructuredLogger;
pub use trace_span::TraceSpan;
