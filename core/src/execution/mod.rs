//! Execution tracing

pub mod tracer;

pub use self::tracer::{ExecutionConfig, ExecutionTracer, TraceError, TraceEvent, TracePoint};
