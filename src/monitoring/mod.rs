/*!
 * Monitoring
 * Tracing setup for embedding runtimes and tests
 */

mod tracer;

pub use tracer::{init_tracing, TRACE_JSON_VAR};
