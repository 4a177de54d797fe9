//! Tracing/logging (shared setup).

/// Initialize process-wide logging with the given output format.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(format: LogFormat) {
    self::tracing::init(format);
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::{LogFormat, UnknownLogFormat};
