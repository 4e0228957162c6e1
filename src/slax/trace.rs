//! Lexer trace switch
//!
//! Lexer decisions (token text, resolved kind, keyword context) are emitted
//! through `tracing` only while the process-wide flag is on. The flag is read
//! before any event is built, so a disabled trace costs one relaxed load and
//! never influences what the lexer returns.

use std::sync::atomic::{AtomicBool, Ordering};

static TRACE_ENABLED: AtomicBool = AtomicBool::new(false);

/// Turn lexer tracing on or off for every parse in this process.
pub fn set_enabled(enabled: bool) {
    TRACE_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Is lexer tracing currently enabled?
pub fn enabled() -> bool {
    TRACE_ENABLED.load(Ordering::Relaxed)
}

/// Emit a lexer trace event when tracing is enabled.
macro_rules! lex_trace {
    ($($arg:tt)*) => {
        if $crate::slax::trace::enabled() {
            tracing::debug!(target: "slax::lex", $($arg)*);
        }
    };
}

pub(crate) use lex_trace;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let before = enabled();
        set_enabled(true);
        assert!(enabled());
        set_enabled(false);
        assert!(!enabled());
        set_enabled(before);
    }
}
