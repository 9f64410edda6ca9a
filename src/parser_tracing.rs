use std::cell::Cell;

thread_local! {
    static TRACE_LEVEL: Cell<usize> = const { Cell::new(0) };
}

const TRACE_IDENT_PLACEHOLDER: &str = "\t";

fn ident_level(level: usize) -> String {
    TRACE_IDENT_PLACEHOLDER.repeat(level.saturating_sub(1))
}

/// Logs `BEGIN <rule>` when created and `END <rule>` when dropped, indented by
/// how deeply parse rules are currently nested.
pub struct ParseTrace {
    msg: &'static str,
}

impl ParseTrace {
    pub fn new(msg: &'static str) -> Self {
        let level = TRACE_LEVEL.with(|l| {
            l.set(l.get() + 1);
            l.get()
        });
        tracing::trace!(target: "treewalk::parser", "{}BEGIN {}", ident_level(level), msg);
        ParseTrace { msg }
    }
}

impl Drop for ParseTrace {
    fn drop(&mut self) {
        tracing::trace!(target: "treewalk::parser", "{}END {}", ident_level(depth()), self.msg);
        TRACE_LEVEL.with(|l| l.set(l.get().saturating_sub(1)));
    }
}

/// Current nesting depth of active traces.
pub fn depth() -> usize {
    TRACE_LEVEL.with(Cell::get)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_nesting_unwinds() {
        let base = depth();
        {
            let _outer = ParseTrace::new("parse_expression");
            assert_eq!(depth(), base + 1);
            {
                let _inner = ParseTrace::new("parse_infix_expression");
                assert_eq!(depth(), base + 2);
            }
            assert_eq!(depth(), base + 1);
        }
        assert_eq!(depth(), base);
    }

    #[test]
    fn test_ident_level() {
        assert_eq!(ident_level(0), "");
        assert_eq!(ident_level(1), "");
        assert_eq!(ident_level(3), "\t\t");
    }
}
