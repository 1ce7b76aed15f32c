//! Transaction script engine
//!
//! A deliberately small interpreter for transaction scripts: assignment,
//! arithmetic, numeric and string literals, and variable reads. Nothing
//! else; scripts never reach a general-purpose runtime.
//!
//! A scripted transaction is an unlock/lock pair executed against one
//! shared scope: the unlock script feeds values in, the lock script reads
//! them and binds `output`. Any failure stops the failing script and is
//! swallowed; it shows up only as a null output.

pub mod interp;
pub mod lexer;
pub mod parser;

pub use interp::{run_script, Scope, ScriptError, Value};
pub use lexer::{tokenize, LexError, Token};
pub use parser::{parse, BinOp, Expr, ParseError, Stmt};

use crate::core::block::Transaction;
use serde_json::Value as JsonValue;

/// Scope name read back as the transaction output after both scripts ran
pub const OUTPUT_BINDING: &str = "output";

/// Execute an unlock/lock script pair and build the resulting transaction
///
/// Both scripts run in order against one shared scope, so the lock script
/// observes every binding the unlock script made. A failing script stops at
/// the failure, keeps the bindings made before it, and is never surfaced to
/// the caller. Whatever ended up bound to `output` (or null) becomes the
/// transaction output.
pub fn run_transaction(unlock: &str, lock: &str) -> Transaction {
    let mut scope = Scope::new();

    if let Err(err) = run_script(unlock, &mut scope) {
        log::debug!("unlock script halted: {err}");
    }
    if let Err(err) = run_script(lock, &mut scope) {
        log::debug!("lock script halted: {err}");
    }

    let output = scope
        .get(OUTPUT_BINDING)
        .map(JsonValue::from)
        .unwrap_or(JsonValue::Null);

    Transaction::Script {
        input: unlock.to_string(),
        script: lock.to_string(),
        output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn output_of(unlock: &str, lock: &str) -> JsonValue {
        match run_transaction(unlock, lock) {
            Transaction::Script { output, .. } => output,
            other => panic!("expected scripted transaction, got {other:?}"),
        }
    }

    #[test]
    fn test_unlock_feeds_lock() {
        assert_eq!(output_of("a = 1", "output = a"), json!(1));
    }

    #[test]
    fn test_arithmetic_flows_through_scope() {
        assert_eq!(output_of("a = 2\nb = 3", "output = a * b + 1"), json!(7));
    }

    #[test]
    fn test_string_output() {
        assert_eq!(
            output_of("who = 'world'", "output = 'hello ' + who"),
            json!("hello world")
        );
    }

    #[test]
    fn test_invalid_lock_script_yields_null() {
        assert_eq!(output_of("", "this is not valid code"), json!(null));
    }

    #[test]
    fn test_invalid_unlock_script_leaves_lock_running() {
        // The unlock script dies, the lock script still runs on an empty scope
        assert_eq!(output_of("¡garbage!", "output = 42"), json!(42));
    }

    #[test]
    fn test_missing_output_binding_yields_null() {
        assert_eq!(output_of("a = 1", "b = a + 1"), json!(null));
    }

    #[test]
    fn test_transaction_records_both_scripts() {
        match run_transaction("a = 1", "output = a") {
            Transaction::Script { input, script, .. } => {
                assert_eq!(input, "a = 1");
                assert_eq!(script, "output = a");
            }
            other => panic!("expected scripted transaction, got {other:?}"),
        }
    }
}
