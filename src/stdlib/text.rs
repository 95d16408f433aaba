//! Rendering natives: `str`, `repr`, and `print`

use crate::error::{Error, Result};
use crate::runtime::{Env, NativeFn, Value};
use crate::stdlib::{unary, OutputSink};

/// Install the rendering natives, pointing `print` at `output`
pub(crate) fn install(env: &Env, output: OutputSink) {
    env.declare("str", NativeFn::eager("str", render_str));
    env.declare("repr", NativeFn::eager("repr", render_repr));
    env.declare(
        "print",
        NativeFn::eager("print", move |args| {
            let value = unary(args)?;
            let mut sink = output.borrow_mut();
            writeln!(sink, "{value}").map_err(|e| Error::Io {
                message: e.to_string(),
            })?;
            Ok(value.clone())
        }),
    );
}

/// `(str x)` - readable rendering
///
/// Example: `(str (quote (1 2 3)))` returns `"(1 2 3)"`
fn render_str(args: &[Value]) -> Result<Value> {
    let value = unary(args)?;
    Ok(Value::Str(value.to_string()))
}

/// `(repr x)` - re-readable rendering; strings come back quoted and escaped
///
/// Example: `(repr "hi")` returns `"\"hi\""`
fn render_repr(args: &[Value]) -> Result<Value> {
    let value = unary(args)?;
    Ok(Value::Str(value.repr()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_uses_the_readable_form() {
        let rendered = render_str(&[Value::Str("hi\n".to_string())]).unwrap();
        assert_eq!(rendered, Value::Str("hi\n".to_string()));

        let rendered = render_str(&[Value::Float(2.0)]).unwrap();
        assert_eq!(rendered, Value::Str("2.0".to_string()));
    }

    #[test]
    fn test_repr_round_trips_strings() {
        let rendered = render_repr(&[Value::Str("hi\n".to_string())]).unwrap();
        assert_eq!(rendered, Value::Str("\"hi\\n\"".to_string()));
    }

    #[test]
    fn test_arity_is_checked() {
        assert_eq!(
            render_str(&[]).unwrap_err(),
            Error::ArityMismatch { expected: 1, got: 0 }
        );
        assert_eq!(
            render_repr(&[Value::Int(1), Value::Int(2)]).unwrap_err(),
            Error::ArityMismatch { expected: 1, got: 2 }
        );
    }
}
