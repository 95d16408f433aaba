//! Baseline library installed into every root environment
//!
//! Callables here come in two flavors built by [`NativeFn`](crate::runtime::NativeFn):
//! eager natives, whose arguments are evaluated for them, and special forms,
//! which receive raw syntax. Everything is bound by `declare` on the root,
//! so programs can shadow or reassign any of it.

mod forms;
mod math;
mod sequences;
mod text;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::runtime::{Env, Value};

/// Shared handle to the stream `print` writes to
pub type OutputSink = Rc<RefCell<dyn io::Write>>;

/// Installs the constants and the callable library into `env` (normally a
/// fresh root)
pub fn install(env: &Env, output: OutputSink) {
    env.declare("none", Value::None);
    env.declare("true", Value::Bool(true));
    env.declare("false", Value::Bool(false));

    math::install(env);
    text::install(env, output);
    sequences::install(env);
    forms::install(env);

    tracing::debug!(bindings = env.local_len(), "library installed");
}

/// Exactly one argument, or an arity error
pub(crate) fn unary(args: &[Value]) -> Result<&Value> {
    match args {
        [value] => Ok(value),
        _ => Err(Error::ArityMismatch {
            expected: 1,
            got: args.len(),
        }),
    }
}

/// Exactly two arguments, or an arity error
pub(crate) fn binary(args: &[Value]) -> Result<(&Value, &Value)> {
    match args {
        [first, second] => Ok((first, second)),
        _ => Err(Error::ArityMismatch {
            expected: 2,
            got: args.len(),
        }),
    }
}
