//! # Glint - a minimal symbolic expression interpreter
//!
//! A small tree-walking interpreter for a parenthesized symbolic expression
//! language. Source text is read into a syntax forest in a single pass,
//! then evaluated against a chain of first-class environments.
//!
//! ## Features
//!
//! - **Single-pass reader** - no token stream; text becomes spanned syntax
//!   nodes directly, iteratively, so deep nesting never recurses
//! - **First-class environments** - scopes are ordinary values; programs can
//!   capture one with `get-current-environment` and evaluate code in it
//! - **User-definable special forms** - the `macro` form builds procedures
//!   that receive their caller's environment as a binding, which is enough
//!   to express control flow and binding constructs in the language itself
//! - **Everything is a binding** - `quote`, `while`, even `=` are looked up
//!   by name like any other value, so programs can shadow or replace them
//!
//! ## Quick Start
//!
//! ```rust
//! use glint::{Interpreter, Value};
//!
//! # fn main() -> glint::Result<()> {
//! let code = r#"
//!     (declare total 0)
//!     (declare i 1)
//!     (while (<= i 5)
//!       (do ((= total (+ total i))
//!            (= i (+ i 1)))))
//!     total
//! "#;
//!
//! let interp = Interpreter::new();
//! let result = interp.run(code)?;
//! assert_eq!(result, Value::Int(15)); // Sum of 1-5
//! # Ok(())
//! # }
//! ```
//!
//! ### Capturing output
//!
//! `print` writes to a sink chosen when the interpreter is built, so
//! embedders and tests can capture it:
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use glint::Interpreter;
//!
//! let buffer = Rc::new(RefCell::new(Vec::<u8>::new()));
//! let interp = Interpreter::with_output(buffer.clone());
//! interp.run(r#"(print "hello world!")"#).unwrap();
//!
//! assert_eq!(String::from_utf8(buffer.borrow().clone()).unwrap(), "hello world!\n");
//! ```
//!
//! ### User-defined forms
//!
//! A procedure built by `macro` names its caller's environment, takes quoted
//! code as an ordinary argument, and decides where to evaluate it:
//!
//! ```rust
//! use glint::{Interpreter, Value};
//!
//! # fn main() -> glint::Result<()> {
//! let code = r#"
//!     (declare n 0)
//!     (declare bump-twice
//!       (macro caller (code)
//!         (do ((eval caller code)
//!              (eval caller code)))))
//!     (bump-twice (quote (= n (+ n 1))))
//!     n
//! "#;
//!
//! let result = Interpreter::new().run(code)?;
//! assert_eq!(result, Value::Int(2));
//! # Ok(())
//! # }
//! ```
//!
//! ## Language Overview
//!
//! ### Data types
//!
//! - **Literals**: `42`, `2.5`, `"text"` evaluate to themselves
//! - **Symbols**: bare names resolve through the scope chain
//! - **Calls**: `(head arg…)` evaluates `head` and invokes the result
//! - **Quoted data**: symbols and sequences, built with `quote`
//!
//! ### Bindings
//!
//! - `(declare x 1)` introduces a binding in the current scope
//! - `(= x 2)` overwrites the nearest existing binding, never creating one
//! - `(\ e (x) body)` or `(macro e (x) body)` builds a procedure
//!
//! ### Library
//!
//! - **Arithmetic**: `+ - * /` plus floor division `//` and power `**`
//! - **Comparison**: `< <= > >=` over numbers and strings
//! - **Rendering**: `(str x)`, `(repr x)`, `(print x)`
//! - **Data**: `(get-item s i)` (also `[]`), `(length s)`
//! - **Evaluation**: `(quote e)`, `(eval env data)`, `(get-current-environment)`
//!
//! Only `false` and `none` are falsy; `0`, `""`, and `()` are all truthy.
//!
//! ## Architecture
//!
//! ```text
//! Source Text → Reader → Syntax Forest → Evaluator → Value
//! ```
//!
//! - [`read`] - source text to a forest of spanned [`Node`]s
//! - [`evaluate`] - one node against an [`Env`] scope chain
//! - [`Interpreter`] - owns a root [`Env`] with the library installed
//! - [`Value`] - runtime values, including callables and environments
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`Result`]; errors carry what the
//! message needs and nothing global:
//!
//! ```rust
//! use glint::{Error, Interpreter};
//!
//! let interp = Interpreter::new();
//! match interp.run("(boom)") {
//!     Err(Error::UnboundName { name }) => assert_eq!(name, "boom"),
//!     other => panic!("expected an unbound name error, got {other:?}"),
//! }
//! ```

/// Version of the Glint interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod reader;
pub mod runtime;
pub mod stdlib;

// Re-export main types
pub use error::{Error, Result};
pub use reader::{read, Node, NodeKind, Span};
pub use runtime::{
    evaluate, invoke, run_program, Callable, Env, Interpreter, MacroFn, NativeFn, Value,
    DEFAULT_RECURSION_LIMIT,
};
pub use stdlib::{install, OutputSink};
