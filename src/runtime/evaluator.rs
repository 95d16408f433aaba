use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::reader::{read, Node, NodeKind, Span};
use crate::runtime::environment::Env;
use crate::runtime::value::{Callable, MacroFn, Value};
use crate::stdlib::{self, OutputSink};

/// Evaluates a single syntax node in the given environment
///
/// Literals evaluate to themselves, symbols resolve through the scope chain,
/// and a call expression evaluates its head and invokes the result with the
/// raw argument nodes. Whether the arguments get evaluated is up to the
/// callee, which is what lets special forms and user macros receive syntax
/// instead of values.
pub fn evaluate(env: &Env, node: &Node) -> Result<Value> {
    match &node.kind {
        NodeKind::Int(value) => Ok(Value::Int(*value)),
        NodeKind::Float(value) => Ok(Value::Float(*value)),
        NodeKind::Str(text) => Ok(Value::Str(text.clone())),
        NodeKind::Symbol(name) => env.lookup(name),
        NodeKind::Call(items) => {
            let Some((head, args)) = items.split_first() else {
                return Err(Error::syntax(node.span.start, "empty call expression"));
            };

            let callee = evaluate(env, head)?;
            let callable = match callee {
                Value::Callable(callable) => callable,
                other => {
                    return Err(Error::NotCallable {
                        type_name: other.type_name().to_string(),
                    })
                }
            };

            let _frame = FrameGuard::push(env, node.span)?;
            invoke(&callable, env, args)
        }
    }
}

/// Invokes a callable with the caller's environment and raw argument nodes
pub fn invoke(callable: &Callable, env: &Env, args: &[Node]) -> Result<Value> {
    match callable {
        Callable::Native(native) | Callable::Form(native) => (native.run)(env, args),
        Callable::Macro(mac) => apply_macro(mac, env, args),
    }
}

/// Runs a user-defined procedure
///
/// Arguments are evaluated in the caller's scope, then the body runs in a
/// fresh child of the defining scope that also binds the caller's
/// environment under the procedure's chosen name.
fn apply_macro(mac: &MacroFn, caller: &Env, args: &[Node]) -> Result<Value> {
    if args.len() != mac.params.len() {
        return Err(Error::ArityMismatch {
            expected: mac.params.len(),
            got: args.len(),
        });
    }

    let local = mac.defining_env.child();
    local.declare(&mac.env_name, Value::Env(caller.clone()));
    for (param, arg) in mac.params.iter().zip(args) {
        let value = evaluate(caller, arg)?;
        local.declare(param, value);
    }

    evaluate(&local, &mac.body)
}

/// Records a call frame for the duration of one invocation
///
/// Dropping the guard pops the frame, so the stack stays consistent on both
/// the value and the error path.
struct FrameGuard {
    env: Env,
}

impl FrameGuard {
    fn push(env: &Env, span: Span) -> Result<Self> {
        env.push_frame(span)?;
        Ok(FrameGuard { env: env.clone() })
    }
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        self.env.pop_frame();
    }
}

/// Evaluates a program, a forest of top-level nodes, in a fresh child of
/// `root`
///
/// The child scope keeps top-level `declare`s from landing in the root, so
/// the installed library stays pristine across programs. Returns the value
/// of the last node, or `none` for an empty program.
pub fn run_program(root: &Env, program: &[Node]) -> Result<Value> {
    let scope = root.child();
    let mut last = Value::None;
    for node in program {
        last = evaluate(&scope, node)?;
    }
    Ok(last)
}

/// Embedding facade: a pre-populated root environment plus the output sink
/// its `print` writes to
///
/// ```
/// use glint::{Interpreter, Value};
///
/// let interp = Interpreter::new();
/// let result = interp.run("(declare x 12) (= x 33) (+ x 9)").unwrap();
/// assert_eq!(result, Value::Int(42));
/// ```
pub struct Interpreter {
    root: Env,
}

impl Interpreter {
    /// Creates an interpreter whose `print` writes to stdout
    pub fn new() -> Self {
        Self::with_output(Rc::new(RefCell::new(io::stdout())))
    }

    /// Creates an interpreter with a caller-supplied print sink
    ///
    /// ```
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    /// use glint::Interpreter;
    ///
    /// let buffer = Rc::new(RefCell::new(Vec::<u8>::new()));
    /// let interp = Interpreter::with_output(buffer.clone());
    /// interp.run("(print (+ 20 22))").unwrap();
    /// assert_eq!(*buffer.borrow(), b"42\n");
    /// ```
    pub fn with_output(output: OutputSink) -> Self {
        let root = Env::root();
        stdlib::install(&root, output);
        Interpreter { root }
    }

    /// The root environment holding the installed library
    ///
    /// Hosts can bind extra natives here, or build a persistent child scope
    /// with [`Env::child`] and feed nodes to [`evaluate`] directly.
    pub fn root(&self) -> &Env {
        &self.root
    }

    /// Reads and runs a whole program, returning its final value
    ///
    /// Each call gets a fresh top-level scope; use [`Interpreter::root`] and
    /// [`run_program`] for finer control.
    pub fn run(&self, source: &str) -> Result<Value> {
        let program = read(source)?;
        tracing::debug!(nodes = program.len(), "running program");
        run_program(&self.root, &program)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> Env {
        let root = Env::root();
        stdlib::install(&root, Rc::new(RefCell::new(Vec::<u8>::new())));
        root.child()
    }

    fn eval_one(env: &Env, source: &str) -> Result<Value> {
        let forest = read(source)?;
        assert_eq!(forest.len(), 1, "expected one node from {source:?}");
        evaluate(env, &forest[0])
    }

    #[test]
    fn test_literals_evaluate_to_themselves() {
        let env = scope();
        assert_eq!(eval_one(&env, "42").unwrap(), Value::Int(42));
        assert_eq!(eval_one(&env, "2.5").unwrap(), Value::Float(2.5));
        assert_eq!(eval_one(&env, "\"hi\"").unwrap(), Value::Str("hi".to_string()));
    }

    #[test]
    fn test_symbols_resolve_through_the_chain() {
        let env = scope();
        env.declare("x", Value::Int(7));
        assert_eq!(eval_one(&env.child(), "x").unwrap(), Value::Int(7));

        let err = eval_one(&env, "missing").unwrap_err();
        assert_eq!(
            err,
            Error::UnboundName {
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_calling_plain_data_fails() {
        let env = scope();
        let err = eval_one(&env, "(1 2 3)").unwrap_err();
        assert_eq!(
            err,
            Error::NotCallable {
                type_name: "int".to_string()
            }
        );
    }

    #[test]
    fn test_empty_call_expression_is_a_syntax_error() {
        let env = scope();
        let err = eval_one(&env, "()").unwrap_err();
        assert_eq!(err, Error::syntax(0, "empty call expression"));

        // Nested positions report their own offset
        let err = eval_one(&env, "(+ 1 ())").unwrap_err();
        assert_eq!(err, Error::syntax(5, "empty call expression"));
    }

    #[test]
    fn test_head_position_is_evaluated() {
        let env = scope();
        // The head is itself a call that returns a callable
        let value = eval_one(&env, "((macro e (x) x) 5)").unwrap();
        assert_eq!(value, Value::Int(5));
    }

    #[test]
    fn test_call_stack_unwinds_on_error() {
        let env = scope();
        let err = eval_one(&env, "(+ 1 (+ 2 missing))").unwrap_err();
        assert!(matches!(err, Error::UnboundName { .. }));
        // Both guards popped their frames during unwinding
        assert!(env.call_trace().is_empty());
    }

    #[test]
    fn test_recursion_limit_is_catchable() {
        let env = scope();
        env.set_recursion_limit(64);
        eval_one(&env, "(declare f (macro g () (f)))").unwrap();

        let err = eval_one(&env, "(f)").unwrap_err();
        assert_eq!(err, Error::RecursionLimit { limit: 64 });
        assert!(env.call_trace().is_empty());

        // The interpreter is still usable afterwards
        assert_eq!(eval_one(&env, "(+ 1 2)").unwrap(), Value::Int(3));
    }

    #[test]
    fn test_macro_closures_capture_their_defining_scope() {
        let env = scope();
        eval_one(
            &env,
            "(declare make-adder (macro g (n) (macro h (x) (+ x n))))",
        )
        .unwrap();
        eval_one(&env, "(declare add5 (make-adder 5))").unwrap();
        assert_eq!(eval_one(&env, "(add5 3)").unwrap(), Value::Int(8));

        // The inner macro still sees n even though make-adder has returned
        assert_eq!(eval_one(&env, "(add5 37)").unwrap(), Value::Int(42));
    }

    #[test]
    fn test_run_program_returns_the_last_value() {
        let root = Env::root();
        stdlib::install(&root, Rc::new(RefCell::new(Vec::<u8>::new())));

        let program = read("(declare x 1) (= x (+ x 1)) x").unwrap();
        assert_eq!(run_program(&root, &program).unwrap(), Value::Int(2));
    }

    #[test]
    fn test_run_program_of_nothing_returns_none() {
        let root = Env::root();
        stdlib::install(&root, Rc::new(RefCell::new(Vec::<u8>::new())));
        assert_eq!(run_program(&root, &[]).unwrap(), Value::None);
    }

    #[test]
    fn test_top_level_declares_stay_out_of_the_root() {
        let root = Env::root();
        stdlib::install(&root, Rc::new(RefCell::new(Vec::<u8>::new())));

        let program = read("(declare leak 1)").unwrap();
        run_program(&root, &program).unwrap();
        assert!(!root.contains("leak"));
    }
}
