//! Special forms and the `eval` native
//!
//! Forms receive their arguments as raw syntax, so they control what gets
//! evaluated and where. The `macro` form is what makes the calling
//! convention user-extensible: procedures it builds receive the caller's
//! environment as an ordinary binding and can evaluate quoted code there
//! through `eval`.

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::reader::{Node, NodeKind};
use crate::runtime::{evaluate, Callable, Env, MacroFn, NativeFn, Value};
use crate::stdlib::binary;

/// Install the special forms and `eval`
pub(crate) fn install(env: &Env) {
    env.declare("quote", NativeFn::form("quote", quote));
    env.declare("declare", NativeFn::form("declare", declare));
    env.declare("=", NativeFn::form("=", assign));
    env.declare("while", NativeFn::form("while", while_form));
    env.declare("do", NativeFn::form("do", do_form));
    env.declare(
        "get-current-environment",
        NativeFn::form("get-current-environment", current_environment),
    );

    let make_macro = NativeFn::form("macro", macro_form);
    env.declare("macro", make_macro.clone());
    env.declare("\\", make_macro);

    env.declare("eval", NativeFn::eager("eval", eval_in));
}

/// `(quote expr)` - the argument as data, unevaluated
///
/// Literals quote to themselves, names to symbols, and call expressions to
/// sequences. Example: `(quote (+ 1 2))` returns the sequence `(+ 1 2)`.
fn quote(_env: &Env, args: &[Node]) -> Result<Value> {
    let node = expect_one(args)?;
    Ok(Value::from_node(node))
}

/// `(declare name expr)` - introduces a binding in the current scope,
/// shadowing any enclosing binding of the same name
fn declare(env: &Env, args: &[Node]) -> Result<Value> {
    let (name_node, value_node) = expect_two(args)?;
    let value = evaluate(env, value_node)?;
    let name = symbol_name(name_node)?;
    env.declare(name, value.clone());
    Ok(value)
}

/// `(= name expr)` - overwrites the nearest existing binding
///
/// Unlike `declare`, never creates a binding: assigning an unbound name is
/// an error and the scope chain is left untouched.
fn assign(env: &Env, args: &[Node]) -> Result<Value> {
    let (name_node, value_node) = expect_two(args)?;
    let value = evaluate(env, value_node)?;
    let name = symbol_name(name_node)?;
    env.assign(name, value.clone())?;
    Ok(value)
}

/// `(macro env-name (params…) body)` - builds a user-defined procedure,
/// also bound as `\`
///
/// `env-name` is the name the caller's environment will be bound under when
/// the procedure runs; `params` are ordinary call-by-value parameters. The
/// body is captured unevaluated along with the defining scope.
fn macro_form(env: &Env, args: &[Node]) -> Result<Value> {
    let (env_name_node, params_node, body_node) = expect_three(args)?;

    let env_name = symbol_name(env_name_node)?.to_string();
    let NodeKind::Call(param_nodes) = &params_node.kind else {
        return Err(Error::type_mismatch(
            "parameter list",
            params_node.kind_name(),
        ));
    };
    let mut params = Vec::with_capacity(param_nodes.len());
    for param in param_nodes {
        params.push(symbol_name(param)?.to_string());
    }

    Ok(Value::Callable(Callable::Macro(Rc::new(MacroFn {
        env_name,
        params,
        body: body_node.clone(),
        defining_env: env.clone(),
    }))))
}

/// `(while cond body)` - re-evaluates `body` as long as `cond` is truthy
///
/// Returns the last body value, or `none` when the body never ran. Only
/// `false` and `none` end the loop; `0` and `""` are truthy.
fn while_form(env: &Env, args: &[Node]) -> Result<Value> {
    let (condition, body) = expect_two(args)?;
    let mut last = Value::None;
    while evaluate(env, condition)?.is_truthy() {
        last = evaluate(env, body)?;
    }
    Ok(last)
}

/// `(do (expr…))` - evaluates the group's children in order and returns the
/// last value, or `none` for an empty group
fn do_form(env: &Env, args: &[Node]) -> Result<Value> {
    let group = expect_one(args)?;
    let NodeKind::Call(steps) = &group.kind else {
        return Err(Error::type_mismatch("expression group", group.kind_name()));
    };

    let mut last = Value::None;
    for step in steps {
        last = evaluate(env, step)?;
    }
    Ok(last)
}

/// `(get-current-environment)` - the scope evaluating the call, as a value
fn current_environment(env: &Env, args: &[Node]) -> Result<Value> {
    if !args.is_empty() {
        return Err(Error::ArityMismatch {
            expected: 0,
            got: args.len(),
        });
    }
    Ok(Value::Env(env.clone()))
}

/// `(eval env code)` - evaluates quoted data as code in a chosen environment
///
/// The usual partner of `macro`: a procedure can take quoted code and run it
/// in its caller's scope. Example:
/// `(eval (get-current-environment) (quote (+ 1 2)))` returns `3`.
fn eval_in(args: &[Value]) -> Result<Value> {
    let (target, code) = binary(args)?;
    let env = target.as_env()?;
    let node = code.to_node()?;
    evaluate(env, &node)
}

fn symbol_name(node: &Node) -> Result<&str> {
    node.as_symbol()
        .ok_or_else(|| Error::type_mismatch("symbol", node.kind_name()))
}

fn expect_one(args: &[Node]) -> Result<&Node> {
    match args {
        [node] => Ok(node),
        _ => Err(Error::ArityMismatch {
            expected: 1,
            got: args.len(),
        }),
    }
}

fn expect_two(args: &[Node]) -> Result<(&Node, &Node)> {
    match args {
        [first, second] => Ok((first, second)),
        _ => Err(Error::ArityMismatch {
            expected: 2,
            got: args.len(),
        }),
    }
}

fn expect_three(args: &[Node]) -> Result<(&Node, &Node, &Node)> {
    match args {
        [first, second, third] => Ok((first, second, third)),
        _ => Err(Error::ArityMismatch {
            expected: 3,
            got: args.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read;
    use crate::stdlib;
    use std::cell::RefCell;

    fn scope() -> Env {
        let root = Env::root();
        stdlib::install(&root, Rc::new(RefCell::new(Vec::<u8>::new())));
        root.child()
    }

    fn eval_str(env: &Env, source: &str) -> Result<Value> {
        let forest = read(source)?;
        let mut last = Value::None;
        for node in &forest {
            last = evaluate(env, node)?;
        }
        Ok(last)
    }

    #[test]
    fn test_quote_returns_data() {
        let env = scope();
        assert_eq!(eval_str(&env, "(quote 5)").unwrap(), Value::Int(5));
        assert_eq!(
            eval_str(&env, "(quote x)").unwrap(),
            Value::Symbol("x".to_string())
        );
        assert_eq!(
            eval_str(&env, "(quote (1 two 3.0))").unwrap(),
            Value::sequence(vec![
                Value::Int(1),
                Value::Symbol("two".to_string()),
                Value::Float(3.0),
            ])
        );
        // The empty group quotes to an empty sequence
        assert_eq!(
            eval_str(&env, "(quote ())").unwrap(),
            Value::sequence(Vec::new())
        );
    }

    #[test]
    fn test_declare_returns_the_value_and_binds_locally() {
        let env = scope();
        assert_eq!(eval_str(&env, "(declare x 5)").unwrap(), Value::Int(5));
        assert_eq!(env.lookup("x").unwrap(), Value::Int(5));
        assert_eq!(env.local_len(), 1);
    }

    #[test]
    fn test_declare_target_must_be_a_symbol() {
        let env = scope();
        let err = eval_str(&env, "(declare 5 1)").unwrap_err();
        assert_eq!(err, Error::type_mismatch("symbol", "int"));
        let err = eval_str(&env, "(declare (a) 1)").unwrap_err();
        assert_eq!(err, Error::type_mismatch("symbol", "call expression"));
    }

    #[test]
    fn test_assign_requires_an_existing_binding() {
        let env = scope();
        let err = eval_str(&env, "(= ghost 1)").unwrap_err();
        assert_eq!(
            err,
            Error::UnboundName {
                name: "ghost".to_string()
            }
        );

        eval_str(&env, "(declare x 1)").unwrap();
        assert_eq!(eval_str(&env, "(= x 2)").unwrap(), Value::Int(2));
        assert_eq!(env.lookup("x").unwrap(), Value::Int(2));
    }

    #[test]
    fn test_builtins_can_be_shadowed_and_reassigned() {
        let env = scope();
        // declare shadows the library binding in the program scope
        eval_str(&env, "(declare quote 1)").unwrap();
        assert_eq!(env.lookup("quote").unwrap(), Value::Int(1));
        // assignment through the chain overwrites the root binding
        eval_str(&env, "(= print 2)").unwrap();
        let err = eval_str(&env, "(print 3)").unwrap_err();
        assert_eq!(
            err,
            Error::NotCallable {
                type_name: "int".to_string()
            }
        );
    }

    #[test]
    fn test_macro_binds_caller_env_and_params() {
        let env = scope();
        eval_str(
            &env,
            "(declare probe (macro caller (a b) (quote done)))",
        )
        .unwrap();

        let probe = env.lookup("probe").unwrap();
        let Value::Callable(Callable::Macro(mac)) = probe else {
            panic!("expected a macro, got {probe:?}");
        };
        assert_eq!(mac.env_name, "caller");
        assert_eq!(mac.params, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(mac.defining_env, env);
    }

    #[test]
    fn test_macro_rejects_bad_shapes() {
        let env = scope();
        let err = eval_str(&env, "(macro e (x))").unwrap_err();
        assert_eq!(err, Error::ArityMismatch { expected: 3, got: 2 });

        let err = eval_str(&env, "(macro e x x)").unwrap_err();
        assert_eq!(err, Error::type_mismatch("parameter list", "symbol"));

        let err = eval_str(&env, "(macro e (1) x)").unwrap_err();
        assert_eq!(err, Error::type_mismatch("symbol", "int"));
    }

    #[test]
    fn test_backslash_is_the_same_form_as_macro() {
        let env = scope();
        let value = eval_str(&env, r"(declare inc (\ e (n) (+ n 1))) (inc 41)").unwrap();
        assert_eq!(value, Value::Int(42));
    }

    #[test]
    fn test_while_never_running_returns_none() {
        let env = scope();
        assert_eq!(eval_str(&env, "(while false 1)").unwrap(), Value::None);
    }

    #[test]
    fn test_while_returns_the_last_body_value() {
        let env = scope();
        let value = eval_str(
            &env,
            "(declare i 0) (while (< i 3) (= i (+ i 1)))",
        )
        .unwrap();
        assert_eq!(value, Value::Int(3));
    }

    #[test]
    fn test_do_groups_expressions() {
        let env = scope();
        let value = eval_str(&env, "(do ((declare x 1) (= x (+ x 1)) x))").unwrap();
        assert_eq!(value, Value::Int(2));
        // do evaluates in the current scope, not a new one
        assert_eq!(env.lookup("x").unwrap(), Value::Int(2));
    }

    #[test]
    fn test_do_of_an_empty_group_returns_none() {
        let env = scope();
        assert_eq!(eval_str(&env, "(do ())").unwrap(), Value::None);
    }

    #[test]
    fn test_do_requires_a_group() {
        let env = scope();
        let err = eval_str(&env, "(do 1)").unwrap_err();
        assert_eq!(err, Error::type_mismatch("expression group", "int"));
    }

    #[test]
    fn test_current_environment_is_the_evaluating_scope() {
        let env = scope();
        let value = eval_str(&env, "(get-current-environment)").unwrap();
        assert_eq!(value, Value::Env(env));
    }

    #[test]
    fn test_eval_runs_quoted_code_in_a_chosen_env() {
        let env = scope();
        let value = eval_str(
            &env,
            "(declare x 40) (eval (get-current-environment) (quote (+ x 2)))",
        )
        .unwrap();
        assert_eq!(value, Value::Int(42));
    }

    #[test]
    fn test_eval_rejects_non_environments_and_non_code() {
        let env = scope();
        let err = eval_str(&env, "(eval 1 (quote x))").unwrap_err();
        assert_eq!(err, Error::type_mismatch("environment", "int"));

        let err = eval_str(&env, "(eval (get-current-environment) true)").unwrap_err();
        assert_eq!(err, Error::type_mismatch("expression", "bool"));
    }
}
