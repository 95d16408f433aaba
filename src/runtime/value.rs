use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::reader::{Node, NodeKind};
use crate::runtime::environment::Env;
use crate::runtime::evaluator::evaluate;

/// Runtime value representation
#[derive(Debug, Clone)]
pub enum Value {
    // Data
    /// Absence of a value; the result of expressions with nothing to return
    None,
    /// Boolean value
    Bool(bool),
    /// 64-bit integer value
    Int(i64),
    /// 64-bit floating-point value
    Float(f64),
    /// String value
    Str(String),
    /// An unevaluated name, produced by quoting a symbol
    Symbol(String),
    /// Ordered collection (reference-counted), produced by quoting a call
    /// expression
    Sequence(Rc<Vec<Value>>),

    // Behavior
    /// First-class environment handle
    Env(Env),
    /// Invokable value
    Callable(Callable),
}

/// The closed set of invokable shapes
///
/// `Native` and `Form` share a representation and differ only in calling
/// convention: a `Native` receives its arguments already evaluated (the
/// wrapper built by [`NativeFn::eager`] takes care of that), while a `Form`
/// receives the raw argument nodes and decides itself what to evaluate.
#[derive(Debug, Clone)]
pub enum Callable {
    /// Host function whose arguments are evaluated before it runs
    Native(Rc<NativeFn>),
    /// Host special form operating on unevaluated syntax
    Form(Rc<NativeFn>),
    /// User-defined procedure built by the `macro` form
    Macro(Rc<MacroFn>),
}

/// Implementation signature shared by natives and special forms: the caller's
/// environment plus the raw argument nodes
pub type NativeImpl = dyn Fn(&Env, &[Node]) -> Result<Value>;

/// A function provided by the host
pub struct NativeFn {
    /// Name the function is installed under, for display
    pub name: String,
    /// The implementation
    pub run: Box<NativeImpl>,
}

/// A user-defined procedure: an unevaluated body plus its captured defining
/// scope
///
/// Invocation evaluates `body` in a fresh child of `defining_env` that binds
/// `env_name` to the caller's environment and each parameter to its
/// already-evaluated argument.
#[derive(Debug, Clone)]
pub struct MacroFn {
    /// Name the caller's environment is bound under inside the body
    pub env_name: String,
    /// Parameter names, bound call-by-value in order
    pub params: Vec<String>,
    /// Unevaluated body expression
    pub body: Node,
    /// Scope the procedure was created in
    pub defining_env: Env,
}

impl NativeFn {
    /// Builds an eager native: `f` sees argument values, evaluated
    /// left-to-right in the caller's environment before `f` runs
    pub fn eager(
        name: impl Into<String>,
        f: impl Fn(&[Value]) -> Result<Value> + 'static,
    ) -> Value {
        Value::Callable(Callable::Native(Rc::new(NativeFn {
            name: name.into(),
            run: Box::new(move |env, args| {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(evaluate(env, arg)?);
                }
                f(&values)
            }),
        })))
    }

    /// Builds a special form: `f` sees the caller's environment and the raw
    /// argument nodes
    pub fn form(
        name: impl Into<String>,
        f: impl Fn(&Env, &[Node]) -> Result<Value> + 'static,
    ) -> Value {
        Value::Callable(Callable::Form(Rc::new(NativeFn {
            name: name.into(),
            run: Box::new(f),
        })))
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native-fn {}>", self.name)
    }
}

impl Callable {
    /// Short name of the callable's flavor, for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Callable::Native(_) => "native-fn",
            Callable::Form(_) => "special-form",
            Callable::Macro(_) => "macro",
        }
    }
}

impl Value {
    /// Builds a sequence value from a vector
    pub fn sequence(values: Vec<Value>) -> Self {
        Value::Sequence(Rc::new(values))
    }

    /// Short name of the value's type, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Sequence(_) => "sequence",
            Value::Env(_) => "environment",
            Value::Callable(c) => c.kind_name(),
        }
    }

    /// Only `none` and `false` are falsy; every other value, including `0`,
    /// `""`, and the empty sequence, is truthy
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::None | Value::Bool(false))
    }

    /// The environment handle inside this value
    pub fn as_env(&self) -> Result<&Env> {
        match self {
            Value::Env(env) => Ok(env),
            other => Err(Error::type_mismatch("environment", other.type_name())),
        }
    }

    /// Converts a syntax node into the value that quoting it yields:
    /// literals map to themselves, names become symbols, and call
    /// expressions become sequences of their quoted children
    pub fn from_node(node: &Node) -> Self {
        match &node.kind {
            NodeKind::Int(value) => Value::Int(*value),
            NodeKind::Float(value) => Value::Float(*value),
            NodeKind::Str(text) => Value::Str(text.clone()),
            NodeKind::Symbol(name) => Value::Symbol(name.clone()),
            NodeKind::Call(children) => {
                Value::Sequence(Rc::new(children.iter().map(Value::from_node).collect()))
            }
        }
    }

    /// Converts quoted data back into a syntax node so it can be evaluated
    ///
    /// The inverse of [`Value::from_node`]. Values with no source form
    /// (booleans, environments, callables, `none`) are rejected with a type
    /// error. Synthesized nodes carry empty spans.
    pub fn to_node(&self) -> Result<Node> {
        let kind = match self {
            Value::Int(value) => NodeKind::Int(*value),
            Value::Float(value) => NodeKind::Float(*value),
            Value::Str(text) => NodeKind::Str(text.clone()),
            Value::Symbol(name) => NodeKind::Symbol(name.clone()),
            Value::Sequence(items) => {
                NodeKind::Call(items.iter().map(Value::to_node).collect::<Result<_>>()?)
            }
            other => return Err(Error::type_mismatch("expression", other.type_name())),
        };
        Ok(Node::synthetic(kind))
    }

    /// Re-readable rendering: like `to_string`, except strings come back
    /// quoted with their escapes intact, so any data value with a source
    /// form round-trips through the reader
    pub fn repr(&self) -> String {
        let mut out = String::new();
        write_repr(&mut out, self);
        out
    }
}

fn write_repr(out: &mut String, value: &Value) {
    match value {
        Value::Str(text) => {
            out.push('"');
            for c in text.chars() {
                match c {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    '\t' => out.push_str("\\t"),
                    '\r' => out.push_str("\\r"),
                    other => out.push(other),
                }
            }
            out.push('"');
        }
        Value::Sequence(items) => {
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write_repr(out, item);
            }
            out.push(')');
        }
        other => {
            use fmt::Write;
            // Writing into a String cannot fail
            let _ = write!(out, "{other}");
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("none"),
            Value::Bool(true) => f.write_str("true"),
            Value::Bool(false) => f.write_str("false"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => {
                // Keep a decimal point on integral floats so the rendering
                // reads back as a float, not an int
                let text = value.to_string();
                if value.is_finite() && !text.contains('.') {
                    write!(f, "{text}.0")
                } else {
                    f.write_str(&text)
                }
            }
            Value::Str(text) => f.write_str(text),
            Value::Symbol(name) => f.write_str(name),
            Value::Sequence(_) => f.write_str(&self.repr()),
            Value::Env(_) => f.write_str("<environment>"),
            Value::Callable(c) => write!(f, "{c}"),
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native(native) => write!(f, "<native-fn {}>", native.name),
            Callable::Form(form) => write!(f, "<special-form {}>", form.name),
            Callable::Macro(mac) => write!(f, "<macro({} params)>", mac.params.len()),
        }
    }
}

/// Structural equality for data, handle identity for environments and
/// callables
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Env(a), Value::Env(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => match (a, b) {
                (Callable::Native(x), Callable::Native(y)) => Rc::ptr_eq(x, y),
                (Callable::Form(x), Callable::Form(y)) => Rc::ptr_eq(x, y),
                (Callable::Macro(x), Callable::Macro(y)) => Rc::ptr_eq(x, y),
                _ => false,
            },
            _ => false,
        }
    }
}
