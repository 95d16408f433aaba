//! Arithmetic and comparison natives

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::runtime::{Env, NativeFn, Value};
use crate::stdlib::binary;

/// Install arithmetic and comparison natives
pub(crate) fn install(env: &Env) {
    env.declare("+", NativeFn::eager("+", add));
    env.declare("-", NativeFn::eager("-", sub));
    env.declare("*", NativeFn::eager("*", mul));
    env.declare("/", NativeFn::eager("/", div));
    env.declare("//", NativeFn::eager("//", floor_div));
    env.declare("**", NativeFn::eager("**", pow));

    env.declare("<", NativeFn::eager("<", |args| compare(args, Ordering::is_lt)));
    env.declare("<=", NativeFn::eager("<=", |args| compare(args, Ordering::is_le)));
    env.declare(">", NativeFn::eager(">", |args| compare(args, Ordering::is_gt)));
    env.declare(">=", NativeFn::eager(">=", |args| compare(args, Ordering::is_ge)));
}

/// Two operands lifted into a common numeric type
///
/// Mixed int/float operands widen to floats; two ints stay exact.
enum Pair {
    Ints(i64, i64),
    Floats(f64, f64),
}

fn numeric_pair(a: &Value, b: &Value) -> Result<Pair> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(Pair::Ints(*x, *y)),
        (Value::Int(x), Value::Float(y)) => Ok(Pair::Floats(*x as f64, *y)),
        (Value::Float(x), Value::Int(y)) => Ok(Pair::Floats(*x, *y as f64)),
        (Value::Float(x), Value::Float(y)) => Ok(Pair::Floats(*x, *y)),
        _ => {
            let offender = if matches!(a, Value::Int(_) | Value::Float(_)) {
                b
            } else {
                a
            };
            Err(Error::type_mismatch("number", offender.type_name()))
        }
    }
}

/// `(+ a b)` - addition; also concatenates two strings or two sequences
fn add(args: &[Value]) -> Result<Value> {
    let (a, b) = binary(args)?;
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => Ok(Value::Str(format!("{x}{y}"))),
        (Value::Sequence(x), Value::Sequence(y)) => {
            let mut items = x.as_ref().clone();
            items.extend(y.iter().cloned());
            Ok(Value::sequence(items))
        }
        _ => match numeric_pair(a, b)? {
            Pair::Ints(x, y) => x
                .checked_add(y)
                .map(Value::Int)
                .ok_or(Error::Overflow { op: "+" }),
            Pair::Floats(x, y) => Ok(Value::Float(x + y)),
        },
    }
}

/// `(- a b)` - subtraction
fn sub(args: &[Value]) -> Result<Value> {
    let (a, b) = binary(args)?;
    match numeric_pair(a, b)? {
        Pair::Ints(x, y) => x
            .checked_sub(y)
            .map(Value::Int)
            .ok_or(Error::Overflow { op: "-" }),
        Pair::Floats(x, y) => Ok(Value::Float(x - y)),
    }
}

/// `(* a b)` - multiplication
fn mul(args: &[Value]) -> Result<Value> {
    let (a, b) = binary(args)?;
    match numeric_pair(a, b)? {
        Pair::Ints(x, y) => x
            .checked_mul(y)
            .map(Value::Int)
            .ok_or(Error::Overflow { op: "*" }),
        Pair::Floats(x, y) => Ok(Value::Float(x * y)),
    }
}

/// `(/ a b)` - true division; the result is always a float
///
/// Example: `(/ 7 2)` returns `3.5`
fn div(args: &[Value]) -> Result<Value> {
    let (a, b) = binary(args)?;
    match numeric_pair(a, b)? {
        Pair::Ints(x, y) => {
            if y == 0 {
                return Err(Error::DivisionByZero);
            }
            Ok(Value::Float(x as f64 / y as f64))
        }
        Pair::Floats(x, y) => {
            if y == 0.0 {
                return Err(Error::DivisionByZero);
            }
            Ok(Value::Float(x / y))
        }
    }
}

/// `(// a b)` - floor division; rounds toward negative infinity
///
/// Example: `(// -7 2)` returns `-4`
fn floor_div(args: &[Value]) -> Result<Value> {
    let (a, b) = binary(args)?;
    match numeric_pair(a, b)? {
        Pair::Ints(x, y) => {
            if y == 0 {
                return Err(Error::DivisionByZero);
            }
            // checked_div only fails on i64::MIN // -1 here
            let Some(quotient) = x.checked_div(y) else {
                return Err(Error::Overflow { op: "//" });
            };
            let remainder = x % y;
            if remainder != 0 && (remainder < 0) != (y < 0) {
                Ok(Value::Int(quotient - 1))
            } else {
                Ok(Value::Int(quotient))
            }
        }
        Pair::Floats(x, y) => {
            if y == 0.0 {
                return Err(Error::DivisionByZero);
            }
            Ok(Value::Float((x / y).floor()))
        }
    }
}

/// `(** a b)` - exponentiation
///
/// Two ints with a non-negative exponent stay exact; a negative exponent
/// falls back to float math. Example: `(** 2 10)` returns `1024`.
fn pow(args: &[Value]) -> Result<Value> {
    let (a, b) = binary(args)?;
    match numeric_pair(a, b)? {
        Pair::Ints(x, y) => {
            if y >= 0 {
                let exponent =
                    u32::try_from(y).map_err(|_| Error::Overflow { op: "**" })?;
                x.checked_pow(exponent)
                    .map(Value::Int)
                    .ok_or(Error::Overflow { op: "**" })
            } else if x == 0 {
                Err(Error::DivisionByZero)
            } else {
                Ok(Value::Float((x as f64).powf(y as f64)))
            }
        }
        Pair::Floats(x, y) => Ok(Value::Float(x.powf(y))),
    }
}

/// Shared body of `<`, `<=`, `>`, and `>=`
///
/// Numbers compare across int/float; strings compare lexicographically.
/// An unordered comparison (a NaN operand) is false for all four operators.
fn compare(args: &[Value], accept: fn(Ordering) -> bool) -> Result<Value> {
    let (a, b) = binary(args)?;
    let ordering = match (a, b) {
        (Value::Str(x), Value::Str(y)) => x.partial_cmp(y),
        _ => match numeric_pair(a, b)? {
            Pair::Ints(x, y) => x.partial_cmp(&y),
            Pair::Floats(x, y) => x.partial_cmp(&y),
        },
    };
    Ok(Value::Bool(ordering.map_or(false, accept)))
}
