//! Sequence and string natives: indexing and length

use crate::error::{Error, Result};
use crate::runtime::{Env, NativeFn, Value};
use crate::stdlib::{binary, unary};

/// Install the sequence natives
pub(crate) fn install(env: &Env) {
    let get_item = NativeFn::eager("get-item", |args| {
        let (target, index) = binary(args)?;
        item(target, index)
    });
    env.declare("get-item", get_item.clone());
    env.declare("[]", get_item);

    env.declare("length", NativeFn::eager("length", length));
}

/// `(get-item target index)` - element access, also bound as `[]`
///
/// Negative indexes count back from the end. Indexing a string yields a
/// one-character string. Example: `([] (quote (1 2 3)) -1)` returns `3`.
fn item(target: &Value, index: &Value) -> Result<Value> {
    let Value::Int(raw) = index else {
        return Err(Error::type_mismatch("int index", index.type_name()));
    };

    match target {
        Value::Sequence(items) => {
            let idx = resolve_index(*raw, items.len())?;
            Ok(items[idx].clone())
        }
        Value::Str(text) => {
            let count = text.chars().count();
            let idx = resolve_index(*raw, count)?;
            match text.chars().nth(idx) {
                Some(c) => Ok(Value::Str(c.to_string())),
                None => Err(Error::IndexOutOfRange {
                    index: *raw,
                    length: count,
                }),
            }
        }
        other => Err(Error::type_mismatch("sequence or string", other.type_name())),
    }
}

/// `(length x)` - element count of a sequence, character count of a string
fn length(args: &[Value]) -> Result<Value> {
    let value = unary(args)?;
    let n = match value {
        Value::Sequence(items) => items.len(),
        Value::Str(text) => text.chars().count(),
        other => {
            return Err(Error::type_mismatch(
                "sequence or string",
                other.type_name(),
            ))
        }
    };
    Ok(Value::Int(n as i64))
}

/// Maps a possibly negative user index onto `0..length`
fn resolve_index(raw: i64, length: usize) -> Result<usize> {
    let length_i = length as i64;
    let out_of_range = Error::IndexOutOfRange { index: raw, length };

    let adjusted = if raw < 0 {
        match raw.checked_add(length_i) {
            Some(adjusted) => adjusted,
            None => return Err(out_of_range),
        }
    } else {
        raw
    };
    if adjusted < 0 || adjusted >= length_i {
        return Err(out_of_range);
    }
    Ok(adjusted as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq() -> Value {
        Value::sequence(vec![Value::Int(10), Value::Int(20), Value::Int(30)])
    }

    #[test]
    fn test_indexing_from_the_front() {
        assert_eq!(item(&seq(), &Value::Int(0)).unwrap(), Value::Int(10));
        assert_eq!(item(&seq(), &Value::Int(2)).unwrap(), Value::Int(30));
    }

    #[test]
    fn test_negative_indexes_count_back() {
        assert_eq!(item(&seq(), &Value::Int(-1)).unwrap(), Value::Int(30));
        assert_eq!(item(&seq(), &Value::Int(-3)).unwrap(), Value::Int(10));
    }

    #[test]
    fn test_out_of_range_reports_the_written_index() {
        assert_eq!(
            item(&seq(), &Value::Int(3)).unwrap_err(),
            Error::IndexOutOfRange { index: 3, length: 3 }
        );
        assert_eq!(
            item(&seq(), &Value::Int(-4)).unwrap_err(),
            Error::IndexOutOfRange { index: -4, length: 3 }
        );
        // Huge negative indexes do not wrap
        assert!(matches!(
            item(&seq(), &Value::Int(i64::MIN)).unwrap_err(),
            Error::IndexOutOfRange { .. }
        ));
    }

    #[test]
    fn test_string_indexing_is_by_character() {
        let text = Value::Str("héllo".to_string());
        assert_eq!(
            item(&text, &Value::Int(1)).unwrap(),
            Value::Str("é".to_string())
        );
        assert_eq!(
            item(&text, &Value::Int(-1)).unwrap(),
            Value::Str("o".to_string())
        );
    }

    #[test]
    fn test_index_must_be_an_int() {
        let err = item(&seq(), &Value::Float(1.0)).unwrap_err();
        assert_eq!(err, Error::type_mismatch("int index", "float"));
    }

    #[test]
    fn test_only_sequences_and_strings_index() {
        let err = item(&Value::Int(5), &Value::Int(0)).unwrap_err();
        assert_eq!(err, Error::type_mismatch("sequence or string", "int"));
    }

    #[test]
    fn test_length() {
        assert_eq!(length(&[seq()]).unwrap(), Value::Int(3));
        assert_eq!(
            length(&[Value::Str("héllo".to_string())]).unwrap(),
            Value::Int(5)
        );
        assert_eq!(length(&[Value::sequence(Vec::new())]).unwrap(), Value::Int(0));
        assert!(length(&[Value::Int(1)]).is_err());
    }
}
