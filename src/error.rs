//! Error types for the Glint interpreter

use thiserror::Error;

/// Glint interpreter errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Read errors
    /// Syntax error encountered while reading source text
    ///
    /// **Triggered by:** Malformed source (unmatched parentheses, unterminated
    /// string literals, invalid escape sequences, empty call expressions)
    /// **Example:** `(+ 1 2` (missing closing parenthesis)
    #[error("Syntax error at offset {offset}: {message}")]
    Syntax {
        /// Byte offset into the source where the problem was detected
        offset: usize,
        /// Error description
        message: String,
    },

    // Runtime errors
    /// Reference to a name with no binding anywhere in the scope chain
    ///
    /// **Triggered by:** Looking up or assigning a name that was never declared
    /// **Example:** `x` (when `x` was never declared)
    /// **Prevention:** Introduce bindings with `(declare x value)` before use
    #[error("Unbound name: {name}")]
    UnboundName {
        /// The name that failed to resolve
        name: String,
    },

    /// Attempt to call a value that is not callable
    ///
    /// **Triggered by:** A call expression whose head evaluates to plain data
    /// **Example:** `(1 2 3)` (the head `1` is an integer)
    #[error("Value is not callable: {type_name}")]
    NotCallable {
        /// Type of the non-callable value
        type_name: String,
    },

    /// Callable invoked with the wrong number of arguments
    #[error("Arity mismatch: expected {expected} arguments, got {got}")]
    ArityMismatch {
        /// Number of arguments the callable accepts
        expected: usize,
        /// Number of arguments supplied at the call site
        got: usize,
    },

    /// Type mismatch error
    ///
    /// **Triggered by:** Operation expecting one type but receiving another
    /// **Example:** `(+ "hello" 5)` (string + number)
    #[error("Type error: expected {expected}, got {got}")]
    Type {
        /// Expected type
        expected: String,
        /// Actual type
        got: String,
    },

    /// Sequence or string index outside the valid range
    ///
    /// **Triggered by:** `get-item` with an index that resolves past either end
    /// **Example:** `([] (quote (1 2 3)) 5)` (index 5 when length is 3)
    #[error("Index {index} out of range for length {length}")]
    IndexOutOfRange {
        /// Requested index as written at the call site
        index: i64,
        /// Length of the indexed value
        length: usize,
    },

    /// Division by zero error
    ///
    /// **Triggered by:** Zero divisor in `/` or `//`, or `**` with base 0 and a
    /// negative exponent
    #[error("Division by zero")]
    DivisionByZero,

    /// Integer arithmetic overflowed the host integer type
    #[error("Integer overflow in `{op}`")]
    Overflow {
        /// Operator symbol
        op: &'static str,
    },

    /// Call nesting exceeded the root environment's recursion limit
    ///
    /// **Triggered by:** Runaway recursion through user-defined macros
    /// **Recovery:** Catchable; the call stack unwinds back to a consistent state
    #[error("Recursion limit exceeded (depth {limit})")]
    RecursionLimit {
        /// Configured maximum call depth
        limit: usize,
    },

    /// Writing to the print sink failed
    #[error("I/O error: {message}")]
    Io {
        /// Error message from the underlying writer
        message: String,
    },
}

impl Error {
    /// Create a syntax error at a byte offset
    pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Error::Syntax {
            offset,
            message: message.into(),
        }
    }

    /// Create a type error from an expectation and the offending type
    pub fn type_mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Error::Type {
            expected: expected.into(),
            got: got.into(),
        }
    }
}

/// Result type for Glint operations
pub type Result<T> = std::result::Result<T, Error>;
