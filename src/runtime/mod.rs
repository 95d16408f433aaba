//! Runtime execution for Glint programs: values, environments, and the
//! tree-walking evaluator

mod environment;
mod evaluator;
mod value;

pub use environment::{Env, DEFAULT_RECURSION_LIMIT};
pub use evaluator::{evaluate, invoke, run_program, Interpreter};
pub use value::{Callable, MacroFn, NativeFn, NativeImpl, Value};
