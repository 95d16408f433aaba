use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::reader::Span;
use crate::runtime::Value;

/// Default maximum call depth before evaluation aborts with
/// [`Error::RecursionLimit`]
pub const DEFAULT_RECURSION_LIMIT: usize = 1024;

/// Environment for name scoping
///
/// An `Env` is a cheap shared handle: cloning it yields another handle to the
/// same mutable scope record. Environments form a parent-linked chain that
/// ends at an explicit root, and they are first-class runtime values, so a
/// scope stays alive for as long as any closure, binding, or host handle
/// still refers to it.
#[derive(Clone)]
pub struct Env {
    inner: Rc<RefCell<Scope>>,
}

/// Single scope record in a chain
struct Scope {
    /// Bindings local to this scope
    bindings: HashMap<String, Value>,
    /// Position of this scope in the chain
    link: Link,
}

/// Either the chain root or a pointer at the enclosing scope
enum Link {
    /// Chain root, carrying the interpreter-wide call diagnostics
    Root(RootState),
    /// Nested scope with its enclosing environment
    Child(Env),
}

/// Call-stack bookkeeping owned by the root of a chain
struct RootState {
    /// Spans of the call expressions currently being evaluated, innermost last
    frames: Vec<Span>,
    /// Maximum call depth before evaluation errors out
    recursion_limit: usize,
}

impl Env {
    /// Creates a new root environment with no bindings and an empty call stack
    pub fn root() -> Self {
        Env {
            inner: Rc::new(RefCell::new(Scope {
                bindings: HashMap::new(),
                link: Link::Root(RootState {
                    frames: Vec::new(),
                    recursion_limit: DEFAULT_RECURSION_LIMIT,
                }),
            })),
        }
    }

    /// Creates an empty scope whose parent is this environment
    pub fn child(&self) -> Self {
        Env {
            inner: Rc::new(RefCell::new(Scope {
                bindings: HashMap::new(),
                link: Link::Child(self.clone()),
            })),
        }
    }

    /// Resolves `name` against this scope and then each enclosing scope in
    /// turn, returning the first binding found
    pub fn lookup(&self, name: &str) -> Result<Value> {
        let mut current = self.clone();
        loop {
            let parent = {
                let scope = current.inner.borrow();
                if let Some(value) = scope.bindings.get(name) {
                    return Ok(value.clone());
                }
                scope.parent()
            };
            match parent {
                Some(parent) => current = parent,
                None => {
                    return Err(Error::UnboundName {
                        name: name.to_string(),
                    })
                }
            }
        }
    }

    /// Overwrites the nearest existing binding for `name`
    ///
    /// Assignment never creates a binding: if no scope in the chain binds
    /// `name`, the whole chain is left untouched and [`Error::UnboundName`]
    /// is returned.
    pub fn assign(&self, name: &str, value: Value) -> Result<()> {
        let mut current = self.clone();
        loop {
            let parent = {
                let mut scope = current.inner.borrow_mut();
                if let Some(slot) = scope.bindings.get_mut(name) {
                    *slot = value;
                    return Ok(());
                }
                scope.parent()
            };
            match parent {
                Some(parent) => current = parent,
                None => {
                    return Err(Error::UnboundName {
                        name: name.to_string(),
                    })
                }
            }
        }
    }

    /// Binds `name` in this scope, shadowing any binding of the same name in
    /// enclosing scopes and replacing a local one
    pub fn declare(&self, name: &str, value: Value) {
        self.inner
            .borrow_mut()
            .bindings
            .insert(name.to_string(), value);
    }

    /// True if `name` is bound in this scope or any enclosing one
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }

    /// Number of bindings local to this scope
    pub fn local_len(&self) -> usize {
        self.inner.borrow().bindings.len()
    }

    /// Records a call frame on the chain root's stack
    ///
    /// Fails without pushing once the stack has already reached the
    /// recursion limit.
    pub(crate) fn push_frame(&self, span: Span) -> Result<()> {
        self.with_root(|root| {
            if root.frames.len() >= root.recursion_limit {
                return Err(Error::RecursionLimit {
                    limit: root.recursion_limit,
                });
            }
            root.frames.push(span);
            Ok(())
        })
    }

    /// Removes the innermost call frame from the chain root's stack
    pub(crate) fn pop_frame(&self) {
        self.with_root(|root| {
            root.frames.pop();
        });
    }

    /// Spans of the call expressions currently in flight, outermost first
    pub fn call_trace(&self) -> Vec<Span> {
        self.with_root(|root| root.frames.clone())
    }

    /// Replaces the chain's maximum call depth
    pub fn set_recursion_limit(&self, limit: usize) {
        self.with_root(|root| root.recursion_limit = limit);
    }

    /// Current maximum call depth for this chain
    pub fn recursion_limit(&self) -> usize {
        self.with_root(|root| root.recursion_limit)
    }

    /// Runs `f` on the root state at the end of this chain
    fn with_root<T>(&self, f: impl FnOnce(&mut RootState) -> T) -> T {
        let mut current = self.clone();
        loop {
            let parent = {
                let mut scope = current.inner.borrow_mut();
                match &mut scope.link {
                    Link::Root(state) => return f(state),
                    Link::Child(parent) => parent.clone(),
                }
            };
            current = parent;
        }
    }
}

impl Scope {
    fn parent(&self) -> Option<Env> {
        match &self.link {
            Link::Root(_) => None,
            Link::Child(parent) => Some(parent.clone()),
        }
    }
}

/// Handle identity, not structural comparison: two `Env`s are equal when they
/// refer to the same scope record
impl PartialEq for Env {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Shallow formatting only. Scope chains can contain reference cycles (an
/// environment bound inside itself), so printing never follows bindings or
/// parents.
impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(scope) => write!(f, "Env({} bindings)", scope.bindings.len()),
            Err(_) => write!(f, "Env(<borrowed>)"),
        }
    }
}
