//! Environment-capturing callables.
//!
//! Top-level combinators compile to bare code pointers (`Value::Fn`,
//! `Value::EffFn`); locally-built closures capture an environment and
//! compile to these type-erased wrappers. Each wrapper has exactly the
//! same call shape as its bare counterpart, so call sites dispatch through
//! [`crate::Value::call`] / [`crate::Value::call0`] without caring how the
//! callable was produced.

use std::fmt;

use crate::value::Value;

/// One-argument callable with a captured environment.
pub struct Closure {
    run: Box<dyn Fn(&Value) -> Value>,
}

impl Closure {
    pub fn new(run: impl Fn(&Value) -> Value + 'static) -> Self {
        Closure { run: Box::new(run) }
    }

    pub(crate) fn invoke(&self, arg: &Value) -> Value {
        (self.run)(arg)
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<closure>")
    }
}

/// Zero-argument effectful callable with a captured environment.
pub struct EffClosure {
    run: Box<dyn Fn() -> Value>,
}

impl EffClosure {
    pub fn new(run: impl Fn() -> Value + 'static) -> Self {
        EffClosure { run: Box::new(run) }
    }

    pub(crate) fn invoke(&self) -> Value {
        (self.run)()
    }
}

impl fmt::Debug for EffClosure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<eff-closure>")
    }
}
