//! The uniform tagged runtime value.
//!
//! Every datum a compiled Aster program computes — literals, data
//! constructors, records, arrays, functions, deferred computations — is a
//! [`Value`]. The active variant is recorded by the enum discriminant and
//! never inferred from payload bits; Rust's enum machinery owns the
//! per-variant destructor dispatch that a hand-rolled tagged union would
//! need construct/destruct tables for.
//!
//! Values are immutable after construction with one deliberate exception:
//! a thunk cell rewrites itself from suspended to forced the first time it
//! is resolved (see [`thunk`]).
//!
//! # Construction
//!
//! Generated code never names a tag. It constructs through the factory
//! methods (`Value::int`, `Value::string`, `Value::closure`, …) or the
//! `From` impls, which select the tag from the source type's shape.
//!
//! # Extraction
//!
//! The `as_*` extractors force their operand, assert the active tag
//! matches the requested type (a contract violation otherwise — see the
//! crate docs for the debug/release split), and hand back the native
//! payload.
//!
//! # Thread safety
//!
//! None, by contract: values hold `Rc` and `RefCell` internals and are
//! neither `Send` nor `Sync`. Sharing a `Value` across threads without
//! external synchronization is unsound, and the compiler enforces it.

mod callable;
mod thunk;

use std::any::Any;
use std::borrow::Cow;
use std::collections::VecDeque;
use std::fmt;

use smallvec::SmallVec;

use crate::contract::violation;
use crate::managed::Managed;
use crate::symbol::Symbol;

pub use callable::{Closure, EffClosure};
pub use thunk::Thunk;

/// Data-constructor field vector with inline storage for small arities.
pub type Fields = SmallVec<[Value; 4]>;

/// Ordered record entries; keys are unique interned symbols.
pub type Entries = Vec<(Symbol, Value)>;

/// Uniform, dynamically-tagged runtime value.
#[derive(Clone)]
pub enum Value {
    /// Deferred computation, forced on demand and memoized.
    Thunk(Managed<Thunk>),
    /// Integer.
    Int(i64),
    /// Double-precision float.
    Float(f64),
    /// Character.
    Char(char),
    /// Boolean.
    Bool(bool),
    /// String literal in static storage; never freed.
    StrLit(&'static str),
    /// Heap-allocated, shared string.
    Str(Managed<String>),
    /// Top-level one-argument code pointer; no captured environment.
    Fn(fn(&Value) -> Value),
    /// Top-level zero-argument effect code pointer.
    EffFn(fn() -> Value),
    /// One-argument callable with a captured environment.
    Closure(Managed<Closure>),
    /// Zero-argument effectful callable with a captured environment.
    EffClosure(Managed<EffClosure>),
    /// Untyped, non-owned pointer (null/sentinel values, FFI interop).
    RawPtr(*const ()),
    /// Shared reference to an arbitrary boxed object.
    Ptr(Managed<Boxed>),
    /// Ordered, shared sequence with efficient access at both ends.
    Array(Managed<VecDeque<Value>>),
    /// Record: ordered (symbol, value) pairs with unique keys.
    Map(Managed<Entries>),
    /// Data-constructor field tuple; field 0 conventionally holds the
    /// constructor discriminant for multi-constructor sum types.
    Data(Managed<Fields>),
}

// ── Construction ────────────────────────────────────────────────────────

impl Value {
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    pub fn float(n: f64) -> Self {
        Value::Float(n)
    }

    /// String literal in static storage.
    pub fn literal(s: &'static str) -> Self {
        Value::StrLit(s)
    }

    /// Heap-allocated, shared string.
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Managed::new(s.into()))
    }

    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(Managed::new(items.into_iter().collect()))
    }

    /// Record from (symbol, value) entries. Keys must be unique; the
    /// compiler guarantees this for generated code.
    pub fn map(entries: impl IntoIterator<Item = (Symbol, Value)>) -> Self {
        Value::Map(Managed::new(entries.into_iter().collect()))
    }

    /// Data-constructor field tuple.
    pub fn data(fields: impl IntoIterator<Item = Value>) -> Self {
        Value::Data(Managed::new(fields.into_iter().collect()))
    }

    /// Top-level one-argument code pointer.
    pub fn function(f: fn(&Value) -> Value) -> Self {
        Value::Fn(f)
    }

    /// Top-level zero-argument effect code pointer.
    pub fn eff_function(f: fn() -> Value) -> Self {
        Value::EffFn(f)
    }

    /// Environment-capturing one-argument callable.
    pub fn closure(f: impl Fn(&Value) -> Value + 'static) -> Self {
        Value::Closure(Managed::new(Closure::new(f)))
    }

    /// Environment-capturing zero-argument effectful callable.
    pub fn eff_closure(f: impl Fn() -> Value + 'static) -> Self {
        Value::EffClosure(Managed::new(EffClosure::new(f)))
    }

    /// Deferred computation, forced on demand and memoized.
    pub fn thunk(f: impl Fn() -> Value + 'static) -> Self {
        Value::Thunk(Managed::new(Thunk::new(f)))
    }

    /// Shared reference to an arbitrary boxed object.
    pub fn boxed(value: impl Any) -> Self {
        Value::Ptr(Managed::new(Boxed::new(value)))
    }

    /// Untyped, non-owned pointer.
    pub fn raw(ptr: *const ()) -> Self {
        Value::RawPtr(ptr)
    }

    /// The null raw pointer, used as the language's sentinel value.
    pub fn null() -> Self {
        Value::RawPtr(std::ptr::null())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&'static str> for Value {
    fn from(s: &'static str) -> Self {
        Value::StrLit(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl From<VecDeque<Value>> for Value {
    fn from(items: VecDeque<Value>) -> Self {
        Value::Array(Managed::new(items))
    }
}

impl From<fn(&Value) -> Value> for Value {
    fn from(f: fn(&Value) -> Value) -> Self {
        Value::Fn(f)
    }
}

impl From<fn() -> Value> for Value {
    fn from(f: fn() -> Value) -> Self {
        Value::EffFn(f)
    }
}

// ── Forcing ─────────────────────────────────────────────────────────────

impl Value {
    /// Resolve this value to its final non-thunk variant.
    ///
    /// Non-thunks are returned borrowed (copying a value never forces
    /// it); thunks are resolved through the whole chain and the final
    /// value is returned owned. Forcing is idempotent and memoized.
    pub fn forced(&self) -> Cow<'_, Value> {
        match self {
            Value::Thunk(cell) => Cow::Owned(force_chain(cell)),
            _ => Cow::Borrowed(self),
        }
    }

    /// Tag name for diagnostics.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Value::Thunk(_) => "Thunk",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Char(_) => "Char",
            Value::Bool(_) => "Bool",
            Value::StrLit(_) => "StrLit",
            Value::Str(_) => "Str",
            Value::Fn(_) => "Fn",
            Value::EffFn(_) => "EffFn",
            Value::Closure(_) => "Closure",
            Value::EffClosure(_) => "EffClosure",
            Value::RawPtr(_) => "RawPtr",
            Value::Ptr(_) => "Ptr",
            Value::Array(_) => "Array",
            Value::Map(_) => "Map",
            Value::Data(_) => "Data",
        }
    }
}

/// Collapse a thunk chain iteratively with an explicit worklist, then
/// memoize every cell on the chain to the final non-thunk value. Chain
/// depth never translates into call-stack depth here.
fn force_chain(first: &Managed<Thunk>) -> Value {
    let mut chain = vec![first.clone()];
    let mut value = first.step();
    while let Value::Thunk(next) = value {
        value = next.step();
        chain.push(next);
    }
    for cell in &chain {
        cell.memoize(&value);
    }
    value
}

// ── Extraction ──────────────────────────────────────────────────────────

/// Tag mismatch at an extraction or dispatch site.
#[cold]
pub(crate) fn wrong_tag(expected: &'static str, found: &Value) -> ! {
    violation!("expected {expected} value, found {}", found.tag_name())
}

impl Value {
    pub fn as_int(&self) -> i64 {
        match &*self.forced() {
            Value::Int(n) => *n,
            other => wrong_tag("Int", other),
        }
    }

    pub fn as_float(&self) -> f64 {
        match &*self.forced() {
            Value::Float(n) => *n,
            other => wrong_tag("Float", other),
        }
    }

    pub fn as_bool(&self) -> bool {
        match &*self.forced() {
            Value::Bool(b) => *b,
            other => wrong_tag("Bool", other),
        }
    }

    pub fn as_char(&self) -> char {
        match &*self.forced() {
            Value::Char(c) => *c,
            other => wrong_tag("Char", other),
        }
    }

    /// String content, representation-independent over `StrLit`/`Str`.
    pub fn as_str(&self) -> Cow<'_, str> {
        match self.forced() {
            Cow::Borrowed(Value::StrLit(s)) => Cow::Borrowed(*s),
            Cow::Borrowed(Value::Str(s)) => Cow::Borrowed(s.as_str()),
            Cow::Owned(Value::StrLit(s)) => Cow::Borrowed(s),
            Cow::Owned(Value::Str(s)) => Cow::Owned((*s).clone()),
            Cow::Borrowed(other) => wrong_tag("string", other),
            Cow::Owned(other) => wrong_tag("string", &other),
        }
    }

    /// Shared handle to the underlying sequence.
    pub fn as_array(&self) -> Managed<VecDeque<Value>> {
        match &*self.forced() {
            Value::Array(items) => items.clone(),
            other => wrong_tag("Array", other),
        }
    }

    pub fn as_raw(&self) -> *const () {
        match &*self.forced() {
            Value::RawPtr(p) => *p,
            other => wrong_tag("RawPtr", other),
        }
    }

    /// Shared handle to the boxed object; extract with [`Boxed::get`].
    pub fn as_boxed(&self) -> Managed<Boxed> {
        match &*self.forced() {
            Value::Ptr(obj) => obj.clone(),
            other => wrong_tag("Ptr", other),
        }
    }
}

// ── Invocation ──────────────────────────────────────────────────────────

impl Value {
    /// Call with one argument. The callee must resolve to `Closure` or
    /// `Fn`; anything else is a contract violation.
    pub fn call(&self, arg: &Value) -> Value {
        let callee = self.forced();
        crate::stack::ensure_sufficient_stack(|| match &*callee {
            Value::Closure(c) => c.invoke(arg),
            Value::Fn(f) => f(arg),
            other => wrong_tag("callable", other),
        })
    }

    /// Run as a zero-argument effect. The callee must resolve to
    /// `EffClosure` or `EffFn`.
    pub fn call0(&self) -> Value {
        let callee = self.forced();
        crate::stack::ensure_sufficient_stack(|| match &*callee {
            Value::EffClosure(c) => c.invoke(),
            Value::EffFn(f) => f(),
            other => wrong_tag("effect", other),
        })
    }
}

// ── Arrays ──────────────────────────────────────────────────────────────

impl Value {
    /// Element at `idx`. Bounds are a debug-only contract check; the code
    /// generator knows the length.
    pub fn index(&self, idx: usize) -> Value {
        match &*self.forced() {
            Value::Array(items) => match items.get(idx) {
                Some(v) => v.clone(),
                None => violation!("array index {idx} out of bounds (len {})", items.len()),
            },
            other => wrong_tag("Array", other),
        }
    }

    /// Element at a runtime-computed integer index.
    pub fn index_value(&self, idx: &Value) -> Value {
        let n = idx.as_int();
        match usize::try_from(n) {
            Ok(i) => self.index(i),
            Err(_) => violation!("negative array index {n}"),
        }
    }

    /// Array length.
    pub fn len(&self) -> usize {
        match &*self.forced() {
            Value::Array(items) => items.len(),
            other => wrong_tag("Array", other),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// New array with `head` prepended to `tail`.
    pub fn cons(head: Value, tail: &Value) -> Value {
        let mut items = (*tail.as_array()).clone();
        items.push_front(head);
        Value::Array(Managed::new(items))
    }

    /// New array with `last` appended to `init`.
    pub fn snoc(init: &Value, last: Value) -> Value {
        let mut items = (*init.as_array()).clone();
        items.push_back(last);
        Value::Array(Managed::new(items))
    }
}

// ── Records and data constructors ───────────────────────────────────────

impl Value {
    /// Field lookup by interned symbol. Linear scan by token identity; a
    /// missing key is a contract violation.
    pub fn get(&self, key: Symbol) -> Value {
        match &*self.forced() {
            Value::Map(entries) => {
                for (k, v) in entries.iter() {
                    if *k == key {
                        return v.clone();
                    }
                }
                violation!("map key `{}` not found", key.name())
            }
            other => wrong_tag("Map", other),
        }
    }

    /// Whether the record has an entry for `key`. Same scan as [`get`],
    /// non-failing.
    ///
    /// [`get`]: Value::get
    pub fn contains(&self, key: Symbol) -> bool {
        match &*self.forced() {
            Value::Map(entries) => entries.iter().any(|(k, _)| *k == key),
            other => wrong_tag("Map", other),
        }
    }

    /// Data-constructor field at a compile-time-known offset. Arity
    /// mismatch is a debug-only contract check.
    pub fn field(&self, idx: usize) -> Value {
        match &*self.forced() {
            Value::Data(fields) => match fields.get(idx) {
                Some(v) => v.clone(),
                None => violation!("data field {idx} out of bounds (arity {})", fields.len()),
            },
            other => wrong_tag("Data", other),
        }
    }

    /// Constructor discriminant: field 0 as an integer.
    pub fn ctor(&self) -> i64 {
        self.field(0).as_int()
    }
}

// ── Boxed objects ───────────────────────────────────────────────────────

/// Type-erased boxed payload behind a `Ptr` value.
///
/// The tag says only "some boxed object"; the expected concrete type is
/// asserted at extraction time.
pub struct Boxed {
    inner: Box<dyn Any>,
}

impl Boxed {
    pub fn new(value: impl Any) -> Self {
        Boxed {
            inner: Box::new(value),
        }
    }

    /// Payload reference, asserting the expected concrete type.
    pub fn get<T: Any>(&self) -> &T {
        match self.inner.downcast_ref::<T>() {
            Some(v) => v,
            None => violation!("boxed payload is not a {}", std::any::type_name::<T>()),
        }
    }

    /// Non-asserting payload access.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }
}

impl fmt::Debug for Boxed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<boxed>")
    }
}

// ── Debug formatting ────────────────────────────────────────────────────

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Thunk(t) => write!(f, "{:?}", &**t),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(n) => write!(f, "Float({n})"),
            Value::Char(c) => write!(f, "Char({c:?})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::StrLit(s) => write!(f, "StrLit({s:?})"),
            Value::Str(s) => write!(f, "Str({:?})", &**s),
            Value::Fn(_) => f.write_str("Fn(<code>)"),
            Value::EffFn(_) => f.write_str("EffFn(<code>)"),
            Value::Closure(_) => f.write_str("Closure(<captured>)"),
            Value::EffClosure(_) => f.write_str("EffClosure(<captured>)"),
            Value::RawPtr(p) => write!(f, "RawPtr({:p})", *p),
            Value::Ptr(_) => f.write_str("Ptr(<boxed>)"),
            Value::Array(items) => write!(f, "Array({:?})", &**items),
            Value::Map(entries) => {
                f.write_str("Map{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {v:?}", k.name())?;
                }
                f.write_str("}")
            }
            Value::Data(fields) => write!(f, "Data({:?})", &**fields),
        }
    }
}

#[cfg(test)]
mod tests;
