//! Polymorphic operators over runtime values.
//!
//! Every operator forces its operands first, then dispatches on the forced
//! tags. The legal tag combinations are fixed by the source language's
//! type system; anything outside them is a contract violation, not a
//! recoverable error (see the crate docs).
//!
//! Two shapes of each operator exist, matching the two shapes of operand
//! the code generator produces:
//!
//! - **uniform**: both operands are values; the result is re-wrapped as a
//!   value (`&Value + &Value -> Value`).
//! - **mixed**: one operand is already a native scalar because the code
//!   generator could see its type; the value operand is extracted and the
//!   result stays native (`&Value + i64 -> i64`, `Value == 'x'`, …). This
//!   keeps known-scalar arithmetic out of the boxing churn.
//!
//! Arithmetic legality mirrors the source language: `+ - * /` over
//! integers, floats and characters (plus `+` as string concatenation),
//! `%` over integers and characters, unary `-` over integers and floats.
//! Comparisons cover integers, floats, characters, booleans, strings
//! (content-wise, across both representations), boxed objects (by
//! allocation identity) and raw pointers (by address).

use std::cmp::Ordering;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

use crate::contract::violation;
use crate::managed::Managed;
use crate::value::{wrong_tag, Value};

/// String content of an already-forced value, without copying.
fn str_view(v: &Value) -> &str {
    match v {
        Value::StrLit(s) => s,
        Value::Str(s) => s.as_str(),
        other => wrong_tag("string", other),
    }
}

/// Character arithmetic runs on scalar values; an operation that leaves
/// the valid scalar range is a contract violation.
fn char_arith(op: &str, a: char, b: char, f: impl FnOnce(u32, u32) -> Option<u32>) -> char {
    match f(u32::from(a), u32::from(b)).and_then(char::from_u32) {
        Some(c) => c,
        None => violation!("character `{op}` produced an invalid scalar value"),
    }
}

// ── Comparison ──────────────────────────────────────────────────────────

/// Force both operands and compare them. `None` only for incomparable
/// floats (NaN operands); a tag combination outside the comparable set is
/// a contract violation.
fn compare(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    let lhs = lhs.forced();
    let rhs = rhs.forced();
    match (&*lhs, &*rhs) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Char(a), Value::Char(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (a @ (Value::StrLit(_) | Value::Str(_)), b @ (Value::StrLit(_) | Value::Str(_))) => {
            Some(str_view(a).cmp(str_view(b)))
        }
        (Value::Ptr(a), Value::Ptr(b)) => Some(Managed::addr(a).cmp(&Managed::addr(b))),
        (Value::RawPtr(a), Value::RawPtr(b)) => Some((*a as usize).cmp(&(*b as usize))),
        (a, b) => violation!("cannot compare {} with {}", a.tag_name(), b.tag_name()),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        matches!(compare(self, other), Some(Ordering::Equal))
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        compare(self, other)
    }
}

// Mixed comparisons against native scalars, both operand orders.
macro_rules! mixed_cmp {
    ($native:ty, $extract:ident) => {
        impl PartialEq<$native> for Value {
            fn eq(&self, other: &$native) -> bool {
                self.$extract() == *other
            }
        }

        impl PartialEq<Value> for $native {
            fn eq(&self, other: &Value) -> bool {
                *self == other.$extract()
            }
        }

        impl PartialOrd<$native> for Value {
            fn partial_cmp(&self, other: &$native) -> Option<Ordering> {
                self.$extract().partial_cmp(other)
            }
        }

        impl PartialOrd<Value> for $native {
            fn partial_cmp(&self, other: &Value) -> Option<Ordering> {
                self.partial_cmp(&other.$extract())
            }
        }
    };
}

mixed_cmp!(i64, as_int);
mixed_cmp!(f64, as_float);
mixed_cmp!(char, as_char);
mixed_cmp!(bool, as_bool);

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        &*self.as_str() == *other
    }
}

impl PartialEq<Value> for &str {
    fn eq(&self, other: &Value) -> bool {
        *self == &*other.as_str()
    }
}

impl PartialOrd<&str> for Value {
    fn partial_cmp(&self, other: &&str) -> Option<Ordering> {
        Some((*self.as_str()).cmp(*other))
    }
}

impl PartialOrd<Value> for &str {
    fn partial_cmp(&self, other: &Value) -> Option<Ordering> {
        Some((*self).cmp(&*other.as_str()))
    }
}

// ── Uniform arithmetic ──────────────────────────────────────────────────

impl Add for &Value {
    type Output = Value;

    fn add(self, rhs: &Value) -> Value {
        let lhs = self.forced();
        let rhs = rhs.forced();
        match (&*lhs, &*rhs) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a + b),
            (Value::Float(a), Value::Float(b)) => Value::Float(a + b),
            (Value::Char(a), Value::Char(b)) => {
                Value::Char(char_arith("+", *a, *b, u32::checked_add))
            }
            (a @ (Value::StrLit(_) | Value::Str(_)), b @ (Value::StrLit(_) | Value::Str(_))) => {
                let (l, r) = (str_view(a), str_view(b));
                let mut out = String::with_capacity(l.len() + r.len());
                out.push_str(l);
                out.push_str(r);
                Value::string(out)
            }
            (a, b) => violation!("cannot add {} to {}", b.tag_name(), a.tag_name()),
        }
    }
}

impl Sub for &Value {
    type Output = Value;

    fn sub(self, rhs: &Value) -> Value {
        let lhs = self.forced();
        let rhs = rhs.forced();
        match (&*lhs, &*rhs) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a - b),
            (Value::Float(a), Value::Float(b)) => Value::Float(a - b),
            (Value::Char(a), Value::Char(b)) => {
                Value::Char(char_arith("-", *a, *b, u32::checked_sub))
            }
            (a, b) => violation!("cannot subtract {} from {}", b.tag_name(), a.tag_name()),
        }
    }
}

impl Mul for &Value {
    type Output = Value;

    fn mul(self, rhs: &Value) -> Value {
        let lhs = self.forced();
        let rhs = rhs.forced();
        match (&*lhs, &*rhs) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a * b),
            (Value::Float(a), Value::Float(b)) => Value::Float(a * b),
            (Value::Char(a), Value::Char(b)) => {
                Value::Char(char_arith("*", *a, *b, u32::checked_mul))
            }
            (a, b) => violation!("cannot multiply {} by {}", a.tag_name(), b.tag_name()),
        }
    }
}

impl Div for &Value {
    type Output = Value;

    fn div(self, rhs: &Value) -> Value {
        let lhs = self.forced();
        let rhs = rhs.forced();
        match (&*lhs, &*rhs) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a / b),
            (Value::Float(a), Value::Float(b)) => Value::Float(a / b),
            (Value::Char(a), Value::Char(b)) => {
                Value::Char(char_arith("/", *a, *b, u32::checked_div))
            }
            (a, b) => violation!("cannot divide {} by {}", a.tag_name(), b.tag_name()),
        }
    }
}

impl Rem for &Value {
    type Output = Value;

    fn rem(self, rhs: &Value) -> Value {
        let lhs = self.forced();
        let rhs = rhs.forced();
        match (&*lhs, &*rhs) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a % b),
            (Value::Char(a), Value::Char(b)) => {
                Value::Char(char_arith("%", *a, *b, u32::checked_rem))
            }
            (a, b) => violation!("cannot take {} modulo {}", a.tag_name(), b.tag_name()),
        }
    }
}

impl Neg for &Value {
    type Output = Value;

    fn neg(self) -> Value {
        match &*self.forced() {
            Value::Int(n) => Value::Int(-n),
            Value::Float(n) => Value::Float(-n),
            other => violation!("cannot negate {}", other.tag_name()),
        }
    }
}

// Owned-operand forms delegate to the reference forms.
macro_rules! owned_binop {
    ($trait:ident, $method:ident) => {
        impl $trait for Value {
            type Output = Value;

            fn $method(self, rhs: Value) -> Value {
                $trait::$method(&self, &rhs)
            }
        }
    };
}

owned_binop!(Add, add);
owned_binop!(Sub, sub);
owned_binop!(Mul, mul);
owned_binop!(Div, div);
owned_binop!(Rem, rem);

impl Neg for Value {
    type Output = Value;

    fn neg(self) -> Value {
        -&self
    }
}

// ── Mixed arithmetic ────────────────────────────────────────────────────

// Native-scalar forms, both operand orders; the result stays native.
macro_rules! mixed_arith {
    ($trait:ident, $method:ident, $native:ty, $extract:ident, $apply:expr) => {
        impl $trait<$native> for &Value {
            type Output = $native;

            fn $method(self, rhs: $native) -> $native {
                $apply(self.$extract(), rhs)
            }
        }

        impl $trait<&Value> for $native {
            type Output = $native;

            fn $method(self, rhs: &Value) -> $native {
                $apply(self, rhs.$extract())
            }
        }
    };
}

mixed_arith!(Add, add, i64, as_int, |a, b| a + b);
mixed_arith!(Sub, sub, i64, as_int, |a, b| a - b);
mixed_arith!(Mul, mul, i64, as_int, |a, b| a * b);
mixed_arith!(Div, div, i64, as_int, |a, b| a / b);
mixed_arith!(Rem, rem, i64, as_int, |a, b| a % b);

mixed_arith!(Add, add, f64, as_float, |a, b| a + b);
mixed_arith!(Sub, sub, f64, as_float, |a, b| a - b);
mixed_arith!(Mul, mul, f64, as_float, |a, b| a * b);
mixed_arith!(Div, div, f64, as_float, |a, b| a / b);

mixed_arith!(Add, add, char, as_char, |a, b| char_arith(
    "+",
    a,
    b,
    u32::checked_add
));
mixed_arith!(Sub, sub, char, as_char, |a, b| char_arith(
    "-",
    a,
    b,
    u32::checked_sub
));
mixed_arith!(Mul, mul, char, as_char, |a, b| char_arith(
    "*",
    a,
    b,
    u32::checked_mul
));
mixed_arith!(Div, div, char, as_char, |a, b| char_arith(
    "/",
    a,
    b,
    u32::checked_div
));
mixed_arith!(Rem, rem, char, as_char, |a, b| char_arith(
    "%",
    a,
    b,
    u32::checked_rem
));

// String concatenation against a native slice yields a native string.
impl Add<&str> for &Value {
    type Output = String;

    fn add(self, rhs: &str) -> String {
        let lhs = self.as_str();
        let mut out = String::with_capacity(lhs.len() + rhs.len());
        out.push_str(&lhs);
        out.push_str(rhs);
        out
    }
}

impl Add<&Value> for &str {
    type Output = String;

    fn add(self, rhs: &Value) -> String {
        let rhs = rhs.as_str();
        let mut out = String::with_capacity(self.len() + rhs.len());
        out.push_str(self);
        out.push_str(&rhs);
        out
    }
}
