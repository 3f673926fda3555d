//! Contract-violation handling.
//!
//! Exactly one error kind exists in this runtime: a **contract violation**
//! (wrong tag for the requested operation, missing map key, unsupported
//! operator/tag combination, cyclic thunk). A violation means the code
//! generator emitted a call the type checker should have ruled out — it is
//! never a user-recoverable condition, so there is no error type, no
//! logging, and no retry path.
//!
//! With debug assertions enabled a violation panics immediately at the
//! site with a descriptive message. With them disabled the same code path
//! performs no check at all: the runtime tells the optimizer the branch is
//! unreachable. Hitting a violation in such a build is undefined behavior,
//! deliberately, in exchange for zero checking overhead.

use std::fmt;

/// Report a contract violation (debug builds).
#[cfg(debug_assertions)]
#[cold]
#[inline(never)]
pub(crate) fn violation_impl(args: fmt::Arguments<'_>) -> ! {
    panic!("contract violation: {args}");
}

/// Assume a contract violation away (release builds).
#[cfg(not(debug_assertions))]
#[inline(always)]
pub(crate) fn violation_impl(_args: fmt::Arguments<'_>) -> ! {
    // SAFETY: contract violations indicate code-generation bugs upstream of
    // this runtime. With debug assertions disabled the runtime's error model
    // (see crate docs) assumes violations cannot occur; reaching this point
    // is undefined behavior by design.
    unsafe { core::hint::unreachable_unchecked() }
}

/// Raise a contract violation with a formatted description.
macro_rules! violation {
    ($($arg:tt)*) => {
        $crate::contract::violation_impl(::core::format_args!($($arg)*))
    };
}

pub(crate) use violation;
