//! Deferred, force-on-demand computations.
//!
//! A thunk is an explicit state machine: `Suspended` holds the deferred
//! computation, `InProgress` marks a cell whose computation is currently
//! running (the black hole — forcing it again is a cyclic-value contract
//! violation), and `Forced` caches the final result. The machine
//! transitions exactly once and then stays `Forced` forever.
//!
//! The cell lives behind a shared [`crate::Managed`] handle, so every copy
//! of a thunk value observes memoization: the suspended computation runs
//! at most once no matter how many copies are forced.
//!
//! Chain collapsing (a thunk resolving to another thunk) is driven
//! iteratively by [`crate::Value::forced`], never by recursion through
//! this module.

use std::cell::RefCell;
use std::fmt;
use std::mem;

use crate::contract::violation;
use crate::value::Value;

enum State {
    Suspended(Box<dyn Fn() -> Value>),
    InProgress,
    Forced(Value),
}

/// Memoizing deferred computation cell.
pub struct Thunk {
    state: RefCell<State>,
}

impl Thunk {
    pub fn new(run: impl Fn() -> Value + 'static) -> Self {
        Thunk {
            state: RefCell::new(State::Suspended(Box::new(run))),
        }
    }

    /// Resolve this cell one step: return the cached result, or run the
    /// suspended computation and return whatever it produced (possibly
    /// another thunk). Leaves the cell `InProgress` until
    /// [`Thunk::memoize`] records the final value of the whole chain.
    pub(crate) fn step(&self) -> Value {
        let suspended = {
            let mut state = self.state.borrow_mut();
            match &*state {
                State::Forced(value) => return value.clone(),
                State::InProgress => {
                    violation!("thunk forced during its own evaluation (cyclic value)")
                }
                State::Suspended(_) => match mem::replace(&mut *state, State::InProgress) {
                    State::Suspended(run) => run,
                    _ => unreachable!(),
                },
            }
        };
        crate::stack::ensure_sufficient_stack(suspended)
    }

    /// Record the final non-thunk value of the chain this cell belongs to.
    /// No-op for cells that were already forced.
    pub(crate) fn memoize(&self, value: &Value) {
        let mut state = self.state.borrow_mut();
        if matches!(&*state, State::InProgress) {
            *state = State::Forced(value.clone());
        }
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state.try_borrow() {
            Ok(state) => match &*state {
                State::Suspended(_) => f.write_str("Thunk(suspended)"),
                State::InProgress => f.write_str("Thunk(in progress)"),
                State::Forced(value) => write!(f, "Thunk(forced {value:?})"),
            },
            Err(_) => f.write_str("Thunk(borrowed)"),
        }
    }
}

#[cfg(test)]
mod tests;
