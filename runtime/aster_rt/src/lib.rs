//! Runtime value core for AOT-compiled Aster programs.
//!
//! The Aster compiler erases the source language's types and emits native
//! code in which every datum is one uniform, dynamically-tagged [`Value`].
//! This crate is that value: sixteen tagged variants covering scalars,
//! strings, callables, containers and deferred computations, plus the
//! operator suite and accessors the generated code calls into.
//!
//! # Execution model
//!
//! Single-threaded, by contract. Heap payloads are shared through
//! [`Managed`] handles built on `Rc`, thunk cells memoize through
//! `RefCell`, and nothing here is `Send` or `Sync`. A host embedding
//! compiled Aster code runs it on one thread.
//!
//! # Laziness
//!
//! Any value may be a thunk. Operations that need a concrete tag force
//! first — iteratively, so a chain of thunks resolving to thunks collapses
//! with bounded stack — and memoize the result in every cell on the chain.
//! Copying a value never forces it.
//!
//! # Ownership backends
//!
//! The default build reclaims heap payloads by reference counting. With
//! `--features traced`, payloads are instead registered with a block
//! registry for an external conservative collector and never freed by
//! value destructors; see [`managed`].
//!
//! # Error model
//!
//! Exactly one failure kind exists: the **contract violation**, raised
//! when generated code does something the source type system should have
//! ruled out (extracting the wrong tag, calling a non-callable, forcing a
//! cyclic thunk). Debug builds panic with a descriptive message; release
//! builds assume violations cannot happen and make hitting one undefined
//! behavior. There are no recoverable runtime errors and no error type.

mod contract;
pub mod managed;
mod ops;
pub mod stack;
pub mod symbol;
pub mod value;

pub use managed::Managed;
pub use symbol::{symbol, Symbol};
pub use value::{Boxed, Closure, EffClosure, Thunk, Value};
