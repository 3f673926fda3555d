//! Shared-ownership backend for heap-backed value payloads.
//!
//! Every heap-backed variant of [`crate::Value`] (strings, arrays, maps,
//! data tuples, closures, boxed objects, thunks) holds its payload through
//! a [`Managed<T>`] handle. The handle has one API and two build-time
//! implementations, selected by the `traced` cargo feature:
//!
//! - **Refcounted** (default): wraps `Rc<T>`. Cloning increments the
//!   count, dropping decrements it, and the payload is freed
//!   deterministically when the count reaches zero.
//! - **Traced** (`--features traced`): wraps a leaked allocation that the
//!   value's destructor never frees. Every allocation is registered in a
//!   process-wide block registry (see [`traced`]) so an external
//!   conservative collector can discover live objects; reclamation is the
//!   collector's job, not this crate's.
//!
//! The two modes are behaviorally indistinguishable at call sites except
//! for teardown timing. `Rc` (not `Arc`) is intentional: the runtime's
//! execution model is single-threaded and values are neither `Send` nor
//! `Sync`.

use std::fmt;
use std::ops::Deref;

#[cfg(not(feature = "traced"))]
use std::rc::Rc;

// ── Refcounted mode ─────────────────────────────────────────────────────

/// Shared-ownership handle for a heap-allocated payload.
#[cfg(not(feature = "traced"))]
pub struct Managed<T>(Rc<T>);

#[cfg(not(feature = "traced"))]
impl<T> Managed<T> {
    /// Allocate a new shared payload with a reference count of one.
    pub fn new(value: T) -> Self {
        Managed(Rc::new(value))
    }

    /// Current number of live handles to this payload.
    ///
    /// Diagnostic hook, mirroring what generated cleanup code can observe;
    /// not part of the value semantics.
    pub fn strong_count(this: &Self) -> usize {
        Rc::strong_count(&this.0)
    }

    /// Whether two handles share one payload allocation.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Address of the payload allocation, for identity comparison.
    pub(crate) fn addr(this: &Self) -> usize {
        Rc::as_ptr(&this.0) as usize
    }
}

#[cfg(not(feature = "traced"))]
impl<T> Clone for Managed<T> {
    fn clone(&self) -> Self {
        Managed(Rc::clone(&self.0))
    }
}

#[cfg(not(feature = "traced"))]
impl<T> Deref for Managed<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

// ── Traced mode ─────────────────────────────────────────────────────────

/// Shared-ownership handle for a heap-allocated payload.
///
/// In traced mode the handle is a plain pointer to a leaked allocation;
/// cloning copies the pointer and dropping does nothing. The allocation is
/// registered with [`traced`] for collector discovery.
#[cfg(feature = "traced")]
pub struct Managed<T>(*const T);

#[cfg(feature = "traced")]
impl<T: 'static> Managed<T> {
    /// Allocate a new shared payload and register it with the collector
    /// registry. The allocation is never freed by this crate.
    pub fn new(value: T) -> Self {
        let leaked: &'static T = Box::leak(Box::new(value));
        traced::record(std::ptr::from_ref(leaked).cast::<()>());
        Managed(leaked)
    }

    /// Whether two handles share one payload allocation.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        std::ptr::eq(a.0, b.0)
    }

    /// Address of the payload allocation, for identity comparison.
    pub(crate) fn addr(this: &Self) -> usize {
        this.0 as usize
    }
}

#[cfg(feature = "traced")]
impl<T> Clone for Managed<T> {
    fn clone(&self) -> Self {
        Managed(self.0)
    }
}

#[cfg(feature = "traced")]
impl<T> Deref for Managed<T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the allocation was leaked in `new` and is never freed by
        // this crate, so the pointer stays valid for the program lifetime
        // (or until an external collector proves it unreachable, at which
        // point no handle to it can exist).
        unsafe { &*self.0 }
    }
}

impl<T: fmt::Debug> fmt::Debug for Managed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt(f)
    }
}

// ── Collector registry (traced mode) ────────────────────────────────────

/// Block registry for the external tracing collector.
///
/// This crate does not implement a collector; it only guarantees that
/// every heap block it allocates is recorded here, never freed by value
/// destructors, and that every reachable `Managed` handle lives either on
/// the stack, in a program root, or inside another recorded block — the
/// contract a conservative collector needs to discover the full object
/// graph.
#[cfg(feature = "traced")]
pub mod traced {
    use parking_lot::Mutex;

    /// A recorded heap block address.
    ///
    /// Raw pointers are not `Send`, but the registry only stores addresses
    /// for the collector to inspect; it never dereferences them.
    struct Block(*const ());

    // SAFETY: the registry treats block addresses as opaque integers.
    unsafe impl Send for Block {}

    static BLOCKS: Mutex<Vec<Block>> = Mutex::new(Vec::new());

    pub(super) fn record(ptr: *const ()) {
        BLOCKS.lock().push(Block(ptr));
    }

    /// Number of blocks allocated since process start.
    pub fn live_blocks() -> usize {
        BLOCKS.lock().len()
    }

    /// Visit every recorded block address.
    pub fn for_each_block(mut f: impl FnMut(*const ())) {
        for block in BLOCKS.lock().iter() {
            f(block.0);
        }
    }
}
