//! A value-semantic, type-erased callable with a fixed signature.
//!
//! [`Function<fn(A1, .., An) -> R>`] stores any `Fn(A1, .., An) -> R + Clone + 'static`
//! closure, function item or function pointer behind one uniform type.
//! Callables which fit in a machine pointer are stored inline, larger ones are boxed.
//!
//! ```
//! use minifunction::{BadFunctionCall, Function};
//!
//! let offset = 1;
//! let add = Function::<fn(i32) -> i32>::new(move |x: i32| x + offset);
//! assert_eq!(add.call(5), Ok(6));
//!
//! let empty = Function::<fn(i32) -> i32>::empty();
//! assert!(empty.is_none());
//! assert_eq!(empty.call(5), Err(BadFunctionCall));
//! ```
//!
//! Closure parameter types must be spelled out: they are not inferred through [`Callable`].
//!
//! [`Function<fn(A1, .., An) -> R>`]: struct.Function.html
//! [`Callable`]: trait.Callable.html

#[macro_use]
extern crate static_assertions;

mod descriptor;
mod error;
mod signature;
mod storage;

pub use {
    error::BadFunctionCall,
    signature::{Callable, Signature},
    storage::{is_inline, StorageTag, STORAGE_ALIGN, STORAGE_SIZE},
};

use {
    descriptor::Descriptor,
    std::{
        any::{self, TypeId},
        fmt,
        mem::{align_of, size_of},
    },
    storage::Storage,
};

/// Type-erased callable with the signature `S`, spelled as a function pointer type,
/// e.g. `Function<fn(i32) -> i32>`.
///
/// Either empty or holding exactly one callable.
/// Calling an empty `Function` returns [`BadFunctionCall`].
///
/// The callable is stored inline if it fits in [`STORAGE_SIZE`] bytes
/// (see [`is_inline`]); otherwise it is moved to the heap.
/// Every operation on the stored callable (clone, move, drop, call) is dispatched through
/// a static per-type descriptor; the `Function` itself never inspects the concrete type.
///
/// A `Function` is neither `Send` nor `Sync`.
///
/// [`BadFunctionCall`]: struct.BadFunctionCall.html
/// [`STORAGE_SIZE`]: constant.STORAGE_SIZE.html
/// [`is_inline`]: fn.is_inline.html
pub struct Function<S: Signature> {
    descriptor: &'static Descriptor<S>, // never null; the empty descriptor when empty
    storage: Storage,
}

assert_eq_size!(Function<fn(i32) -> i32>, [*const (); 2]);

impl<S: Signature> Function<S> {
    /// Creates an empty [`Function`].
    ///
    /// [`Function`]: struct.Function.html
    pub fn empty() -> Self {
        Function {
            descriptor: Descriptor::empty(),
            storage: Storage::uninit(),
        }
    }

    /// Creates a [`Function`] which holds the callable `f`.
    ///
    /// `f` is moved into inline storage if [`is_inline::<F>()`], into a new heap allocation otherwise.
    ///
    /// [`Function`]: struct.Function.html
    /// [`is_inline::<F>()`]: fn.is_inline.html
    pub fn new<F: Callable<S>>(f: F) -> Self {
        if !is_inline::<F>() {
            log::trace!(
                "boxing `{}` ({}b, align {}b)",
                any::type_name::<F>(),
                size_of::<F>(),
                align_of::<F>()
            );
        }

        let mut storage = Storage::uninit();

        // SAFETY: `storage` is fresh and is only ever accessed through `F`'s descriptor.
        unsafe {
            storage.init(f);
        }

        Function {
            descriptor: Descriptor::of::<F>(),
            storage,
        }
    }

    /// Replaces the stored callable, if any, with `f`.
    pub fn store<F: Callable<S>>(&mut self, f: F) {
        *self = Self::new(f);
    }

    /// Drops the stored callable, if any; frees the heap allocation, if necessary.
    ///
    /// The [`Function`] is empty afterwards.
    ///
    /// [`Function`]: struct.Function.html
    pub fn clear(&mut self) {
        drop(self.take());
    }

    /// If the [`Function`] holds a callable, returns `true`; otherwise returns `false`.
    ///
    /// [`Function`]: struct.Function.html
    pub fn is_some(&self) -> bool {
        !self.descriptor.is_empty()
    }

    /// If the [`Function`] is empty, returns `true`; otherwise returns `false`.
    ///
    /// [`Function`]: struct.Function.html
    pub fn is_none(&self) -> bool {
        self.descriptor.is_empty()
    }

    /// Calls the stored callable with the packed `args` tuple and returns its result.
    ///
    /// See also the per-arity `call` methods, which take the arguments unpacked.
    ///
    /// # Errors
    ///
    /// Returns [`BadFunctionCall`] if the [`Function`] is empty.
    ///
    /// [`Function`]: struct.Function.html
    /// [`BadFunctionCall`]: struct.BadFunctionCall.html
    pub fn call_with(&self, args: S::Args) -> Result<S::Output, BadFunctionCall> {
        // SAFETY: `storage` always matches the installed descriptor.
        unsafe { self.descriptor.invoke(&self.storage, args) }
    }

    /// Moves the stored callable, if any, out into a new [`Function`].
    ///
    /// `self` is empty afterwards, whatever its previous state.
    ///
    /// [`Function`]: struct.Function.html
    pub fn take(&mut self) -> Self {
        let mut result = Self::empty();

        let descriptor = std::mem::replace(&mut self.descriptor, Descriptor::empty());

        // SAFETY: `self.storage` holds a value of `descriptor`'s type (or nothing, if empty);
        // `self` no longer refers to it, `result.storage` is fresh.
        unsafe {
            descriptor.relocate(&mut self.storage, &mut result.storage);
        }

        result.descriptor = descriptor;
        result
    }

    /// Drops the stored callable, if any, and moves the callable stored in `source`, if any, into `self`.
    ///
    /// `source` is empty afterwards.
    pub fn move_from(&mut self, source: &mut Self) {
        // The incoming value is in place before the old one is dropped.
        *self = source.take();
    }

    /// Exchanges the callables stored in `self` and `other`.
    pub fn swap(&mut self, other: &mut Self) {
        let held = self.take();
        self.move_from(other);
        *other = held;
    }

    /// Returns a reference to the stored callable if it is of type `F`;
    /// otherwise (including if the [`Function`] is empty) returns `None`.
    ///
    /// [`Function`]: struct.Function.html
    pub fn target<F: 'static>(&self) -> Option<&F> {
        if self.descriptor.is::<F>() {
            // SAFETY: the descriptor is `F`'s, so `storage` holds a live `F`.
            Some(unsafe { &*self.storage.get::<F>() })
        } else {
            None
        }
    }

    /// Returns a mutable reference to the stored callable if it is of type `F`;
    /// otherwise (including if the [`Function`] is empty) returns `None`.
    ///
    /// [`Function`]: struct.Function.html
    pub fn target_mut<F: 'static>(&mut self) -> Option<&mut F> {
        if self.descriptor.is::<F>() {
            // SAFETY: the descriptor is `F`'s, so `storage` holds a live `F`.
            Some(unsafe { &mut *self.storage.get_mut::<F>() })
        } else {
            None
        }
    }

    /// Returns the [`TypeId`] of the stored callable, or `None` if the [`Function`] is empty.
    ///
    /// [`Function`]: struct.Function.html
    pub fn target_type(&self) -> Option<TypeId> {
        self.filter_some(self.descriptor.type_id())
    }

    /// Returns the type name of the stored callable, or `None` if the [`Function`] is empty.
    ///
    /// [`Function`]: struct.Function.html
    pub fn target_type_name(&self) -> Option<&'static str> {
        self.filter_some(self.descriptor.type_name())
    }

    /// Returns where the stored callable lives, or `None` if the [`Function`] is empty.
    ///
    /// [`Function`]: struct.Function.html
    pub fn storage_tag(&self) -> Option<StorageTag> {
        self.descriptor.storage_tag()
    }

    fn filter_some<T>(&self, value: T) -> Option<T> {
        if self.is_some() {
            Some(value)
        } else {
            None
        }
    }
}

impl<S: Signature> Default for Function<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: Signature> Clone for Function<S> {
    fn clone(&self) -> Self {
        let mut result = Self::empty();

        // SAFETY: `self.storage` matches `self.descriptor`, `result.storage` is fresh.
        // `result` stays empty if the stored callable's `clone` panics.
        unsafe {
            self.descriptor.copy(&self.storage, &mut result.storage);
        }

        result.descriptor = self.descriptor;
        result
    }

    /// Clones `source` into a temporary, then swaps it in:
    /// `self` is left unmodified if the stored callable's `clone` panics.
    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.clone();
        self.swap(&mut copy);
    }
}

impl<S: Signature> Drop for Function<S> {
    fn drop(&mut self) {
        // SAFETY: `storage` matches the descriptor; it is not accessed again.
        unsafe {
            self.descriptor.destroy(&mut self.storage);
        }
    }
}

impl<S: Signature> fmt::Debug for Function<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("target", &self.target_type_name())
            .field("storage", &self.storage_tag())
            .finish()
    }
}
