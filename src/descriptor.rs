//! Per-type dispatch tables for the callables stored in a [`Function`].
//!
//! A [`Descriptor`] bundles the operations which manipulate a [`Storage`]
//! as if it held one concrete callable type `F`. Exactly one descriptor
//! exists per `(signature, F)` pair, plus the empty descriptor per signature;
//! all of them are `&'static` constants and need no runtime initialization.
//!
//! The fields are private to this module: a descriptor can only be obtained via
//! [`Descriptor::empty`] or [`Descriptor::of`], so its operations always match
//! the type they were instantiated with. Whether the storage of `F` is inline or
//! boxed is decided at compile time inside the [`Storage`] accessors.
//!
//! [`Function`]: ../struct.Function.html
//! [`Storage`]: ../storage/union.Storage.html

use std::any::{self, TypeId};

use crate::{
    storage::{self, Storage, StorageTag},
    BadFunctionCall, Callable, Signature,
};

/// Type tag of the empty descriptor. Not nameable outside the crate,
/// so no user type can compare equal to it.
enum Vacant {}

pub(crate) struct Descriptor<S: Signature> {
    type_id: fn() -> TypeId,
    type_name: fn() -> &'static str,
    /// `None` for the empty descriptor.
    storage_tag: Option<StorageTag>,
    copy: unsafe fn(&Storage, &mut Storage),
    relocate: unsafe fn(&mut Storage, &mut Storage),
    destroy: unsafe fn(&mut Storage),
    invoke: unsafe fn(&Storage, S::Args) -> Result<S::Output, BadFunctionCall>,
}

impl<S: Signature> Descriptor<S> {
    /// The descriptor of an empty [`Function`]: `copy`, `relocate` and `destroy` do nothing,
    /// `invoke` fails with [`BadFunctionCall`].
    ///
    /// [`Function`]: ../struct.Function.html
    /// [`BadFunctionCall`]: ../struct.BadFunctionCall.html
    pub(crate) fn empty() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<Vacant>,
                type_name: any::type_name::<Vacant>,
                storage_tag: None,
                copy: copy_nothing,
                relocate: relocate_nothing,
                destroy: destroy_nothing,
                invoke: invoke_nothing::<S>,
            }
        }
    }

    /// The descriptor of the concrete callable type `F`.
    pub(crate) fn of<F: Callable<S>>() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<F>,
                type_name: any::type_name::<F>,
                storage_tag: Some(storage::storage_tag::<F>()),
                copy: copy::<F>,
                relocate: relocate::<F>,
                destroy: destroy::<F>,
                invoke: invoke::<S, F>,
            }
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.type_id() == TypeId::of::<Vacant>()
    }

    /// Returns `true` if this is the descriptor of `F`.
    ///
    /// Compares type ids rather than descriptor addresses:
    /// constants may be duplicated across codegen units.
    pub(crate) fn is<F: 'static>(&self) -> bool {
        self.type_id() == TypeId::of::<F>()
    }

    pub(crate) fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    pub(crate) fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    pub(crate) fn storage_tag(&self) -> Option<StorageTag> {
        self.storage_tag
    }

    /// Writes an independent copy of the value in `src` to `dst`.
    ///
    /// # Safety
    ///
    /// `src` must hold a live value of this descriptor's type.
    /// `dst` must not hold a live value.
    pub(crate) unsafe fn copy(&self, src: &Storage, dst: &mut Storage) {
        (self.copy)(src, dst)
    }

    /// Moves the value in `src` to `dst`.
    ///
    /// # Safety
    ///
    /// `src` must hold a live value of this descriptor's type; it holds none afterwards.
    /// `dst` must not hold a live value.
    pub(crate) unsafe fn relocate(&self, src: &mut Storage, dst: &mut Storage) {
        (self.relocate)(src, dst)
    }

    /// Releases the value in `storage`.
    ///
    /// # Safety
    ///
    /// `storage` must hold a live value of this descriptor's type; it holds none afterwards.
    pub(crate) unsafe fn destroy(&self, storage: &mut Storage) {
        (self.destroy)(storage)
    }

    /// Calls the value in `storage`.
    ///
    /// # Safety
    ///
    /// `storage` must hold a live value of this descriptor's type.
    pub(crate) unsafe fn invoke(
        &self,
        storage: &Storage,
        args: S::Args,
    ) -> Result<S::Output, BadFunctionCall> {
        (self.invoke)(storage, args)
    }
}

unsafe fn copy_nothing(_src: &Storage, _dst: &mut Storage) {}

unsafe fn relocate_nothing(_src: &mut Storage, _dst: &mut Storage) {}

unsafe fn destroy_nothing(_storage: &mut Storage) {}

unsafe fn invoke_nothing<S: Signature>(
    _storage: &Storage,
    _args: S::Args,
) -> Result<S::Output, BadFunctionCall> {
    log::trace!("called an empty `Function<{}>`", any::type_name::<S>());
    Err(BadFunctionCall)
}

// If `F::clone` panics, `dst` is left untouched.
unsafe fn copy<F: Clone>(src: &Storage, dst: &mut Storage) {
    let value = (*src.get::<F>()).clone();
    dst.init(value);
}

unsafe fn relocate<F>(src: &mut Storage, dst: &mut Storage) {
    src.relocate::<F>(dst);
}

unsafe fn destroy<F>(storage: &mut Storage) {
    storage.drop_in_place::<F>();
}

unsafe fn invoke<S: Signature, F: Callable<S>>(
    storage: &Storage,
    args: S::Args,
) -> Result<S::Output, BadFunctionCall> {
    Ok(Callable::<S>::invoke(&*storage.get::<F>(), args))
}
