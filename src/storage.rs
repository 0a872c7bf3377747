use std::{
    mem::{align_of, size_of, MaybeUninit},
    ptr,
};

/// Number of bytes available for inline callable storage in a [`Function`]: one machine pointer.
///
/// [`Function`]: struct.Function.html
pub const STORAGE_SIZE: usize = size_of::<*const ()>();

/// Alignment of the inline callable storage in a [`Function`]: that of a machine pointer.
///
/// [`Function`]: struct.Function.html
pub const STORAGE_ALIGN: usize = align_of::<*const ()>();

/// Where a stored callable lives.
#[derive(Clone, Copy, Eq, Debug, PartialEq)]
pub enum StorageTag {
    /// The callable's bytes live in the [`Function`] itself.
    ///
    /// [`Function`]: struct.Function.html
    Inline,
    /// The [`Function`] holds an owning pointer to a heap-allocated callable.
    ///
    /// [`Function`]: struct.Function.html
    Boxed,
}

/// Returns `true` if a value of type `T` is stored inline, `false` if it is boxed.
///
/// `T` is stored inline if it fits in [`STORAGE_SIZE`] bytes
/// and its alignment divides [`STORAGE_ALIGN`].
/// Rust moves are plain byte copies and cannot fail, so no other condition applies.
///
/// [`STORAGE_SIZE`]: constant.STORAGE_SIZE.html
/// [`STORAGE_ALIGN`]: constant.STORAGE_ALIGN.html
pub const fn is_inline<T>() -> bool {
    size_of::<T>() <= STORAGE_SIZE && STORAGE_ALIGN % align_of::<T>() == 0
}

/// Returns the [`StorageTag`] a value of type `T` is stored with.
///
/// [`StorageTag`]: enum.StorageTag.html
pub const fn storage_tag<T>() -> StorageTag {
    if is_inline::<T>() {
        StorageTag::Inline
    } else {
        StorageTag::Boxed
    }
}

/// Pointer-sized raw storage: either the bytes of an inline value,
/// or an owning pointer to a boxed one.
/// Tag is encoded separately, in the descriptor of the stored type.
#[repr(C)]
pub(crate) union Storage {
    inline: MaybeUninit<[u8; STORAGE_SIZE]>,
    boxed: *mut (),
}

assert_eq_size!(Storage, *const ());
const_assert_eq!(align_of::<Storage>(), STORAGE_ALIGN);

impl Storage {
    pub(crate) fn uninit() -> Self {
        Self {
            inline: MaybeUninit::uninit(),
        }
    }

    /// Moves `value` into the storage: in place if `T` is small enough, in a new heap allocation otherwise.
    ///
    /// # Safety
    ///
    /// The storage must not hold a live value; it would be overwritten without being dropped.
    /// The storage must from now on only be accessed as holding a `T`.
    pub(crate) unsafe fn init<T>(&mut self, value: T) {
        if is_inline::<T>() {
            ptr::write(self.inline_ptr_mut::<T>(), value);
        } else {
            self.boxed = Box::into_raw(Box::new(value)).cast();
        }
    }

    /// # Safety
    ///
    /// The storage must hold a live `T`.
    pub(crate) unsafe fn get<T>(&self) -> *const T {
        if is_inline::<T>() {
            self.inline_ptr::<T>()
        } else {
            self.boxed.cast::<T>()
        }
    }

    /// # Safety
    ///
    /// The storage must hold a live `T`.
    pub(crate) unsafe fn get_mut<T>(&mut self) -> *mut T {
        if is_inline::<T>() {
            self.inline_ptr_mut::<T>()
        } else {
            self.boxed.cast::<T>()
        }
    }

    /// Moves the `T` out of `self` into `dst`.
    /// Inline values are bitwise-moved; boxed values only hand over the pointer.
    ///
    /// # Safety
    ///
    /// `self` must hold a live `T`; it holds no live value afterwards.
    /// `dst` must not hold a live value.
    pub(crate) unsafe fn relocate<T>(&mut self, dst: &mut Storage) {
        if is_inline::<T>() {
            ptr::write(dst.inline_ptr_mut::<T>(), ptr::read(self.inline_ptr::<T>()));
        } else {
            dst.boxed = self.boxed;
        }
    }

    /// Drops the `T` in place, or drops the box which owns it.
    ///
    /// # Safety
    ///
    /// The storage must hold a live `T`; it holds no live value afterwards.
    pub(crate) unsafe fn drop_in_place<T>(&mut self) {
        if is_inline::<T>() {
            ptr::drop_in_place(self.inline_ptr_mut::<T>());
        } else {
            drop(Box::from_raw(self.boxed.cast::<T>()));
        }
    }

    // All union fields live at offset 0 (`#[repr(C)]`).
    fn inline_ptr<T>(&self) -> *const T {
        (self as *const Self).cast()
    }

    fn inline_ptr_mut<T>(&mut self) -> *mut T {
        (self as *mut Self).cast()
    }
}
