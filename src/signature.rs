use crate::{BadFunctionCall, Function};

/// A call signature `(A1, .., An) -> R`, spelled as the function pointer type `fn(A1, .., An) -> R`.
///
/// Implemented for function pointer types of up to 8 parameters.
/// Parameter and return types must be `'static`: owned values or `'static` borrows.
pub trait Signature: 'static {
    /// Parameter types packed into a tuple.
    type Args: 'static;
    /// Return type.
    type Output: 'static;
}

/// A concrete callable which may be stored in a [`Function`] with the signature `S`.
///
/// Implemented for every `Fn` closure, function item and function pointer
/// which matches `S` and is `Clone + 'static`.
///
/// [`Function`]: struct.Function.html
pub trait Callable<S: Signature>: Clone + 'static {
    /// Calls `self` with the unpacked `args`.
    fn invoke(&self, args: S::Args) -> S::Output;
}

macro_rules! impl_signature {
    ($($arg:ident: $ty:ident),*) => {
        impl<R: 'static, $($ty: 'static),*> Signature for fn($($ty),*) -> R {
            type Args = ($($ty,)*);
            type Output = R;
        }

        impl<F, R: 'static, $($ty: 'static),*> Callable<fn($($ty),*) -> R> for F
        where
            F: Fn($($ty),*) -> R + Clone + 'static,
        {
            #[inline]
            fn invoke(&self, ($($arg,)*): ($($ty,)*)) -> R {
                (self)($($arg),*)
            }
        }

        impl<R: 'static, $($ty: 'static),*> Function<fn($($ty),*) -> R> {
            /// Calls the stored callable with the passed arguments and returns its result.
            ///
            /// # Errors
            ///
            /// Returns [`BadFunctionCall`] if the [`Function`] is empty.
            ///
            /// [`BadFunctionCall`]: struct.BadFunctionCall.html
            /// [`Function`]: struct.Function.html
            #[inline]
            pub fn call(&self, $($arg: $ty),*) -> Result<R, BadFunctionCall> {
                self.call_with(($($arg,)*))
            }
        }
    };
}

impl_signature!();
impl_signature!(a: A);
impl_signature!(a: A, b: B);
impl_signature!(a: A, b: B, c: C);
impl_signature!(a: A, b: B, c: C, d: D);
impl_signature!(a: A, b: B, c: C, d: D, e: E);
impl_signature!(a: A, b: B, c: C, d: D, e: E, f: G);
impl_signature!(a: A, b: B, c: C, d: D, e: E, f: G, g: H);
impl_signature!(a: A, b: B, c: C, d: D, e: E, f: G, g: H, h: I);
