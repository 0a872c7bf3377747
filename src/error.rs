use thiserror::Error;

/// Returned when an empty [`Function`] is called.
///
/// Carries no payload; the description is always `"bad function call"`.
///
/// [`Function`]: struct.Function.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("bad function call")]
pub struct BadFunctionCall;
