#![feature(error_generic_member_access)]
#![deny(missing_docs)]

//! Error handling for the FieldsFile variant crates.
//!
//! Every fallible operation returns an [`FfvResult`]. Errors are constructed with the
//! [`ffv_err!`] and [`ffv_bail!`] macros, which capture a backtrace at the point of failure.

use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::env;
use std::fmt::{Debug, Display, Formatter};
use std::num::TryFromIntError;
use std::ops::Deref;
use std::{fmt, io};

/// A convenient macro for creating an [`FfvError`].
#[macro_export]
macro_rules! ffv_err {
    (OutOfBounds: $idx:expr, $start:expr, $stop:expr) => {{
        use std::backtrace::Backtrace;
        $crate::FfvError::OutOfBounds($idx, $start, $stop, Backtrace::capture())
    }};
    ($variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {{
        use std::backtrace::Backtrace;
        $crate::FfvError::$variant(format!($fmt, $($arg),*).into(), Backtrace::capture())
    }};
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::ffv_err!(InvalidArgument: $fmt, $($arg),*)
    };
}

/// A convenient macro for returning an [`FfvError`] from the current function.
#[macro_export]
macro_rules! ffv_bail {
    ($($tt:tt)+) => {
        return Err($crate::ffv_err!($($tt)+))
    };
}

/// A convenient macro for panicking with an [`FfvError`] in the presence of a programmer error
/// (e.g., an invariant has been violated).
#[macro_export]
macro_rules! ffv_panic {
    ($variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::ffv_panic!($crate::ffv_err!($variant: $fmt, $($arg),*))
    };
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::ffv_panic!($crate::ffv_err!($fmt, $($arg),*))
    };
    ($err:expr) => {{
        let err: $crate::FfvError = $err;
        panic!("{}", err)
    }};
}

/// A string that can be used as an error message.
#[derive(Debug)]
pub struct ErrString(Cow<'static, str>);

#[allow(clippy::fallible_impl_from)]
impl<T> From<T> for ErrString
where
    T: Into<Cow<'static, str>>,
{
    fn from(msg: T) -> Self {
        if env::var("FFV_PANIC_ON_ERR").as_deref().unwrap_or("") == "1" {
            panic!("{}\nBacktrace:\n{}", msg.into(), Backtrace::capture());
        } else {
            Self(msg.into())
        }
    }
}

impl AsRef<str> for ErrString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ErrString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ErrString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// The top-level error type for reading and writing FieldsFile variants.
#[derive(thiserror::Error)]
#[non_exhaustive]
pub enum FfvError {
    /// An open mode that is not one of read, update or create.
    #[error("invalid access mode: {0}\nBacktrace:\n{1}")]
    InvalidMode(ErrString, Backtrace),
    /// The file's structure is malformed, e.g. a header or LOOKUP table is too short.
    #[error("{0}\nBacktrace:\n{1}")]
    Format(ErrString, Backtrace),
    /// A field's packing code or data type cannot be decoded.
    #[error("{0}\nBacktrace:\n{1}")]
    UnsupportedEncoding(ErrString, Backtrace),
    /// The in-memory file cannot be laid out on disk.
    #[error("{0}\nBacktrace:\n{1}")]
    Layout(ErrString, Backtrace),
    /// An index is out of bounds.
    #[error("index {0} out of bounds from {1} to {2}\nBacktrace:\n{3}")]
    OutOfBounds(usize, usize, usize, Backtrace),
    /// An invalid argument was provided.
    #[error("{0}\nBacktrace:\n{1}")]
    InvalidArgument(ErrString, Backtrace),
    /// An internal invariant did not hold.
    #[error("{0}\nBacktrace:\n{1}")]
    AssertionFailed(ErrString, Backtrace),
    /// A wrapper for other errors, carrying additional context.
    #[error("{0}: {1}")]
    Context(ErrString, #[source] Box<FfvError>),
    /// A wrapper for IO errors.
    #[error(transparent)]
    IOError(#[from] io::Error),
    /// A wrapper for integer conversion errors.
    #[error(transparent)]
    TryFromInt(#[from] TryFromIntError),
}

impl FfvError {
    /// Adds additional context to an error.
    pub fn with_context<T: Into<ErrString>>(self, msg: T) -> Self {
        FfvError::Context(msg.into(), Box::new(self))
    }

    /// Returns the innermost error, skipping over any [`FfvError::Context`] wrappers.
    pub fn root(&self) -> &FfvError {
        match self {
            FfvError::Context(_, inner) => inner.root(),
            other => other,
        }
    }
}

impl Debug for FfvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// A type alias for Results that return [`FfvError`]s as their error type.
pub type FfvResult<T> = Result<T, FfvError>;

/// A trait for expect-ing a value or panicking with an [`FfvError`].
pub trait FfvExpect {
    /// The type of the value being expected.
    type Output;

    /// Returns the value of the result if it is Ok, otherwise panics with the error.
    /// Should be called only in contexts where the error condition represents a bug (programmer error).
    fn ffv_expect(self, msg: &str) -> Self::Output;
}

impl<T, E> FfvExpect for Result<T, E>
where
    E: Into<FfvError>,
{
    type Output = T;

    #[inline(always)]
    fn ffv_expect(self, msg: &str) -> Self::Output {
        self.map_err(|err| err.into())
            .unwrap_or_else(|e| ffv_panic!(e.with_context(msg.to_string())))
    }
}

impl<T> FfvExpect for Option<T> {
    type Output = T;

    #[inline(always)]
    fn ffv_expect(self, msg: &str) -> Self::Output {
        self.unwrap_or_else(|| {
            let err = FfvError::AssertionFailed(msg.to_string().into(), Backtrace::capture());
            ffv_panic!(err)
        })
    }
}
