//! Binary stream primitives used by the descriptor codec.
//!
//! A [`Writer`] appends big-endian fixed-width integers and length-prefixed
//! UTF-8 strings to a growing buffer; a [`Reader`] walks the same layout with
//! a cursor. Only sequential access is needed, there is no seeking.

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

use thiserror::Error;

/// Error raised by the bounds-checked [`Reader`] methods.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("invalid UTF-8")]
    InvalidUtf8,
}
