use std::{error, fmt};

/// Failure modes surfaced by the allocation entry points.
///
/// Rejected input stays distinguishable from heap exhaustion, so callers can
/// tell a bug in the request apart from running out of memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
  /// The requested payload size was zero.
  ZeroSize,
  /// The requested size does not fit the address space once rounded up and
  /// prefixed with a header, or a `count * size` product overflowed.
  SizeOverflow,
  /// The growth provider could not extend the heap.
  Exhausted,
}

impl fmt::Display for AllocError {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    match self {
      Self::ZeroSize => write!(f, "zero-size allocation request"),
      Self::SizeOverflow => write!(f, "allocation size overflows the address space"),
      Self::Exhausted => write!(f, "growth provider exhausted, heap cannot grow"),
    }
  }
}

impl error::Error for AllocError {}
