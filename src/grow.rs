use std::{mem, ptr::NonNull};

use libc::{c_void, intptr_t, sbrk};

/// Source of raw heap memory, called only when no existing free block can
/// satisfy a request.
///
/// # Safety
///
/// Implementations must hand out regions that are valid for reads and writes
/// of the requested byte count, exclusively owned by the heap, and
/// contiguous: every grant starts exactly where the previous grant from the
/// same value ended. The heap merges list-adjacent free blocks on the
/// assumption that they are memory-adjacent, so a gap between grants
/// corrupts the block list.
pub unsafe trait Grower {
  /// Extends the heap by `size` bytes, returning the start of the granted
  /// region, or `None` once no more memory is available.
  fn grow(
    &mut self,
    size: usize,
  ) -> Option<NonNull<u8>>;
}

/// Grows the heap by moving the process program break with `sbrk(2)`.
pub struct Sbrk(());

impl Sbrk {
  /// # Safety
  ///
  /// The program break must not be moved by anything else for as long as
  /// this value lives. A second `Sbrk`-backed heap, or foreign `brk`/`sbrk`
  /// calls, would interleave grants and break the contiguity contract of
  /// [`Grower`].
  pub unsafe fn new() -> Self {
    Self(())
  }
}

unsafe impl Grower for Sbrk {
  fn grow(
    &mut self,
    size: usize,
  ) -> Option<NonNull<u8>> {
    let increment = intptr_t::try_from(size).ok()?;

    let address = unsafe { sbrk(increment) };

    if address == usize::MAX as *mut c_void {
      return None;
    }

    NonNull::new(address as *mut u8)
  }
}

/// Fixed-capacity growth provider backed by an owned, word-aligned buffer.
///
/// Grants are contiguous by construction and every request past the capacity
/// fails, which makes exhaustion reproducible. This is what the test suite
/// runs the heap on.
pub struct FixedArena {
  words: Box<[usize]>,
  top: usize,
}

impl FixedArena {
  /// Creates an arena able to grant `capacity` bytes in total, rounded up to
  /// a whole number of machine words.
  pub fn new(capacity: usize) -> Self {
    let words = capacity.div_ceil(mem::size_of::<usize>());

    Self {
      words: vec![0; words].into_boxed_slice(),
      top: 0,
    }
  }

  /// Total bytes this arena can grant.
  pub fn capacity(&self) -> usize {
    self.words.len() * mem::size_of::<usize>()
  }

  /// Bytes granted so far.
  pub fn granted(&self) -> usize {
    self.top
  }
}

unsafe impl Grower for FixedArena {
  fn grow(
    &mut self,
    size: usize,
  ) -> Option<NonNull<u8>> {
    let end = self.top.checked_add(size)?;

    if end > self.capacity() {
      return None;
    }

    let region = unsafe { (self.words.as_mut_ptr() as *mut u8).add(self.top) };

    self.top = end;

    NonNull::new(region)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_arena_grants_are_contiguous() {
    let mut arena = FixedArena::new(64);

    let first = arena.grow(24).unwrap();
    let second = arena.grow(40).unwrap();

    assert_eq!(first.as_ptr() as usize + 24, second.as_ptr() as usize);
    assert_eq!(64, arena.granted());
  }

  #[test]
  fn test_arena_fails_once_exhausted() {
    let mut arena = FixedArena::new(32);

    assert!(arena.grow(32).is_some());
    assert!(arena.grow(1).is_none());
    assert_eq!(32, arena.granted());
  }

  #[test]
  fn test_arena_capacity_rounds_up_to_whole_words() {
    let arena = FixedArena::new(9);

    assert!(arena.capacity() >= 9);
    assert_eq!(0, arena.capacity() % mem::size_of::<usize>());
  }

  #[test]
  fn test_arena_rejects_oversized_requests() {
    let mut arena = FixedArena::new(64);

    assert!(arena.grow(usize::MAX).is_none());
    assert_eq!(0, arena.granted());
  }

  #[test]
  fn test_arena_grants_are_word_aligned() {
    let mut arena = FixedArena::new(64);

    let region = arena.grow(16).unwrap();

    assert_eq!(0, region.as_ptr() as usize % mem::size_of::<usize>());
  }
}
