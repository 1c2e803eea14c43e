use std::mem;

use crate::align::ALIGNMENT;

/// Byte footprint of [`BlockHeader`] itself. The payload governed by a
/// header starts exactly this far past the header's own address.
pub const HEADER_SIZE: usize = mem::size_of::<BlockHeader>();

/// Smallest remainder worth carving into a standalone free block: a fresh
/// header plus one aligned payload slot.
pub const MIN_SPLIT: usize = HEADER_SIZE + ALIGNMENT;

// Payload addresses are header address + HEADER_SIZE, so the header
// footprint itself must keep the alignment boundary intact.
const _: () = assert!(HEADER_SIZE % ALIGNMENT == 0);

/// Metadata record placed immediately before every payload in the heap.
///
/// Headers form a singly linked list covering the whole heap in ascending
/// address order, free and used blocks alike.
#[repr(C)]
pub struct BlockHeader {
  /// Payload byte count. Never includes the header's own footprint.
  pub size: usize,
  /// Whether the payload is available for reuse.
  pub is_free: bool,
  /// Next header in address order, null for the last block.
  pub next: *mut BlockHeader,
}

impl BlockHeader {
  pub fn new(
    size: usize,
    is_free: bool,
    next: *mut BlockHeader,
  ) -> Self {
    Self { size, is_free, next }
  }

  /// Payload address governed by the header at `block`.
  ///
  /// # Safety
  ///
  /// `block` must point at a live header inside the managed heap.
  pub unsafe fn payload(block: *mut BlockHeader) -> *mut u8 {
    unsafe { (block as *mut u8).add(HEADER_SIZE) }
  }

  /// Recovers the owning header from a payload address. Inverse of
  /// [`BlockHeader::payload`].
  ///
  /// # Safety
  ///
  /// `ptr` must be a payload address previously produced by
  /// [`BlockHeader::payload`].
  pub unsafe fn from_payload(ptr: *mut u8) -> *mut BlockHeader {
    unsafe { ptr.sub(HEADER_SIZE) as *mut BlockHeader }
  }
}
