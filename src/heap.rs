use std::{
  marker::PhantomData,
  ptr::{self, NonNull},
};

use log::{debug, trace};

use crate::{
  align,
  align::ALIGNMENT,
  block::{BlockHeader, HEADER_SIZE, MIN_SPLIT},
  error::AllocError,
  grow::{Grower, Sbrk},
};

/// A growable heap managed through a block list: allocation walks the list
/// for the first fitting free block, splitting oversized ones, and release
/// merges adjacent free blocks back together.
///
/// The heap is an owned value; exclusive access for every operation is
/// enforced through `&mut self`, so there is no synchronization and no
/// global state.
pub struct Heap<G: Grower = Sbrk> {
  first: *mut BlockHeader,
  last: *mut BlockHeader,
  grower: G,
  grown: usize,
}

impl Heap<Sbrk> {
  /// Creates a heap that grows by moving the process program break.
  ///
  /// # Safety
  ///
  /// See [`Sbrk::new`]: nothing else may move the program break for as long
  /// as the heap lives.
  pub unsafe fn new() -> Self {
    Self::with_grower(unsafe { Sbrk::new() })
  }
}

impl<G: Grower> Heap<G> {
  /// Creates an empty heap on top of the given growth provider.
  pub fn with_grower(grower: G) -> Self {
    Self {
      first: ptr::null_mut(),
      last: ptr::null_mut(),
      grower,
      grown: 0,
    }
  }

  /// Allocates `size` bytes and returns the payload address, aligned to
  /// [`ALIGNMENT`].
  ///
  /// Free blocks are reused first-fit before the heap grows, so the program
  /// break only moves when no released region can absorb the request.
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> Result<NonNull<u8>, AllocError> {
    if size == 0 {
      return Err(AllocError::ZeroSize);
    }

    // Rounding up plus the header prefix must stay within the address space.
    if size > usize::MAX - HEADER_SIZE - (ALIGNMENT - 1) {
      return Err(AllocError::SizeOverflow);
    }

    let asize = align!(size);

    let block = unsafe { self.find_free(asize) };

    if !block.is_null() {
      debug!("allocate({}): reusing block at {:p}", size, block);

      unsafe {
        (*block).is_free = false;

        return Ok(NonNull::new_unchecked(BlockHeader::payload(block)));
      }
    }

    let total = HEADER_SIZE + asize;

    let Some(region) = self.grower.grow(total) else {
      debug!("allocate({}): growth provider exhausted", size);

      return Err(AllocError::Exhausted);
    };

    self.grown += total;

    debug!("allocate({}): grew heap by {} bytes", size, total);

    let block = unsafe { self.append(region, asize) };

    Ok(unsafe { NonNull::new_unchecked(BlockHeader::payload(block)) })
  }

  /// Allocates a zero-initialized payload of `count * size` bytes.
  pub fn zero_allocate(
    &mut self,
    count: usize,
    size: usize,
  ) -> Result<NonNull<u8>, AllocError> {
    let total = count.checked_mul(size).ok_or(AllocError::SizeOverflow)?;

    let payload = self.allocate(total)?;

    unsafe { ptr::write_bytes(payload.as_ptr(), 0, total) };

    Ok(payload)
  }

  /// Resizes the allocation at `ptr`. A null `ptr` behaves like
  /// [`allocate`](Heap::allocate); a zero `size` behaves like
  /// [`release`](Heap::release) and yields `Ok(None)`.
  ///
  /// Shrinking happens in place. Growing first tries to absorb a free
  /// following block through a coalescing pass, and otherwise moves the
  /// payload to a fresh block; if that allocation fails, the original block
  /// stays live and untouched.
  ///
  /// # Safety
  ///
  /// A non-null `ptr` must have been returned by this heap and not yet
  /// released.
  pub unsafe fn reallocate(
    &mut self,
    ptr: *mut u8,
    size: usize,
  ) -> Result<Option<NonNull<u8>>, AllocError> {
    if ptr.is_null() {
      return self.allocate(size).map(Some);
    }

    if size == 0 {
      unsafe { self.release(ptr) };

      return Ok(None);
    }

    unsafe {
      let block = BlockHeader::from_payload(ptr);

      if (*block).size == size {
        return Ok(Some(NonNull::new_unchecked(ptr)));
      }

      if (*block).size > size {
        let block = self.split(block, size);

        return Ok(Some(NonNull::new_unchecked(BlockHeader::payload(block))));
      }

      // The last block has no following neighbor, which counts as used.
      let next = (*block).next;

      if !next.is_null() && (*next).is_free {
        self.coalesce();

        if (*block).size > size {
          let block = self.split(block, size);

          return Ok(Some(NonNull::new_unchecked(BlockHeader::payload(block))));
        }
      }

      // Move: fresh block, payload carried over, original released. On
      // allocation failure the original stays live.
      let old_size = (*block).size;

      let payload = self.allocate(size)?;

      ptr::copy_nonoverlapping(ptr, payload.as_ptr(), old_size.min(size));

      self.release(ptr);

      Ok(Some(payload))
    }
  }

  /// Returns the allocation at `ptr` to the heap and merges adjacent free
  /// blocks. A null `ptr` is a no-op.
  ///
  /// # Safety
  ///
  /// A non-null `ptr` must have been returned by this heap and not yet
  /// released.
  pub unsafe fn release(
    &mut self,
    ptr: *mut u8,
  ) {
    if ptr.is_null() {
      return;
    }

    trace!("release({:p})", ptr);

    unsafe {
      let block = BlockHeader::from_payload(ptr);

      (*block).is_free = true;

      self.coalesce();
    }
  }

  // First fit over the whole list. An exact match is returned as-is, a
  // generously oversized block is split, and a block whose surplus could not
  // stand alone is handed out whole.
  unsafe fn find_free(
    &mut self,
    size: usize,
  ) -> *mut BlockHeader {
    let mut current = self.first;

    unsafe {
      while !current.is_null() {
        if (*current).is_free && (*current).size >= size {
          if (*current).size == size {
            return current;
          }

          if (*current).size - size >= MIN_SPLIT {
            return self.split(current, size);
          }

          return current;
        }

        current = (*current).next;
      }
    }

    ptr::null_mut()
  }

  // Carves `block` down to an aligned `size` payload and links the remainder
  // in as a free block. When the remainder could not hold a header plus one
  // aligned slot, the caller keeps the whole payload instead.
  unsafe fn split(
    &mut self,
    block: *mut BlockHeader,
    size: usize,
  ) -> *mut BlockHeader {
    let asize = align!(size);

    unsafe {
      match (*block).size.checked_sub(asize + HEADER_SIZE) {
        Some(leftover) if leftover > MIN_SPLIT => {
          let carved = BlockHeader::payload(block).add(asize) as *mut BlockHeader;

          carved.write(BlockHeader::new(leftover, true, (*block).next));

          trace!("split {:p}: {} -> {} + {}", block, (*block).size, asize, leftover);

          (*block).size = asize;
          (*block).next = carved;

          if self.last == block {
            self.last = carved;
          }
        }
        _ => {}
      }

      (*block).is_free = false;
    }

    block
  }

  // Single forward pass merging every run of adjacent free blocks. The
  // cursor stays put after a merge, so a grown block can absorb the next
  // free neighbor as well.
  unsafe fn coalesce(&mut self) {
    let mut current = self.first;

    unsafe {
      while !current.is_null() && !(*current).next.is_null() {
        let next = (*current).next;

        if (*current).is_free && (*next).is_free {
          trace!("coalesce: {:p} absorbs {:p}", current, next);

          (*current).size += HEADER_SIZE + (*next).size;
          (*current).next = (*next).next;

          if self.last == next {
            self.last = current;
          }
        } else {
          current = next;
        }
      }
    }
  }

  // Writes a fresh header at the start of a newly granted region and links
  // it behind the current last block.
  unsafe fn append(
    &mut self,
    region: NonNull<u8>,
    size: usize,
  ) -> *mut BlockHeader {
    let block = region.as_ptr() as *mut BlockHeader;

    unsafe {
      block.write(BlockHeader::new(size, false, ptr::null_mut()));

      if self.first.is_null() {
        self.first = block;
        self.last = block;
      } else {
        (*self.last).next = block;
        self.last = block;
      }
    }

    block
  }

  /// Iterates over every block in address order. Diagnostics and tests
  /// only; the allocation paths never consume this view.
  pub fn blocks(&self) -> Blocks<'_> {
    Blocks {
      current: self.first,
      _heap: PhantomData,
    }
  }

  /// Prints the block list to stdout, one line per block.
  pub fn dump(&self) {
    println!("Heap blocks:");

    for block in self.blocks() {
      println!(
        "  Block {:p}: size={}, free={}, user_ptr={:p}",
        block.addr, block.size, block.is_free, block.payload
      );
    }
  }

  /// Total bytes ever granted by the growth provider, headers included.
  /// The heap never shrinks, so this only grows.
  pub fn grown_bytes(&self) -> usize {
    self.grown
  }
}

/// One block as seen by the [`Blocks`] iterator.
#[derive(Debug, Clone, Copy)]
pub struct BlockInfo {
  /// Address of the block header.
  pub addr: *const u8,
  /// Payload byte count, header not included.
  pub size: usize,
  /// Whether the payload is available for reuse.
  pub is_free: bool,
  /// Address handed to the user for this block.
  pub payload: *const u8,
}

/// Iterator over the block list in ascending address order.
pub struct Blocks<'heap> {
  current: *const BlockHeader,
  _heap: PhantomData<&'heap BlockHeader>,
}

impl Iterator for Blocks<'_> {
  type Item = BlockInfo;

  fn next(&mut self) -> Option<BlockInfo> {
    if self.current.is_null() {
      return None;
    }

    unsafe {
      let block = self.current;

      self.current = (*block).next;

      Some(BlockInfo {
        addr: block as *const u8,
        size: (*block).size,
        is_free: (*block).is_free,
        payload: BlockHeader::payload(block as *mut BlockHeader) as *const u8,
      })
    }
  }
}
