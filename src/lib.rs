//! # listalloc - A Free-List Memory Allocator Library
//!
//! This crate provides a classic **free-list allocator** implementation in
//! Rust that manages a single growable heap region obtained through the
//! `sbrk` system call, with first-fit search, block splitting, and
//! coalescing of adjacent free blocks.
//!
//! ## Overview
//!
//! Every payload in the heap is prefixed with a small header, and the
//! headers form a singly linked list covering the whole heap in address
//! order:
//!
//! ```text
//!   Free-List Concept:
//!
//!   ┌────────────────────────────────────────────────────────────────────┐
//!   │                           HEAP MEMORY                              │
//!   │                                                                    │
//!   │   ┌────┬───────┬────┬─────────────┬────┬───────┬────┬─────────┐    │
//!   │   │ H1 │ used  │ H2 │    free     │ H3 │ used  │ H4 │  free   │    │
//!   │   └────┴───────┴────┴─────────────┴────┴───────┴────┴─────────┘    │
//!   │     │           ▲ │                ▲ │           ▲ │               │
//!   │     └── next ───┘ └───── next ─────┘ └── next ───┘ └── next → ∅    │
//!   │                                                                    │
//!   └────────────────────────────────────────────────────────────────────┘
//!
//!   Allocation walks the list for the first free block that fits,
//!   splitting oversized ones. Release marks a block free and merges
//!   adjacent free neighbors back into a single block.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   listalloc
//!   ├── align      - Alignment boundary and the align! macro
//!   ├── block      - Block header record (internal)
//!   ├── error      - Allocation error type
//!   ├── grow       - Growth providers (program break, fixed arena)
//!   └── heap       - Heap: allocate / zero_allocate / reallocate / release
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use listalloc::Heap;
//!
//! fn main() {
//!     // Safety: nothing else in this process moves the program break.
//!     let mut heap = unsafe { Heap::new() };
//!
//!     let ptr = heap.allocate(64).expect("heap exhausted");
//!
//!     unsafe {
//!         // Use the memory
//!         ptr.as_ptr().write(42);
//!         println!("Value: {}", ptr.as_ptr().read());
//!
//!         // Return it; adjacent free blocks merge automatically
//!         heap.release(ptr.as_ptr());
//!     }
//! }
//! ```
//!
//! ## How It Works
//!
//! The heap uses `sbrk(2)` to extend the program's data segment:
//!
//! ```text
//!   Program Memory Layout:
//!
//!   High Address ┌─────────────────────┐
//!                │       Stack         │ ↓ grows down
//!                │         │           │
//!                │         ▼           │
//!                │                     │
//!                │         ▲           │
//!                │         │           │
//!                │       Heap          │ ↑ grows up (sbrk)
//!                ├─────────────────────┤ ← Program Break
//!                │   Uninitialized     │
//!                │       Data          │
//!                ├─────────────────────┤
//!                │   Initialized       │
//!                │       Data          │
//!                ├─────────────────────┤
//!                │       Text          │
//!   Low Address  └─────────────────────┘
//! ```
//!
//! Each block carries its metadata right in front of the payload:
//!
//! ```text
//!   Single Block:
//!   ┌───────────────────────┬────────────────────────────────┐
//!   │    Block Header       │           Payload              │
//!   │  ┌─────────────────┐  │                                │
//!   │  │ size: N         │  │  ┌──────────────────────────┐  │
//!   │  │ is_free: false  │  │  │                          │  │
//!   │  │ next: null/ptr  │  │  │     N bytes usable       │  │
//!   │  └─────────────────┘  │  │                          │  │
//!   │      24 bytes         │  └──────────────────────────┘  │
//!   └───────────────────────┴────────────────────────────────┘
//!                           ▲
//!                           └── Pointer returned to user
//! ```
//!
//! The growth source sits behind the [`Grower`] trait, so the same heap
//! logic runs on the real program break ([`Sbrk`]) or on a fixed in-process
//! buffer ([`FixedArena`]), which is how the test suite exercises it.
//!
//! ## Features
//!
//! - **First-fit reuse**: Released blocks satisfy later requests, with
//!   oversized blocks split in two
//! - **Coalescing**: Adjacent free blocks merge on every release, so the
//!   list converges back to large blocks
//! - **Explicit errors**: Every entry point returns a `Result` instead of a
//!   sentinel pointer
//! - **Pluggable growth**: `sbrk`-backed by default, arena-backed for tests
//!
//! ## Limitations
//!
//! - **Single-threaded only**: A heap is an owned value; every operation
//!   takes `&mut self` and there is no synchronization
//! - **The heap never shrinks**: Freed blocks are recycled, never returned
//!   to the operating system
//! - **One alignment boundary**: Every payload is machine-word aligned;
//!   larger alignment requirements are not supported
//! - **Trusting release**: Foreign or double-released pointers are not
//!   detected; the contracts are documented preconditions
//! - **Unix-only default**: The default growth provider requires `libc` and
//!   `sbrk` (POSIX systems)
//!
//! ## Safety
//!
//! This crate is inherently unsafe as it deals with raw memory management.
//! Allocation itself is a safe call, but constructing an `sbrk`-backed heap
//! and releasing or resizing raw pointers require `unsafe` blocks with the
//! documented preconditions upheld.

pub mod align;
mod block;
mod error;
mod grow;
mod heap;

pub use align::ALIGNMENT;
pub use block::HEADER_SIZE;
pub use error::AllocError;
pub use grow::{FixedArena, Grower, Sbrk};
pub use heap::{BlockInfo, Blocks, Heap};
