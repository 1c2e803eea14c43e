use std::ptr;

use libc::sbrk;
use listalloc::{HEADER_SIZE, Heap};

fn print_program_break(label: &str) {
  println!(
    "[{}] PID = {}, program break (sbrk(0)) = {:?}",
    label,
    std::process::id(),
    unsafe { sbrk(0) }
  );
}

fn main() {
  env_logger::init();

  // Safety: nothing else in this process moves the program break.
  let mut heap = unsafe { Heap::new() };

  println!("BLOCK HEADER SIZE: {} bytes\n", HEADER_SIZE);

  print_program_break("start");

  unsafe {
    // ------------------------------------------------------------------
    // 1) Three allocations of 64, 128 and 64 bytes.
    // ------------------------------------------------------------------
    let a = heap.allocate(64).expect("allocate a");
    let b = heap.allocate(128).expect("allocate b");
    let c = heap.allocate(64).expect("allocate c");

    ptr::write_bytes(a.as_ptr(), 0xAA, 64);
    ptr::write_bytes(b.as_ptr(), 0xBB, 128);
    ptr::write_bytes(c.as_ptr(), 0xCC, 64);

    println!("\n[1] After 3 allocations (64, 128, 64):");
    heap.dump();
    print_program_break("after 3 allocations");

    // ------------------------------------------------------------------
    // 2) Release the middle block; its region becomes reusable.
    // ------------------------------------------------------------------
    heap.release(b.as_ptr());

    println!("\n[2] After releasing the middle block:");
    heap.dump();

    // ------------------------------------------------------------------
    // 3) A 52 byte request reuses the released region via a split,
    //    leaving a smaller free block behind it.
    // ------------------------------------------------------------------
    let d = heap.allocate(52).expect("allocate d");

    println!("\n[3] After allocating 52 bytes (reused = {}):", d == b);
    heap.dump();

    // ------------------------------------------------------------------
    // 4) A 16 byte request fits the leftover whole, so the heap does
    //    not grow.
    // ------------------------------------------------------------------
    let before = heap.grown_bytes();

    let e = heap.allocate(16).expect("allocate e");

    println!(
      "\n[4] After allocating 16 bytes (heap grew = {}):",
      heap.grown_bytes() != before
    );
    heap.dump();
    print_program_break("after reuse");

    // ------------------------------------------------------------------
    // 5) Release everything; the list converges to one free block.
    // ------------------------------------------------------------------
    heap.release(a.as_ptr());
    heap.release(c.as_ptr());
    heap.release(d.as_ptr());
    heap.release(e.as_ptr());

    println!("\n[5] After releasing every block:");
    heap.dump();
  }

  print_program_break("end");
}
