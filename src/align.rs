/// Fixed alignment boundary for every payload address the heap hands out:
/// one machine word (8 bytes on 64-bit targets).
pub const ALIGNMENT: usize = std::mem::size_of::<usize>();

/// Rounds the given size up to the closest multiple of [`ALIGNMENT`].
///
/// # Examples
///
/// ```rust
/// use listalloc::align;
///
/// match listalloc::ALIGNMENT {
///     8 => assert_eq!(align!(13), 16), // 64 bit machine.
///     4 => assert_eq!(align!(11), 12), // 32 bit machine.
///     _ => {},
/// };
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    ($value + $crate::align::ALIGNMENT - 1) & !($crate::align::ALIGNMENT - 1)
  };
}
