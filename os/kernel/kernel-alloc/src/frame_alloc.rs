//! Physical frame allocators.
//!
//! Only one strategy exists: [`BumpFrameAlloc`]. Additional strategies hook in
//! through [`allocator_for`] once a victim-selecting policy is implemented.

use alloc::boxed::Box;
use kernel_info::config::ReplacementPolicy;
use kernel_memory_addresses::FrameNumber;

/// Source of physical frames.
pub trait FrameAlloc {
    /// Return the next frame to use.
    ///
    /// `current` is the frame the caller is copying or replacing, if any; a
    /// replacement strategy may use it as a hint. Returns `None` once the
    /// pool is exhausted.
    fn next_free_frame(&mut self, current: Option<FrameNumber>) -> Option<FrameNumber>;

    /// Number of frames issued so far.
    fn issued(&self) -> u32;

    /// Total number of frames this allocator manages.
    fn capacity(&self) -> u32;

    /// Frames that can still be issued.
    fn available(&self) -> u32 {
        self.capacity() - self.issued()
    }
}

/// Monotonic allocator: hands out frame `0, 1, 2, …` and never reuses one.
///
/// The `current` hint is ignored.
#[derive(Debug, Clone)]
pub struct BumpFrameAlloc {
    /// Next frame to hand out; equals the number of frames issued.
    next: u32,
    /// Exclusive end (bounds check).
    end: u32,
}

impl BumpFrameAlloc {
    #[must_use]
    pub const fn new(capacity: u32) -> Self {
        Self {
            next: 0,
            end: capacity,
        }
    }
}

impl FrameAlloc for BumpFrameAlloc {
    fn next_free_frame(&mut self, _current: Option<FrameNumber>) -> Option<FrameNumber> {
        if self.next >= self.end {
            return None;
        }
        let frame = FrameNumber::new(self.next);
        self.next += 1;
        Some(frame)
    }

    fn issued(&self) -> u32 {
        self.next
    }

    fn capacity(&self) -> u32 {
        self.end
    }
}

/// Build the frame allocator selected by `policy`.
#[must_use]
pub fn allocator_for(policy: ReplacementPolicy, capacity: u32) -> Box<dyn FrameAlloc + Send> {
    match policy {
        ReplacementPolicy::Bump => Box::new(BumpFrameAlloc::new(capacity)),
    }
}
