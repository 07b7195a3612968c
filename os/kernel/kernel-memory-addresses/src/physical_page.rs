use crate::{PAGE_SIZE, PhysicalAddress};
use core::fmt;
use core::ops::Range;

/// Physical frame number.
///
/// A frame is valid for a given machine only if it is below that machine's
/// frame count; the physical memory array checks this on every access.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FrameNumber(u32);

impl FrameNumber {
    #[inline]
    #[must_use]
    pub const fn new(v: u32) -> Self {
        Self(v)
    }

    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// First byte of this frame.
    #[inline]
    #[must_use]
    pub const fn base(self) -> PhysicalAddress {
        PhysicalAddress::new(self.0 * PAGE_SIZE)
    }

    #[inline]
    #[must_use]
    pub const fn join(self, offset: u32) -> PhysicalAddress {
        debug_assert!(offset < PAGE_SIZE);
        PhysicalAddress::new(self.0 * PAGE_SIZE + offset)
    }

    /// Byte range of this frame within the main memory array.
    #[inline]
    #[must_use]
    pub const fn byte_range(self) -> Range<usize> {
        let start = self.base().as_usize();
        start..start + PAGE_SIZE as usize
    }
}

impl fmt::Debug for FrameNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({})", self.0)
    }
}

impl fmt::Display for FrameNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
