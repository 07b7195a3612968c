use crate::{PAGE_SIZE, VirtualAddress};
use core::fmt;

/// Virtual page number.
///
/// Page tables are dense, so a `VirtualPageNumber` is also the index of the
/// page's translation entry.
///
/// ### Examples
/// ```rust
/// # use kernel_memory_addresses::*;
/// let va = VirtualAddress::new(3 * PAGE_SIZE + 5);
/// let vpn = va.page();
/// assert_eq!(vpn.as_usize(), 3);
/// assert_eq!(vpn.join(va.offset()), va);
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VirtualPageNumber(u32);

impl VirtualPageNumber {
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

    /// First byte of this page.
    #[inline]
    #[must_use]
    pub const fn base(self) -> VirtualAddress {
        VirtualAddress::new(self.0 * PAGE_SIZE)
    }

    #[inline]
    #[must_use]
    pub const fn join(self, offset: u32) -> VirtualAddress {
        debug_assert!(offset < PAGE_SIZE);
        VirtualAddress::new(self.0 * PAGE_SIZE + offset)
    }
}

impl fmt::Debug for VirtualPageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VPN({})", self.0)
    }
}

impl fmt::Display for VirtualPageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
