use crate::{PAGE_SIZE, VirtualPageNumber};
use core::fmt;
use core::ops::Add;

/// Virtual memory address inside one user address space.
///
/// ### Semantics
/// - [`page`](Self::page) is `addr / PAGE_SIZE`, [`offset`](Self::offset) is
///   `addr % PAGE_SIZE`.
/// - [`VirtualPageNumber::join`] reverses [`split`](Self::split).
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VirtualAddress(u32);

impl VirtualAddress {
    #[inline]
    #[must_use]
    pub const fn new(v: u32) -> Self {
        Self(v)
    }

    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Virtual page containing this address.
    #[inline]
    #[must_use]
    pub const fn page(self) -> VirtualPageNumber {
        VirtualPageNumber::new(self.0 / PAGE_SIZE)
    }

    /// Byte offset of this address within its page.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> u32 {
        self.0 % PAGE_SIZE
    }

    #[inline]
    #[must_use]
    pub const fn split(self) -> (VirtualPageNumber, u32) {
        (self.page(), self.offset())
    }
}

impl fmt::Debug for VirtualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VA(0x{:08X})", self.0)
    }
}

impl fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

impl From<u32> for VirtualAddress {
    #[inline]
    fn from(v: u32) -> Self {
        Self::new(v)
    }
}

impl From<VirtualPageNumber> for VirtualAddress {
    #[inline]
    fn from(value: VirtualPageNumber) -> Self {
        value.base()
    }
}

impl Add<u32> for VirtualAddress {
    type Output = Self;
    #[inline]
    fn add(self, rhs: u32) -> Self::Output {
        Self(self.0 + rhs)
    }
}
