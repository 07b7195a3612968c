//! # Virtual and Physical Memory Address Types
//!
//! Strongly typed wrappers for the 32-bit addresses and page numbers of the
//! simulated machine.
//!
//! ## Overview
//!
//! | Type | Description |
//! |------|-------------|
//! | [`VirtualAddress`] | A byte address inside a user address space. |
//! | [`VirtualPageNumber`] | Index of a virtual page; equals the page-table index. |
//! | [`PhysicalAddress`] | A byte offset into the simulated main memory. |
//! | [`FrameNumber`] | Index of a physical frame in main memory. |
//!
//! All pages and frames are [`PAGE_SIZE`] bytes. Addresses split into a page
//! or frame number plus an in-page offset, and join back losslessly:
//!
//! ```rust
//! # use kernel_memory_addresses::*;
//! let va = VirtualAddress::new(0x1234);
//! let (vpn, off) = va.split();
//! assert_eq!(vpn.as_u32(), 0x1234 / PAGE_SIZE);
//! assert_eq!(vpn.join(off), va);
//!
//! let frame = FrameNumber::new(3);
//! assert_eq!(frame.base().as_u32(), 3 * PAGE_SIZE);
//! ```
//!
//! ## Design Notes
//!
//! - The types are `#[repr(transparent)]` over `u32` and implement `Copy`,
//!   `Eq`, `Ord` and `Hash`.
//! - Virtual and physical values never convert into each other implicitly;
//!   only a page table entry relates a [`VirtualPageNumber`] to a
//!   [`FrameNumber`].

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

mod physical_address;
mod physical_page;
mod virtual_address;
mod virtual_page;

pub use kernel_info::machine::PAGE_SIZE;
pub use physical_address::PhysicalAddress;
pub use physical_page::FrameNumber;
pub use virtual_address::VirtualAddress;
pub use virtual_page::VirtualPageNumber;

/// Integer division rounding towards positive infinity.
///
/// ```rust
/// # use kernel_memory_addresses::div_round_up;
/// assert_eq!(div_round_up(0, 128), 0);
/// assert_eq!(div_round_up(1, 128), 1);
/// assert_eq!(div_round_up(128, 128), 1);
/// assert_eq!(div_round_up(129, 128), 2);
/// ```
#[inline]
#[must_use]
pub const fn div_round_up(n: u32, d: u32) -> u32 {
    n.div_ceil(d)
}

/// Number of whole pages needed to hold `bytes` bytes.
#[inline]
#[must_use]
pub const fn pages_for(bytes: u32) -> u32 {
    div_round_up(bytes, PAGE_SIZE)
}
