//! # Physical Memory and Frame Allocation
//!
//! This crate owns the simulated machine's main memory and decides which
//! physical frame a page gets. It is the bottom layer of the virtual-memory
//! subsystem:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │            Address spaces (kernel-vmem)             │
//! │    • eager / demand construction, fork, growth      │
//! └─────────────────┬───────────────────────────────────┘
//!                   │  &mut PhysicalMemoryManager
//! ┌─────────────────▼───────────────────────────────────┐
//! │           Physical Memory Manager                   │
//! │    • capacity checks before any frame is issued     │
//! │    • owns the frame allocator and the memory array  │
//! └───────┬─────────────────────────────┬───────────────┘
//!         │                             │
//! ┌───────▼──────────────┐   ┌──────────▼──────────────┐
//! │ Frame allocator      │   │ Physical memory         │
//! │ • FrameAlloc trait   │   │ • frame-indexed slices  │
//! │ • bump strategy      │   │ • bounds-checked copies │
//! └──────────────────────┘   └─────────────────────────┘
//! ```
//!
//! ## Frame lifetime
//!
//! Frames are handed out monotonically and are **never reclaimed**. Dropping
//! an address space leaves its frames issued. There is no per-frame reference
//! count either, which is why a private frame must only ever appear in one
//! translation entry; shared frames are the single, deliberate exception.
//!
//! ## Usage
//!
//! ```rust
//! use kernel_alloc::PhysicalMemoryManager;
//! use kernel_info::config::VmConfig;
//!
//! let mut pmm = PhysicalMemoryManager::new(&VmConfig::new().with_num_phys_pages(4));
//! pmm.ensure_available(2).unwrap();
//! let a = pmm.allocate_frame(None).unwrap();
//! let b = pmm.allocate_frame(None).unwrap();
//! assert_eq!((a.as_u32(), b.as_u32()), (0, 1));
//! assert_eq!(pmm.issued(), 2);
//! assert!(pmm.ensure_available(3).is_err());
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod frame_alloc;
mod manager;
pub mod phys_memory;

pub use frame_alloc::{BumpFrameAlloc, FrameAlloc};
pub use manager::PhysicalMemoryManager;
pub use phys_memory::PhysicalMemory;

use kernel_memory_addresses::{FrameNumber, PhysicalAddress};

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    #[error("{requested} frames requested but only {available} of {capacity} remain")]
    OutOfFrames {
        requested: u32,
        available: u32,
        capacity: u32,
    },
    #[error("frame {0} lies outside physical memory")]
    FrameOutOfBounds(FrameNumber),
    #[error("{len} bytes at {addr} lie outside physical memory")]
    RangeOutOfBounds { addr: PhysicalAddress, len: usize },
}
