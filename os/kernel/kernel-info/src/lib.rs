//! # Simulated Machine Configuration
//!
//! This crate is the single source of truth for the constants and runtime
//! settings shared by every part of the virtual-memory subsystem: the frame
//! allocator, the NOFF loader, the address-space code and the simulated MMU.
//!
//! ## Overview
//!
//! The simulated machine has one flat physical memory array made of
//! [`NUM_PHYS_PAGES`](machine::NUM_PHYS_PAGES) frames of
//! [`PAGE_SIZE`](machine::PAGE_SIZE) bytes each. User programs are loaded into
//! per-process address spaces whose pages map one-to-one onto those frames.
//!
//! ```text
//! Physical memory (frames issued monotonically, never reclaimed):
//!
//! frame 0                                              frame N-1
//! ┌────────┬────────┬────────┬────────┬──── ─ ─ ──┬────────┐
//! │ proc A │ proc A │ proc B │ shared │           │  free  │
//! └────────┴────────┴────────┴────────┴──── ─ ─ ──┴────────┘
//!                                     ▲
//!                                     └── frames issued so far
//! ```
//!
//! ## Modules
//!
//! ### Machine Layout ([`machine`])
//! Compile-time constants: page size, default frame count, user stack size,
//! initial register values and the simulated cost of copying a page.
//!
//! ### Configuration ([`config`])
//! The runtime switches consumed by the virtual-memory core:
//! * **Paging mode**: load every page eagerly, or defer loading to page faults
//! * **Replacement policy**: the (currently single-strategy) frame allocator
//! * **Frame count**: size of the simulated physical memory
//!
//! ```rust
//! use kernel_info::config::{PagingMode, VmConfig};
//!
//! let config = VmConfig::from_replacement_selector(1).with_num_phys_pages(64);
//! assert_eq!(config.paging, PagingMode::Demand);
//! assert_eq!(config.num_phys_pages, 64);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod machine;
