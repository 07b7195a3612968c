//! # Virtual Memory Management
//!
//! Per-process address spaces for the simulated MIPS machine: translation
//! entries, dense page tables, loading NOFF images eagerly or on demand,
//! fork duplication, shared-memory growth and binding a space to the CPU.
//!
//! ## Virtual Address → Physical Address
//!
//! A 32-bit virtual address splits into a page number and an offset:
//!
//! ```text
//! | 31 ‒ 7 | 6 ‒ 0  |
//! |  VPN   | Offset |
//! ```
//!
//! The VPN indexes the single, dense page table of the active address
//! space. A valid entry supplies the frame; the offset is kept as is.
//!
//! ```text
//!  VirtualAddress ──► PageTable[vpn] ──► FrameNumber ──► PhysicalAddress
//!                          │
//!                          ├── invalid    → PageFault  → demand_allocation
//!                          ├── read_only  → ReadOnly on write
//!                          └── vpn ≥ len  → AddressError
//! ```
//!
//! ## Pieces
//!
//! | Item | Role |
//! |:-----|:-----|
//! | [`AddressSpace`] | Owns one table and the executable handle; all construction and mutation paths |
//! | [`TranslationEntry`], [`EntryFlags`] | One page's mapping and status bits |
//! | [`PageTable`], [`PageTableHandle`] | Dense table and its shared, lockable form |
//! | [`Mmu`] | What a context switch publishes the active table to |
//! | [`SimulatedMmu`] | Software translation raising [`MmuException`]s |
//! | [`Scheduler`] | Latency accounting for fork-time page copies |
//!
//! Frame ownership is tracked only through translation entries. There is no
//! per-frame reference count, so a shared frame stays aliased by every
//! address space that inherited it, including after its creator is dropped.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod address_space;
pub mod context;
pub mod entry;
mod error;
pub mod mmu;
pub mod page_table;
mod scheduler;

pub use crate::address_space::AddressSpace;
pub use crate::context::Mmu;
pub use crate::entry::{EntryFlags, TranslationEntry};
pub use crate::error::VmError;
pub use crate::mmu::{MmuException, SimulatedMmu};
pub use crate::page_table::{PageTable, PageTableHandle};
pub use crate::scheduler::Scheduler;
