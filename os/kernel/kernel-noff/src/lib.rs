//! # NOFF Executable Images
//!
//! NOFF ("Nachos Object File Format") is a deliberately tiny executable
//! format: a fixed 40-byte header followed by the raw bytes of the code and
//! initialised-data segments.
//!
//! ```text
//! offset  0 ┌────────────────────────────┐
//!           │ magic (0x00BADFAD)         │
//!         4 ├────────────────────────────┤
//!           │ code:       vaddr/file/size│
//!        16 ├────────────────────────────┤
//!           │ init data:  vaddr/file/size│
//!        28 ├────────────────────────────┤
//!           │ uninit data:vaddr/file/size│
//!        40 ├────────────────────────────┤
//!           │ code bytes                 │
//!           │ init data bytes            │
//!           └────────────────────────────┘
//! ```
//!
//! Every header word is stored in the byte order of the machine that
//! produced the image. [`NoffHeader::parse`] accepts either order and
//! normalises the header to host order.
//!
//! The crate also defines the file-system seam the loader reads through:
//! [`Executable`] for positioned reads and [`FileSystem`] for reopening an
//! image by name. [`mem`] provides an in-memory implementation.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

mod file;
mod header;
pub mod mem;

pub use file::{Executable, FileSystem};
pub use header::{ByteOrder, NOFF_HEADER_SIZE, NOFF_MAGIC, NoffError, NoffHeader, Segment};
