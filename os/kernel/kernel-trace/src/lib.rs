//! # Debug Tracing
//!
//! A `log::Log` implementation for the virtual-memory kernel, filtered the
//! way the simulator's `-d` switch filters debug output: by a set of
//! single-character flags, each enabling one group of crates.
//!
//! | Flag | Enables |
//! |------|---------|
//! | `a`  | address spaces: `kernel_vmem`, `kernel_noff` |
//! | `m`  | machine: `kernel_alloc`, `kernel_registers` |
//! | `+`  | everything |
//!
//! Warnings and errors always pass the flag filter. Records from crates not
//! in any group only go through the level filter.
//!
//! ## Output
//!
//! Each record is rendered as one line, `[LEVEL] target: message`, and
//! handed to a [`TraceSink`]. With the `std` feature, [`StderrSink`] writes
//! to standard error.
//!
//! ```rust
//! use kernel_trace::{DebugFlags, TraceLogger, TraceSink};
//! use log::LevelFilter;
//!
//! struct Discard;
//! impl TraceSink for Discard {
//!     fn write_line(&self, _: core::fmt::Arguments<'_>) {}
//! }
//!
//! let logger = TraceLogger::new(Discard, LevelFilter::Trace, "a".parse().unwrap());
//! assert!(logger.flags().address_spaces());
//! assert!(!logger.flags().machine());
//! ```

#![cfg_attr(not(any(test, doctest, feature = "std")), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

mod flags;
mod logger;

pub use flags::DebugFlags;
pub use logger::{TraceLogger, TraceSink};

#[cfg(feature = "std")]
pub use logger::StderrSink;
