//! # Simulated MIPS Register File
//!
//! The user-mode CPU is a MIPS-like machine with 32 general purpose registers
//! followed by a handful of special registers (`HI`/`LO`, the program
//! counters, and the delayed-load bookkeeping).
//!
//! ```text
//! | 0 ‥ 31 | 32 | 33 | 34 | 35      | 36      | 37   | 38         | 39        |
//! |  GPRs  | HI | LO | PC | NEXT_PC | PREV_PC | LOAD | LOAD_VALUE | BAD_VADDR |
//! ```
//!
//! Kernel code never indexes the array directly; it goes through the
//! [`RegisterFile`] trait so the address-space code can initialise any
//! register store the CPU simulation provides.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

mod registers;

pub use registers::{NUM_GP_REGS, NUM_TOTAL_REGS, RegisterId, Registers};

/// Read/write access to a simulated register file.
pub trait RegisterFile {
    /// Current value of register `reg`.
    fn read_register(&self, reg: RegisterId) -> i32;

    /// Overwrite register `reg` with `value`.
    fn write_register(&mut self, reg: RegisterId, value: i32);

    /// Set every register to zero.
    fn clear(&mut self) {
        for reg in RegisterId::all() {
            self.write_register(reg, 0);
        }
    }
}
