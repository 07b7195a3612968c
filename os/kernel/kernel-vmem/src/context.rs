//! # CPU Context Binding
//!
//! The MMU translates through whichever page table was installed last.
//! Switching to a process means installing its table; initialising a process
//! means setting up its registers.

use crate::address_space::AddressSpace;
use crate::page_table::PageTableHandle;
use kernel_info::machine::{INSTRUCTION_SIZE, STACK_MARGIN, USER_ENTRY_POINT};
use kernel_noff::Executable;
use kernel_registers::{RegisterFile, RegisterId};
use log::debug;

/// The MMU's view of the active address space.
pub trait Mmu {
    /// Make `table` with `num_pages` entries the active page table.
    fn install_page_table(&mut self, table: PageTableHandle, num_pages: u32);
}

impl<E: Executable> AddressSpace<E> {
    /// Set up user-mode registers for a fresh run of this image.
    ///
    /// All registers are cleared, the program counters point at the entry
    /// point and the instruction after it, and the stack pointer sits
    /// [`STACK_MARGIN`] bytes below the end of the address space.
    pub fn init_user_registers<R>(&self, regs: &mut R)
    where
        R: RegisterFile + ?Sized,
    {
        regs.clear();
        regs.write_register(RegisterId::PC, USER_ENTRY_POINT.cast_signed());
        regs.write_register(
            RegisterId::NEXT_PC,
            (USER_ENTRY_POINT + INSTRUCTION_SIZE).cast_signed(),
        );
        let sp = self.size() - STACK_MARGIN;
        regs.write_register(RegisterId::STACK, sp.cast_signed());
        debug!("initializing stack register to {sp:#x}");
    }

    /// Save address-space state on a context switch away from this process.
    ///
    /// Nothing needs saving: the translation entries are updated in place.
    #[allow(clippy::unused_self)]
    pub const fn save_context(&self) {}

    /// Install this address space's page table into `mmu`.
    pub fn restore_context<M>(&self, mmu: &mut M)
    where
        M: Mmu + ?Sized,
    {
        mmu.install_page_table(self.page_table().clone(), self.num_pages());
    }
}
