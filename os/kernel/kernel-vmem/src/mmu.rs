//! # Simulated MMU
//!
//! Software translation through the installed page table, with the same
//! exceptions the simulated CPU raises.

use crate::context::Mmu;
use crate::page_table::PageTableHandle;
use kernel_memory_addresses::{PhysicalAddress, VirtualAddress};

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MmuException {
    #[error("no page table installed")]
    NoPageTable,
    #[error("address error at {0}")]
    AddressError(VirtualAddress),
    #[error("page fault at {0}")]
    PageFault(VirtualAddress),
    #[error("write to read-only page at {0}")]
    ReadOnly(VirtualAddress),
}

#[derive(Debug, Default)]
pub struct SimulatedMmu {
    active: Option<(PageTableHandle, u32)>,
}

impl SimulatedMmu {
    #[must_use]
    pub const fn new() -> Self {
        Self { active: None }
    }

    /// The installed table, if any.
    #[must_use]
    pub fn page_table(&self) -> Option<&PageTableHandle> {
        self.active.as_ref().map(|(t, _)| t)
    }

    /// The installed table length, or `0`.
    #[must_use]
    pub fn num_pages(&self) -> u32 {
        self.active.as_ref().map_or(0, |(_, n)| *n)
    }

    /// Translate `va` for a read, or for a write if `writing`.
    ///
    /// On success the entry's `used` bit is set, and its `dirty` bit as well
    /// when writing.
    ///
    /// # Errors
    /// - [`MmuException::NoPageTable`] if nothing is installed.
    /// - [`MmuException::AddressError`] if the page is past the installed length.
    /// - [`MmuException::PageFault`] if the entry is invalid.
    /// - [`MmuException::ReadOnly`] if writing to a read-only page.
    pub fn translate(
        &self,
        va: VirtualAddress,
        writing: bool,
    ) -> Result<PhysicalAddress, MmuException> {
        let (table, num_pages) = self.active.as_ref().ok_or(MmuException::NoPageTable)?;
        let (vpn, offset) = va.split();
        if vpn.as_u32() >= *num_pages {
            return Err(MmuException::AddressError(va));
        }

        let mut table = table.lock();
        let entry = table
            .get_mut(vpn)
            .ok_or(MmuException::AddressError(va))?;
        let frame = entry.frame().ok_or(MmuException::PageFault(va))?;
        if writing && entry.flags.read_only() {
            return Err(MmuException::ReadOnly(va));
        }

        entry.flags.set_used(true);
        if writing {
            entry.flags.set_dirty(true);
        }
        Ok(frame.join(offset))
    }
}

impl Mmu for SimulatedMmu {
    fn install_page_table(&mut self, table: PageTableHandle, num_pages: u32) {
        self.active = Some((table, num_pages));
    }
}
