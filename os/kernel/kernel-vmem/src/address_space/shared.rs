use super::AddressSpace;
use crate::context::Mmu;
use crate::entry::TranslationEntry;
use crate::error::VmError;
use crate::page_table::{PageTable, PageTableHandle};
use kernel_alloc::PhysicalMemoryManager;
use kernel_memory_addresses::{PAGE_SIZE, VirtualAddress, VirtualPageNumber, pages_for};
use kernel_noff::Executable;
use log::debug;

impl<E: Executable> AddressSpace<E> {
    /// Grow the address space by a shared region of at least `size` bytes.
    ///
    /// Appends `ceil(size / PAGE_SIZE)` valid, writable, shared pages, each
    /// bound to a fresh frame. Frames are not zeroed. The grown table replaces
    /// the old one and is immediately republished to `mmu`, so the running
    /// process never translates against the stale table.
    ///
    /// Returns the virtual address of the first new byte, which is the former
    /// end of the address space.
    ///
    /// # Errors
    /// - [`VmError::Alloc`] if the grown space has more pages than physical
    ///   memory has frames, or the remaining frames cannot hold the new pages.
    /// - [`VmError::ImageTooLarge`] if the grown space overflows 32 bits.
    pub fn allocate_shared_memory<M>(
        &mut self,
        size: u32,
        pmm: &mut PhysicalMemoryManager,
        mmu: &mut M,
    ) -> Result<VirtualAddress, VmError>
    where
        M: Mmu + ?Sized,
    {
        let old_pages = self.num_pages;
        let new_pages = pages_for(size);
        let total = old_pages
            .checked_add(new_pages)
            .filter(|n| n.checked_mul(PAGE_SIZE).is_some())
            .ok_or(VmError::ImageTooLarge)?;
        pmm.ensure_capacity(total)?;
        pmm.ensure_available(new_pages)?;

        let mut grown = PageTable::with_capacity(total);
        for entry in self.table.lock().iter() {
            grown.push(*entry);
        }
        for vpn in old_pages..total {
            let frame = pmm.allocate_frame(None)?;
            grown.push(TranslationEntry::shared(VirtualPageNumber::new(vpn), frame));
        }

        self.table = PageTableHandle::new(grown);
        self.num_pages = total;
        self.restore_context(mmu);

        let start = VirtualAddress::new(old_pages * PAGE_SIZE);
        debug!(
            "`{}` grew by {new_pages} shared pages at {start}, now {total} pages",
            self.file_name
        );
        Ok(start)
    }
}
