use super::AddressSpace;
use crate::error::VmError;
use kernel_alloc::PhysicalMemoryManager;
use kernel_memory_addresses::{FrameNumber, PAGE_SIZE, VirtualAddress};
use kernel_noff::{Executable, FileSystem, NoffHeader};
use log::{debug, warn};

impl<E: Executable> AddressSpace<E> {
    /// Resolve a page fault at `vaddr` by loading its page.
    ///
    /// The image is reopened and its header re-read on every call. A fresh
    /// frame is zeroed and filled with the `PAGE_SIZE` bytes at the code
    /// segment's file offset plus `vpn * PAGE_SIZE`; data segments are not
    /// consulted. The entry becomes valid and clean, and the new handle
    /// replaces the one held by the address space.
    ///
    /// Faulting on a page that is already valid changes nothing and returns
    /// its frame.
    ///
    /// # Errors
    /// - [`VmError::AddressOutOfRange`] if `vaddr` is past the end of the space.
    /// - [`VmError::ExecutableNotFound`] or [`VmError::Noff`] if the image
    ///   cannot be reopened or its header is unreadable.
    /// - [`VmError::Alloc`] if no frame is left.
    pub fn demand_allocation<F>(
        &mut self,
        vaddr: VirtualAddress,
        fs: &F,
        pmm: &mut PhysicalMemoryManager,
    ) -> Result<FrameNumber, VmError>
    where
        F: FileSystem<File = E>,
    {
        let vpn = vaddr.page();
        if vpn.as_u32() >= self.num_pages {
            return Err(VmError::AddressOutOfRange(vaddr));
        }
        if let Some(frame) = self
            .table
            .lock()
            .get(vpn)
            .and_then(crate::TranslationEntry::frame)
        {
            warn!("spurious fault at {vaddr}: vpn {vpn} already in frame {frame}");
            return Ok(frame);
        }

        let executable = fs
            .open(&self.file_name)
            .ok_or_else(|| VmError::ExecutableNotFound(self.file_name.clone()))?;
        let header = NoffHeader::read_from(&executable)?;

        let frame = pmm.allocate_frame(None)?;
        let memory = pmm.memory_mut();
        memory.zero_frame(frame)?;
        let offset = header
            .code
            .in_file_addr
            .saturating_add(vpn.as_u32().saturating_mul(PAGE_SIZE));
        let read = executable.read_at(memory.frame_mut(frame)?, offset);
        debug!("demand load of vpn {vpn} into frame {frame}: {read} bytes from offset {offset}");

        let mut table = self.table.lock();
        let entry = table.get_mut(vpn).ok_or(VmError::AddressOutOfRange(vaddr))?;
        entry.bind(frame);
        drop(table);

        self.executable = executable;
        Ok(frame)
    }
}
