use super::AddressSpace;
use crate::error::VmError;
use crate::page_table::{PageTable, PageTableHandle};
use crate::scheduler::Scheduler;
use kernel_alloc::PhysicalMemoryManager;
use kernel_info::machine::PAGE_COPY_LATENCY;
use kernel_noff::{Executable, FileSystem};
use log::{debug, trace};

impl<E: Executable> AddressSpace<E> {
    /// Duplicate this address space for a child process.
    ///
    /// The child reopens the image by name and gets its own table of the same
    /// length with identical flag bits. Every valid private page is copied
    /// into a fresh frame; invalid and shared entries alias the parent's frame
    /// unchanged. The copy is eager: nothing is deferred to a later write.
    ///
    /// Each copied page is charged to the calling thread as one page fault and
    /// [`PAGE_COPY_LATENCY`] ticks of sleep. The charge happens only after the
    /// child table is complete.
    ///
    /// # Errors
    /// - [`VmError::ExecutableNotFound`] if the image cannot be reopened.
    /// - [`VmError::Alloc`] if fewer frames remain than the parent has pages.
    ///   The bound counts every virtual page, not only the ones copied.
    pub fn fork<F, S>(
        &self,
        fs: &F,
        pmm: &mut PhysicalMemoryManager,
        scheduler: &mut S,
    ) -> Result<Self, VmError>
    where
        F: FileSystem<File = E>,
        S: Scheduler + ?Sized,
    {
        let executable = fs
            .open(&self.file_name)
            .ok_or_else(|| VmError::ExecutableNotFound(self.file_name.clone()))?;

        pmm.ensure_available(self.num_pages)?;

        let parent = self.table.lock();
        let private = parent.iter().filter(|e| e.is_private_mapping()).count();

        debug!(
            "forking `{}`: {} pages, {private} private to copy",
            self.file_name, self.num_pages
        );

        let mut child = PageTable::with_capacity(self.num_pages);
        let mut copied = 0u32;
        for entry in parent.iter() {
            let mut dup = *entry;
            if entry.is_private_mapping() {
                let src = entry
                    .physical_page
                    .ok_or(VmError::MissingFrame(entry.virtual_page))?;
                let dst = pmm.allocate_frame(Some(src))?;
                pmm.memory_mut().copy_frame(src, dst)?;
                dup.physical_page = Some(dst);
                copied += 1;
                trace!("fork: vpn {} copied frame {src} -> {dst}", entry.virtual_page);
            }
            child.push(dup);
        }
        drop(parent);

        for _ in 0..copied {
            scheduler.record_page_fault();
            let wake = scheduler.total_ticks() + PAGE_COPY_LATENCY;
            scheduler.sleep_until(wake);
        }

        Ok(Self {
            file_name: self.file_name.clone(),
            executable,
            table: PageTableHandle::new(child),
            num_pages: self.num_pages,
        })
    }
}
