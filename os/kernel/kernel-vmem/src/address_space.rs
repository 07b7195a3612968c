//! # User Address Spaces
//!
//! An [`AddressSpace`] couples a dense [`PageTable`] with the executable it
//! was loaded from. It is created in one of three ways:
//!
//! | Constructor | Frames claimed | Bytes loaded |
//! |-------------|----------------|--------------|
//! | [`AddressSpace::new`] with [`PagingMode::Eager`] | one per page | code and initialised data |
//! | [`AddressSpace::new`] with [`PagingMode::Demand`] | none | none; see [`AddressSpace::demand_allocation`] |
//! | [`AddressSpace::fork`] | one per private valid page of the parent | copied from the parent |
//!
//! and grows only through [`AddressSpace::allocate_shared_memory`].
//!
//! ## Layout
//!
//! ```text
//! 0                                             num_pages * PAGE_SIZE
//! ┌──────────┬────────────┬──────────────┬───────────┬────────────┐
//! │   code   │ init data  │ uninit data  │   stack   │  shared …  │
//! └──────────┴────────────┴──────────────┴───────────┴────────────┘
//!                                      USER_STACK_SIZE  appended by growth
//! ```
//!
//! ## Failure
//!
//! Every operation checks frame capacity and the executable before it
//! changes anything. A returned error leaves the issued-frame counter, the
//! physical memory contents and any existing table exactly as they were.

mod demand;
mod fork;
mod shared;

use crate::entry::TranslationEntry;
use crate::error::VmError;
use crate::page_table::{PageTable, PageTableHandle};
use alloc::string::String;
use kernel_alloc::{PhysicalMemory, PhysicalMemoryManager};
use kernel_info::config::PagingMode;
use kernel_info::machine::USER_STACK_SIZE;
use kernel_memory_addresses::{PAGE_SIZE, VirtualAddress, VirtualPageNumber, pages_for};
use kernel_noff::{Executable, FileSystem, NoffHeader, Segment};
use log::{debug, trace, warn};

/// A process's virtual memory.
pub struct AddressSpace<E: Executable> {
    /// Used to reopen the image for fork and demand faults.
    file_name: String,
    executable: E,
    table: PageTableHandle,
    num_pages: u32,
}

impl<E: Executable> AddressSpace<E> {
    /// Open `file_name` through `fs` and build an address space from it.
    ///
    /// # Errors
    /// [`VmError::ExecutableNotFound`] if the file does not exist, otherwise
    /// see [`new`](Self::new).
    pub fn open<F>(
        fs: &F,
        file_name: &str,
        paging: PagingMode,
        pmm: &mut PhysicalMemoryManager,
    ) -> Result<Self, VmError>
    where
        F: FileSystem<File = E>,
    {
        let executable = fs
            .open(file_name)
            .ok_or_else(|| VmError::ExecutableNotFound(file_name.into()))?;
        Self::new(file_name, executable, paging, pmm)
    }

    /// Build an address space for the NOFF image in `executable`.
    ///
    /// The space holds the code, initialised and uninitialised data plus a
    /// [`USER_STACK_SIZE`] stack, rounded up to whole pages. In eager mode
    /// every page gets a zeroed frame and the code and initialised-data bytes
    /// are copied in. In demand mode every entry starts unmapped.
    ///
    /// # Errors
    /// - [`VmError::Noff`] if the header is truncated or has a bad magic.
    /// - [`VmError::ImageTooLarge`] if the size overflows 32 bits.
    /// - [`VmError::SegmentOutOfRange`] if a loadable segment does not fit.
    /// - [`VmError::Alloc`] if physical memory cannot hold every page.
    pub fn new(
        file_name: impl Into<String>,
        executable: E,
        paging: PagingMode,
        pmm: &mut PhysicalMemoryManager,
    ) -> Result<Self, VmError> {
        let file_name = file_name.into();
        let header = NoffHeader::read_from(&executable)?;
        let num_pages = image_pages(&header)?;
        validate_segments(&header, num_pages)?;
        pmm.ensure_available(num_pages)?;

        debug!(
            "initializing address space for `{file_name}`: {num_pages} pages, {} bytes, {paging} paging",
            num_pages * PAGE_SIZE
        );

        let table = match paging {
            PagingMode::Eager => load_eager(&executable, &header, num_pages, pmm)?,
            PagingMode::Demand => PageTable::unmapped(num_pages),
        };

        Ok(Self {
            file_name,
            executable,
            table: PageTableHandle::new(table),
            num_pages,
        })
    }

    /// Number of virtual pages, including any shared growth.
    #[inline]
    #[must_use]
    pub const fn num_pages(&self) -> u32 {
        self.num_pages
    }

    /// Handle to the current page table.
    ///
    /// Growth replaces the table, so the handle is only current until the
    /// next [`allocate_shared_memory`](Self::allocate_shared_memory).
    #[inline]
    #[must_use]
    pub const fn page_table(&self) -> &PageTableHandle {
        &self.table
    }

    #[inline]
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The most recently opened handle onto the image.
    #[inline]
    #[must_use]
    pub const fn executable(&self) -> &E {
        &self.executable
    }

    /// Size of the address space in bytes.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.num_pages * PAGE_SIZE
    }

    /// Emit one `trace!` line per translation entry.
    pub fn log_page_table(&self) {
        let table = self.table.lock();
        trace!("page table of `{}` ({} pages):", self.file_name, table.len());
        for e in table.iter() {
            let frame = e.physical_page.map_or(-1, |f| i64::from(f.as_u32()));
            trace!(
                "  vpn {:>3} -> frame {:>3}  valid={} used={} dirty={} ro={} shared={}",
                e.virtual_page,
                frame,
                u8::from(e.flags.valid()),
                u8::from(e.flags.used()),
                u8::from(e.flags.dirty()),
                u8::from(e.flags.read_only()),
                u8::from(e.flags.shared()),
            );
        }
    }
}

impl<E: Executable> Drop for AddressSpace<E> {
    fn drop(&mut self) {
        debug!(
            "releasing address space of `{}`: {} pages, frames stay issued",
            self.file_name, self.num_pages
        );
    }
}

/// Pages needed for the image plus the user stack.
fn image_pages(header: &NoffHeader) -> Result<u32, VmError> {
    let size = header
        .image_size()
        .and_then(|s| s.checked_add(USER_STACK_SIZE))
        .ok_or(VmError::ImageTooLarge)?;
    let num_pages = pages_for(size);
    if num_pages.checked_mul(PAGE_SIZE).is_none() {
        return Err(VmError::ImageTooLarge);
    }
    Ok(num_pages)
}

/// Reject loadable segments that would land outside the address space.
fn validate_segments(header: &NoffHeader, num_pages: u32) -> Result<(), VmError> {
    let limit = num_pages * PAGE_SIZE;
    for (segment, seg) in header.loadable_segments() {
        if seg.is_empty() {
            continue;
        }
        let end = u64::from(seg.virtual_addr) + u64::from(seg.size);
        if end > u64::from(limit) {
            return Err(VmError::SegmentOutOfRange {
                segment,
                end,
                limit,
            });
        }
    }
    Ok(())
}

/// Claim, zero and fill a frame for every page.
fn load_eager<E: Executable>(
    executable: &E,
    header: &NoffHeader,
    num_pages: u32,
    pmm: &mut PhysicalMemoryManager,
) -> Result<PageTable, VmError> {
    let mut table = PageTable::with_capacity(num_pages);
    for vpn in 0..num_pages {
        let frame = pmm.allocate_frame(None)?;
        pmm.memory_mut().zero_frame(frame)?;
        table.push(TranslationEntry::mapped(VirtualPageNumber::new(vpn), frame));
    }

    for (name, seg) in header.loadable_segments() {
        if seg.is_empty() {
            continue;
        }
        debug!(
            "initializing {name} segment at {}, size {}",
            seg.virtual_address(),
            seg.size
        );
        copy_segment(executable, name, seg, &table, pmm.memory_mut())?;
    }
    Ok(table)
}

/// Stream `seg` from the image into the frames `table` maps it to.
fn copy_segment<E: Executable>(
    executable: &E,
    name: &'static str,
    seg: Segment,
    table: &PageTable,
    memory: &mut PhysicalMemory,
) -> Result<(), VmError> {
    let mut done = 0;
    while done < seg.size {
        let va = VirtualAddress::new(seg.virtual_addr + done);
        let (vpn, offset) = va.split();
        let chunk = (PAGE_SIZE - offset).min(seg.size - done);
        let frame = table
            .get(vpn)
            .ok_or(VmError::AddressOutOfRange(va))?
            .frame()
            .ok_or(VmError::MissingFrame(vpn))?;

        let start = offset as usize;
        let dst = &mut memory.frame_mut(frame)?[start..start + chunk as usize];
        let read = executable.read_at(dst, seg.in_file_addr.saturating_add(done));
        if read < dst.len() {
            warn!(
                "short read in {name} segment at {va}: got {read} of {} bytes",
                dst.len()
            );
        }
        trace!("{name}: {chunk} bytes to vpn {vpn} (frame {frame}) at offset {offset}");
        done += chunk;
    }
    Ok(())
}
