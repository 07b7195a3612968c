use crate::frame_alloc::{FrameAlloc, allocator_for};
use crate::{AllocError, PhysicalMemory};
use alloc::boxed::Box;
use kernel_info::config::VmConfig;
use kernel_memory_addresses::FrameNumber;
use log::{debug, trace};

/// Owner of physical memory and of the frame allocator.
///
/// Every address-space operation that touches frames takes this as an
/// explicit `&mut` argument. There is no global instance.
pub struct PhysicalMemoryManager {
    memory: PhysicalMemory,
    frames: Box<dyn FrameAlloc + Send>,
}

impl PhysicalMemoryManager {
    /// Create a manager with the allocator chosen by `config.replacement`.
    #[must_use]
    pub fn new(config: &VmConfig) -> Self {
        let frames = allocator_for(config.replacement, config.num_phys_pages);
        Self::with_allocator(config.num_phys_pages, frames)
    }

    /// Create a manager over `num_frames` frames using a caller-supplied allocator.
    #[must_use]
    pub fn with_allocator(num_frames: u32, frames: Box<dyn FrameAlloc + Send>) -> Self {
        debug!(
            "physical memory: {num_frames} frames, allocator capacity {}",
            frames.capacity()
        );
        Self {
            memory: PhysicalMemory::new(num_frames),
            frames,
        }
    }

    /// Check that `pages` more frames can be issued.
    ///
    /// Callers run this before mutating any state so that a failed operation
    /// leaves nothing half-built.
    ///
    /// # Errors
    /// [`AllocError::OutOfFrames`] if fewer than `pages` frames remain.
    pub fn ensure_available(&self, pages: u32) -> Result<(), AllocError> {
        let available = self.available();
        if pages > available {
            return Err(AllocError::OutOfFrames {
                requested: pages,
                available,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }

    /// Check that `pages` pages fit into physical memory at all.
    ///
    /// Unlike [`ensure_available`](Self::ensure_available) this ignores frames
    /// already issued; it bounds the total size of one address space.
    ///
    /// # Errors
    /// [`AllocError::OutOfFrames`] if `pages` exceeds the allocator capacity.
    pub fn ensure_capacity(&self, pages: u32) -> Result<(), AllocError> {
        let capacity = self.capacity();
        if pages > capacity {
            return Err(AllocError::OutOfFrames {
                requested: pages,
                available: self.available(),
                capacity,
            });
        }
        Ok(())
    }

    /// Issue one frame.
    ///
    /// `hint` is passed through to the allocator as the frame being replaced
    /// or copied.
    ///
    /// # Errors
    /// [`AllocError::OutOfFrames`] if the pool is exhausted, or
    /// [`AllocError::FrameOutOfBounds`] if the allocator returned a frame that
    /// physical memory does not contain.
    pub fn allocate_frame(&mut self, hint: Option<FrameNumber>) -> Result<FrameNumber, AllocError> {
        let frame = self
            .frames
            .next_free_frame(hint)
            .ok_or(AllocError::OutOfFrames {
                requested: 1,
                available: 0,
                capacity: self.capacity(),
            })?;
        if frame.as_u32() >= self.memory.num_frames() {
            return Err(AllocError::FrameOutOfBounds(frame));
        }
        trace!("issued frame {frame} ({} in use)", self.issued());
        Ok(frame)
    }

    #[inline]
    #[must_use]
    pub const fn memory(&self) -> &PhysicalMemory {
        &self.memory
    }

    #[inline]
    pub const fn memory_mut(&mut self) -> &mut PhysicalMemory {
        &mut self.memory
    }

    #[must_use]
    pub fn issued(&self) -> u32 {
        self.frames.issued()
    }

    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.frames.capacity()
    }

    #[must_use]
    pub fn available(&self) -> u32 {
        self.frames.available()
    }
}

impl core::fmt::Debug for PhysicalMemoryManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PhysicalMemoryManager")
            .field("memory", &self.memory)
            .field("issued", &self.issued())
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BumpFrameAlloc;

    fn pmm(frames: u32) -> PhysicalMemoryManager {
        PhysicalMemoryManager::new(&VmConfig::new().with_num_phys_pages(frames))
    }

    #[test]
    fn ensure_available_reports_shortfall() {
        let mut m = pmm(3);
        m.allocate_frame(None).unwrap();
        assert!(m.ensure_available(2).is_ok());
        assert_eq!(
            m.ensure_available(3),
            Err(AllocError::OutOfFrames {
                requested: 3,
                available: 2,
                capacity: 3
            })
        );
        // checking is not allocating
        assert_eq!(m.issued(), 1);
    }

    #[test]
    fn ensure_capacity_ignores_issued_frames() {
        let mut m = pmm(4);
        m.allocate_frame(None).unwrap();
        m.allocate_frame(None).unwrap();
        assert!(m.ensure_capacity(4).is_ok());
        assert_eq!(
            m.ensure_capacity(5),
            Err(AllocError::OutOfFrames {
                requested: 5,
                available: 2,
                capacity: 4
            })
        );
    }

    #[test]
    fn allocation_fails_cleanly_when_exhausted() {
        let mut m = pmm(1);
        assert_eq!(m.allocate_frame(None), Ok(FrameNumber::new(0)));
        assert!(matches!(
            m.allocate_frame(None),
            Err(AllocError::OutOfFrames { .. })
        ));
        assert_eq!(m.issued(), 1);
    }

    #[test]
    fn allocator_larger_than_memory_is_caught() {
        let mut m = PhysicalMemoryManager::with_allocator(1, Box::new(BumpFrameAlloc::new(2)));
        m.allocate_frame(None).unwrap();
        assert_eq!(
            m.allocate_frame(None),
            Err(AllocError::FrameOutOfBounds(FrameNumber::new(1)))
        );
    }
}
