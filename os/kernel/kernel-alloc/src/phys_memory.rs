//! # Simulated Main Memory
//!
//! A flat byte array of `num_frames * PAGE_SIZE` bytes. All accessors are
//! bounds-checked and report [`AllocError`] instead of panicking.

use crate::AllocError;
use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;
use kernel_memory_addresses::{FrameNumber, PAGE_SIZE, PhysicalAddress};

pub struct PhysicalMemory {
    bytes: Vec<u8>,
    num_frames: u32,
}

impl PhysicalMemory {
    /// Allocate `num_frames` zero-filled frames.
    #[must_use]
    pub fn new(num_frames: u32) -> Self {
        Self {
            bytes: vec![0; num_frames as usize * PAGE_SIZE as usize],
            num_frames,
        }
    }

    #[inline]
    #[must_use]
    pub const fn num_frames(&self) -> u32 {
        self.num_frames
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// # Errors
    /// [`AllocError::FrameOutOfBounds`] if `frame` is past the end of memory.
    pub fn frame(&self, frame: FrameNumber) -> Result<&[u8], AllocError> {
        self.bytes
            .get(frame.byte_range())
            .ok_or(AllocError::FrameOutOfBounds(frame))
    }

    /// # Errors
    /// [`AllocError::FrameOutOfBounds`] if `frame` is past the end of memory.
    pub fn frame_mut(&mut self, frame: FrameNumber) -> Result<&mut [u8], AllocError> {
        self.bytes
            .get_mut(frame.byte_range())
            .ok_or(AllocError::FrameOutOfBounds(frame))
    }

    /// # Errors
    /// [`AllocError::FrameOutOfBounds`] if `frame` is past the end of memory.
    pub fn zero_frame(&mut self, frame: FrameNumber) -> Result<(), AllocError> {
        self.frame_mut(frame)?.fill(0);
        Ok(())
    }

    /// Copy the full contents of `src` into `dst`.
    ///
    /// # Errors
    /// [`AllocError::FrameOutOfBounds`] if either frame is past the end of memory.
    pub fn copy_frame(&mut self, src: FrameNumber, dst: FrameNumber) -> Result<(), AllocError> {
        self.frame(src)?;
        self.frame(dst)?;
        self.bytes.copy_within(src.byte_range(), dst.byte_range().start);
        Ok(())
    }

    /// # Errors
    /// [`AllocError::RangeOutOfBounds`] if the range is not fully inside memory.
    pub fn read(&self, addr: PhysicalAddress, buf: &mut [u8]) -> Result<(), AllocError> {
        let range = self.range(addr, buf.len())?;
        buf.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    /// # Errors
    /// [`AllocError::RangeOutOfBounds`] if the range is not fully inside memory.
    pub fn write(&mut self, addr: PhysicalAddress, data: &[u8]) -> Result<(), AllocError> {
        let range = self.range(addr, data.len())?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    fn range(&self, addr: PhysicalAddress, len: usize) -> Result<Range<usize>, AllocError> {
        let start = addr.as_usize();
        match start.checked_add(len) {
            Some(end) if end <= self.bytes.len() => Ok(start..end),
            _ => Err(AllocError::RangeOutOfBounds { addr, len }),
        }
    }
}

impl core::fmt::Debug for PhysicalMemory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PhysicalMemory")
            .field("frames", &self.num_frames())
            .finish_non_exhaustive()
    }
}
