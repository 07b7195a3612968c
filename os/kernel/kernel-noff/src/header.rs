//! # NOFF Header Parsing

use crate::Executable;
use kernel_memory_addresses::VirtualAddress;

/// Magic number identifying a NOFF image.
pub const NOFF_MAGIC: u32 = 0x00ba_dfad;

/// Size of the on-disk header: the magic plus three segment descriptors.
pub const NOFF_HEADER_SIZE: usize = 40;

const WORDS: usize = NOFF_HEADER_SIZE / 4;

/// Location of one segment in the image and in the address space.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Segment {
    /// Number of bytes in the segment.
    pub size: u32,
    /// Where the segment starts in the virtual address space.
    pub virtual_addr: u32,
    /// Where the segment's bytes start in the image file.
    pub in_file_addr: u32,
}

/// Decoded NOFF header, always in host byte order.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct NoffHeader {
    pub code: Segment,
    pub init_data: Segment,
    /// Zero-filled at load time; `in_file_addr` is meaningless.
    pub uninit_data: Segment,
}

/// Byte order used when encoding a header.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ByteOrder {
    /// The order of the machine running this code.
    Native,
    /// The opposite of [`Native`](Self::Native).
    Swapped,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoffError {
    #[error("executable header truncated: read {read} of {NOFF_HEADER_SIZE} bytes")]
    TruncatedHeader { read: usize },
    #[error("bad NOFF magic {0:#010x} (expected {NOFF_MAGIC:#010x} in either byte order)")]
    BadMagic(u32),
}

impl Segment {
    #[must_use]
    pub const fn new(virtual_addr: u32, in_file_addr: u32, size: u32) -> Self {
        Self {
            size,
            virtual_addr,
            in_file_addr,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    #[must_use]
    pub const fn virtual_address(&self) -> VirtualAddress {
        VirtualAddress::new(self.virtual_addr)
    }

    /// Every field with its bytes reversed.
    #[must_use]
    pub const fn swapped(self) -> Self {
        Self {
            size: self.size.swap_bytes(),
            virtual_addr: self.virtual_addr.swap_bytes(),
            in_file_addr: self.in_file_addr.swap_bytes(),
        }
    }

    const fn from_words(w: [u32; 3]) -> Self {
        Self::new(w[0], w[1], w[2])
    }

    const fn to_words(self) -> [u32; 3] {
        [self.virtual_addr, self.in_file_addr, self.size]
    }
}

impl NoffHeader {
    #[must_use]
    pub const fn new(code: Segment, init_data: Segment, uninit_data: Segment) -> Self {
        Self {
            code,
            init_data,
            uninit_data,
        }
    }

    /// Decode a header from the first [`NOFF_HEADER_SIZE`] bytes of `bytes`.
    ///
    /// If the magic only matches after a 32-bit byte swap, every field of the
    /// header is swapped as well.
    ///
    /// # Errors
    /// - [`NoffError::TruncatedHeader`] if fewer than [`NOFF_HEADER_SIZE`] bytes are given.
    /// - [`NoffError::BadMagic`] if the magic matches in neither byte order.
    pub fn parse(bytes: &[u8]) -> Result<Self, NoffError> {
        if bytes.len() < NOFF_HEADER_SIZE {
            return Err(NoffError::TruncatedHeader { read: bytes.len() });
        }

        let mut words = [0u32; WORDS];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        let magic = words[0];
        let header = Self::from_words(&words);
        if magic == NOFF_MAGIC {
            return Ok(header);
        }
        if magic.swap_bytes() == NOFF_MAGIC {
            log::debug!("NOFF header stored in foreign byte order, swapping");
            return Ok(header.swapped());
        }
        Err(NoffError::BadMagic(magic))
    }

    /// Read and decode the header at offset 0 of `executable`.
    ///
    /// # Errors
    /// See [`parse`](Self::parse); a short read reports how many bytes arrived.
    pub fn read_from<E: Executable + ?Sized>(executable: &E) -> Result<Self, NoffError> {
        let mut buf = [0u8; NOFF_HEADER_SIZE];
        let read = executable.read_at(&mut buf, 0);
        Self::parse(&buf[..read.min(NOFF_HEADER_SIZE)])
    }

    /// Encode the header, magic included, in the requested byte order.
    #[must_use]
    pub fn to_bytes(&self, order: ByteOrder) -> [u8; NOFF_HEADER_SIZE] {
        let header = match order {
            ByteOrder::Native => *self,
            ByteOrder::Swapped => self.swapped(),
        };
        let magic = match order {
            ByteOrder::Native => NOFF_MAGIC,
            ByteOrder::Swapped => NOFF_MAGIC.swap_bytes(),
        };

        let mut words = [0u32; WORDS];
        words[0] = magic;
        words[1..4].copy_from_slice(&header.code.to_words());
        words[4..7].copy_from_slice(&header.init_data.to_words());
        words[7..10].copy_from_slice(&header.uninit_data.to_words());

        let mut out = [0u8; NOFF_HEADER_SIZE];
        for (chunk, word) in out.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&word.to_ne_bytes());
        }
        out
    }

    /// Every size and address field with its bytes reversed.
    #[must_use]
    pub const fn swapped(self) -> Self {
        Self {
            code: self.code.swapped(),
            init_data: self.init_data.swapped(),
            uninit_data: self.uninit_data.swapped(),
        }
    }

    /// Total bytes of code, initialised and uninitialised data.
    ///
    /// Returns `None` if the sum overflows 32 bits.
    #[must_use]
    pub const fn image_size(&self) -> Option<u32> {
        match self.code.size.checked_add(self.init_data.size) {
            Some(s) => s.checked_add(self.uninit_data.size),
            None => None,
        }
    }

    /// The segments whose bytes are copied out of the image file.
    #[must_use]
    pub const fn loadable_segments(&self) -> [(&'static str, Segment); 2] {
        [("code", self.code), ("data", self.init_data)]
    }

    const fn from_words(w: &[u32; WORDS]) -> Self {
        Self {
            code: Segment::from_words([w[1], w[2], w[3]]),
            init_data: Segment::from_words([w[4], w[5], w[6]]),
            uninit_data: Segment::from_words([w[7], w[8], w[9]]),
        }
    }
}
