//! # Translation Entries
//!
//! One [`TranslationEntry`] maps one virtual page. The status bits live in a
//! packed [`EntryFlags`] byte:
//!
//! | Bit | Name        | Meaning |
//! |-----|-------------|---------|
//! | 0   | `valid`     | The page is bound to `physical_page`; clear means a fault on access |
//! | 1   | `used`      | Set by the MMU on every successful translation |
//! | 2   | `dirty`     | Set by the MMU on a successful write |
//! | 3   | `read_only` | Writes raise a read-only exception |
//! | 4   | `shared`    | The frame is aliased across address spaces and is never duplicated by fork |
//! | 5–7 | reserved    | Zero |

use bitfield_struct::bitfield;
use kernel_memory_addresses::{FrameNumber, VirtualPageNumber};

#[bitfield(u8)]
#[derive(Eq, PartialEq)]
pub struct EntryFlags {
    pub valid: bool,
    pub used: bool,
    pub dirty: bool,
    pub read_only: bool,
    pub shared: bool,
    #[bits(3)]
    __: u8,
}

/// Mapping record for one virtual page.
///
/// Invariant: when `flags.valid()` is set, `physical_page` is `Some`. A
/// private frame appears in at most one entry across all address spaces;
/// frames of entries with `flags.shared()` set are the only exception.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    /// Always equal to the entry's index in its table.
    pub virtual_page: VirtualPageNumber,
    /// `None` while the page has never been bound to a frame.
    pub physical_page: Option<FrameNumber>,
    pub flags: EntryFlags,
}

impl TranslationEntry {
    /// An invalid entry with no frame.
    #[must_use]
    pub const fn unmapped(virtual_page: VirtualPageNumber) -> Self {
        Self {
            virtual_page,
            physical_page: None,
            flags: EntryFlags::new(),
        }
    }

    /// A valid, writable, unused and clean entry bound to `frame`.
    #[must_use]
    pub const fn mapped(virtual_page: VirtualPageNumber, frame: FrameNumber) -> Self {
        Self {
            virtual_page,
            physical_page: Some(frame),
            flags: EntryFlags::new().with_valid(true),
        }
    }

    /// A valid, writable, shared entry bound to `frame`.
    #[must_use]
    pub const fn shared(virtual_page: VirtualPageNumber, frame: FrameNumber) -> Self {
        Self {
            virtual_page,
            physical_page: Some(frame),
            flags: EntryFlags::new().with_valid(true).with_shared(true),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.flags.valid()
    }

    #[inline]
    #[must_use]
    pub const fn is_shared(&self) -> bool {
        self.flags.shared()
    }

    /// The bound frame, if the entry is valid.
    #[inline]
    #[must_use]
    pub const fn frame(&self) -> Option<FrameNumber> {
        if self.flags.valid() {
            self.physical_page
        } else {
            None
        }
    }

    /// Whether fork must give the child its own copy of this page.
    #[inline]
    #[must_use]
    pub const fn is_private_mapping(&self) -> bool {
        self.flags.valid() && !self.flags.shared()
    }

    /// Bind the entry to `frame`, marking it valid, unused and clean.
    pub const fn bind(&mut self, frame: FrameNumber) {
        self.physical_page = Some(frame);
        self.flags = self
            .flags
            .with_valid(true)
            .with_used(false)
            .with_dirty(false);
    }
}
