//! # Dense Page Table
//!
//! The table is a plain vector indexed by virtual page number. It never has
//! holes: entry `i` always describes page `i`, and growth only appends.
//!
//! [`PageTableHandle`] is the shared, lockable form an address space hands to
//! the MMU. Replacing a table (growth) means publishing a **new** handle; an
//! MMU still holding the old one keeps translating against the old table.

use crate::entry::TranslationEntry;
use alloc::sync::Arc;
use alloc::vec::Vec;
use kernel_memory_addresses::VirtualPageNumber;
use spin::{Mutex, MutexGuard};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTable {
    entries: Vec<TranslationEntry>,
}

impl PageTable {
    /// A table of `num_pages` unmapped entries.
    #[must_use]
    pub fn unmapped(num_pages: u32) -> Self {
        let mut table = Self {
            entries: Vec::with_capacity(num_pages as usize),
        };
        for vpn in 0..num_pages {
            table.push(TranslationEntry::unmapped(VirtualPageNumber::new(vpn)));
        }
        table
    }

    /// An empty table with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            entries: Vec::with_capacity(capacity as usize),
        }
    }

    /// Append `entry` as the next page.
    ///
    /// ### Debug assertions
    /// - Asserts that `entry.virtual_page` equals its new index.
    pub fn push(&mut self, entry: TranslationEntry) {
        debug_assert_eq!(entry.virtual_page.as_usize(), self.entries.len());
        self.entries.push(entry);
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, vpn: VirtualPageNumber) -> Option<&TranslationEntry> {
        self.entries.get(vpn.as_usize())
    }

    #[inline]
    pub fn get_mut(&mut self, vpn: VirtualPageNumber) -> Option<&mut TranslationEntry> {
        self.entries.get_mut(vpn.as_usize())
    }

    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[TranslationEntry] {
        &self.entries
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &TranslationEntry> {
        self.entries.iter()
    }
}

/// Shared, lockable page table.
///
/// Clones refer to the same table. Two handles are the same binding only if
/// [`PageTableHandle::ptr_eq`] holds.
#[derive(Debug, Clone)]
pub struct PageTableHandle(Arc<Mutex<PageTable>>);

impl PageTableHandle {
    #[must_use]
    pub fn new(table: PageTable) -> Self {
        Self(Arc::new(Mutex::new(table)))
    }

    #[must_use]
    pub fn lock(&self) -> MutexGuard<'_, PageTable> {
        self.0.lock()
    }

    /// Copy of the current table contents.
    #[must_use]
    pub fn snapshot(&self) -> PageTable {
        self.lock().clone()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
