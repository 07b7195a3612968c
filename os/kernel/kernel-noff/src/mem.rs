//! # In-Memory File System
//!
//! A [`FileSystem`] backed by byte buffers. Handles share the underlying
//! bytes, so reopening a file is cheap and every handle sees the same data.

use crate::{Executable, FileSystem};
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

/// An open handle onto an in-memory file.
#[derive(Clone, Debug)]
pub struct MemFile {
    bytes: Arc<[u8]>,
}

/// Name-indexed collection of in-memory files.
#[derive(Clone, Debug, Default)]
pub struct MemFileSystem {
    files: BTreeMap<String, Arc<[u8]>>,
}

impl MemFile {
    #[must_use]
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Executable for MemFile {
    fn read_at(&self, buf: &mut [u8], offset: u32) -> usize {
        let Some(tail) = self.bytes.get(offset as usize..) else {
            return 0;
        };
        let n = buf.len().min(tail.len());
        buf[..n].copy_from_slice(&tail[..n]);
        n
    }
}

impl MemFileSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace `name`.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        let bytes: Vec<u8> = bytes.into();
        self.files.insert(name.into(), Arc::from(bytes));
    }

    /// Remove `name`; existing handles keep their bytes.
    pub fn remove(&mut self, name: &str) -> bool {
        self.files.remove(name).is_some()
    }
}

impl FileSystem for MemFileSystem {
    type File = MemFile;

    fn open(&self, name: &str) -> Option<MemFile> {
        self.files.get(name).map(|bytes| MemFile {
            bytes: Arc::clone(bytes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positioned_reads_clip_at_eof() {
        let f = MemFile::new(alloc::vec![1u8, 2, 3, 4, 5]);
        let mut buf = [0u8; 4];
        assert_eq!(f.read_at(&mut buf, 3), 2);
        assert_eq!(&buf[..2], &[4, 5]);
        assert_eq!(f.read_at(&mut buf, 5), 0);
        assert_eq!(f.read_at(&mut buf, 1000), 0);
    }

    #[test]
    fn reopen_yields_independent_handles_on_same_bytes() {
        let mut fs = MemFileSystem::new();
        fs.insert("halt", alloc::vec![9u8; 8]);
        let a = fs.open("halt").unwrap();
        let b = fs.open("halt").unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(a.read_at(&mut buf, 0), 8);
        assert_eq!(b.read_at(&mut buf, 4), 4);
        assert!(fs.open("missing").is_none());
    }

    #[test]
    fn removed_files_stay_readable_through_open_handles() {
        let mut fs = MemFileSystem::new();
        fs.insert("sort", alloc::vec![7u8; 3]);
        let handle = fs.open("sort").unwrap();
        assert!(fs.remove("sort"));
        assert!(fs.open("sort").is_none());
        assert_eq!(handle.len(), 3);
    }
}
