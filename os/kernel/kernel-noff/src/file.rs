/// An open executable supporting positioned reads.
pub trait Executable {
    /// Read up to `buf.len()` bytes starting at file offset `offset`.
    ///
    /// Returns the number of bytes read, which is short (possibly zero) when
    /// the read runs past the end of the file.
    fn read_at(&self, buf: &mut [u8], offset: u32) -> usize;
}

/// Opens executables by name.
///
/// Independent handles to the same file must be obtainable at any time; the
/// address-space code reopens images for fork and for every demand fault.
pub trait FileSystem {
    type File: Executable;

    /// Open `name`, or return `None` if it does not exist.
    fn open(&self, name: &str) -> Option<Self::File>;
}

impl<E: Executable + ?Sized> Executable for &E {
    fn read_at(&self, buf: &mut [u8], offset: u32) -> usize {
        (**self).read_at(buf, offset)
    }
}
