use kernel_noff::{Executable, FileSystem};
use log::warn;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::PathBuf;

/// Executables resolved relative to a directory of the host file system.
#[derive(Debug, Clone)]
pub struct HostFileSystem {
    root: PathBuf,
}

/// An open host file.
#[derive(Debug)]
pub struct HostFile {
    file: File,
}

impl HostFileSystem {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileSystem for HostFileSystem {
    type File = HostFile;

    fn open(&self, name: &str) -> Option<HostFile> {
        match File::open(self.root.join(name)) {
            Ok(file) => Some(HostFile { file }),
            Err(e) => {
                warn!("cannot open `{name}`: {e}");
                None
            }
        }
    }
}

impl Executable for HostFile {
    fn read_at(&self, buf: &mut [u8], offset: u32) -> usize {
        let mut file = &self.file;
        if let Err(e) = file.seek(SeekFrom::Start(u64::from(offset))) {
            warn!("seek to {offset} failed: {e}");
            return 0;
        }
        let mut done = 0;
        while done < buf.len() {
            match file.read(&mut buf[done..]) {
                Ok(0) => break,
                Ok(n) => done += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    warn!("read at {offset} failed: {e}");
                    break;
                }
            }
        }
        done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_at_offsets_and_stops_at_eof() {
        let dir = std::env::temp_dir().join(format!("vmctl-hostfs-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("img"), [0u8, 1, 2, 3, 4, 5]).unwrap();

        let fs = HostFileSystem::new(&dir);
        let f = fs.open("img").unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(f.read_at(&mut buf, 4), 2);
        assert_eq!(&buf[..2], &[4, 5]);
        assert_eq!(f.read_at(&mut buf, 1), 4);
        assert_eq!(buf, [1, 2, 3, 4]);
        assert!(fs.open("missing").is_none());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
