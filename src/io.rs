//! File I/O at the outer encode/decode boundary.
//!
//! Encoding and decoding themselves never touch the file system; these
//! helpers only move a finished byte buffer to or from disk.

use crate::constants::DEFAULT_BUFFER_SIZE;
use crate::error::{AmityError, Result};
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::Deref;
use std::path::Path;

/// Writes `bytes` to `path`, truncating any existing file.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(())
}

/// A read-only memory map of an encoded container.
#[derive(Debug)]
pub struct MappedFile {
    mmap: Mmap,
}

impl MappedFile {
    /// Maps the file at `path`.
    ///
    /// # Errors
    ///
    /// Fails with [`AmityError::Malformed`] for empty files, which cannot
    /// hold a container.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Err(AmityError::Malformed(format!(
                "{} is empty",
                path.display()
            )));
        }

        // Safety: another process could modify the file while it is mapped.
        // We assume exclusive access, the same trade-off every mmap reader makes.
        #[allow(unsafe_code)]
        let mmap = unsafe { Mmap::map(&file)? };

        Ok(Self { mmap })
    }

    /// The mapped bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.mmap
    }
}

impl Deref for MappedFile {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.mmap
    }
}
