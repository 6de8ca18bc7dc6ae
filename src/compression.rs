//! Pluggable compression backend for binary frames.
//!
//! The algorithm id lives in the frame's `MetaByte` (bits 1-3), so a reader
//! can pick the matching decompressor from the [`CompressorRegistry`].
//! JSON output is never compressed.

use crate::error::{AmityError, Result};
use std::borrow::Cow;

/// Interface for compression algorithms.
pub trait Compressor: Send + Sync + std::fmt::Debug {
    /// Returns the unique ID stored in the `MetaByte`.
    /// 0 is reserved for No-Compression.
    fn id(&self) -> u8;

    /// Human-readable algorithm name, used in reports.
    fn name(&self) -> &'static str;

    /// Compresses the data.
    fn compress<'a>(&self, data: &'a [u8]) -> Result<Cow<'a, [u8]>>;

    /// Decompresses the data.
    fn decompress<'a>(&self, data: &'a [u8]) -> Result<Cow<'a, [u8]>>;
}

/// A compressor that performs no compression (pass-through, ID 0).
#[derive(Debug, Clone, Copy)]
pub struct NoCompression;

impl Compressor for NoCompression {
    fn id(&self) -> u8 {
        0
    }

    fn name(&self) -> &'static str {
        "none"
    }

    fn compress<'a>(&self, data: &'a [u8]) -> Result<Cow<'a, [u8]>> {
        Ok(Cow::Borrowed(data))
    }

    fn decompress<'a>(&self, data: &'a [u8]) -> Result<Cow<'a, [u8]>> {
        Ok(Cow::Borrowed(data))
    }
}

/// A compressor using the LZ4 block format with a size prefix (ID 1).
///
/// Available when the `lz4_flex` feature is enabled.
#[cfg(feature = "lz4_flex")]
#[derive(Debug, Clone, Copy)]
pub struct Lz4Compressor;

#[cfg(feature = "lz4_flex")]
impl Compressor for Lz4Compressor {
    fn id(&self) -> u8 {
        1
    }

    fn name(&self) -> &'static str {
        "lz4"
    }

    fn compress<'a>(&self, data: &'a [u8]) -> Result<Cow<'a, [u8]>> {
        Ok(Cow::Owned(lz4_flex::compress_prepend_size(data)))
    }

    /// Size prefixes larger than the block could expand to are rejected
    /// before anything is allocated.
    fn decompress<'a>(&self, data: &'a [u8]) -> Result<Cow<'a, [u8]>> {
        let Some((prefix, block)) = data.split_first_chunk::<4>() else {
            return Err(AmityError::Compression(format!(
                "LZ4 payload is {} bytes, too short for its size prefix",
                data.len()
            )));
        };

        let claimed = u32::from_le_bytes(*prefix) as usize;
        let limit = block
            .len()
            .saturating_mul(LZ4_MAX_EXPANSION)
            .saturating_add(LZ4_MAX_EXPANSION);
        if claimed > limit {
            return Err(AmityError::Compression(format!(
                "LZ4 size prefix claims {claimed} bytes from a {}-byte block",
                block.len()
            )));
        }

        lz4_flex::decompress(block, claimed)
            .map(Cow::Owned)
            .map_err(|e| AmityError::Compression(e.to_string()))
    }
}

// Each LZ4 block byte yields at most 255 output bytes (a match-length extension).
#[cfg(feature = "lz4_flex")]
const LZ4_MAX_EXPANSION: usize = 255;

/// The algorithm ID used when compression is requested.
pub const PREFERRED_COMPRESSION_ID: u8 = 1;

/// Maps algorithm IDs stored in frames to `Compressor` implementations.
#[derive(Debug)]
pub struct CompressorRegistry {
    algorithms: Vec<Option<Box<dyn Compressor>>>,
}

impl CompressorRegistry {
    /// Creates a new registry with default algorithms registered.
    ///
    /// *   ID 0: `NoCompression`
    /// *   ID 1: `Lz4Compressor` (if the `lz4_flex` feature is enabled)
    pub fn new() -> Self {
        let mut reg = Self {
            algorithms: (0..8).map(|_| None).collect(),
        };

        reg.register(Box::new(NoCompression));

        #[cfg(feature = "lz4_flex")]
        reg.register(Box::new(Lz4Compressor));

        reg
    }

    /// Registers a compressor in the slot given by its ID.
    ///
    /// IDs above 7 cannot be stored in a `MetaByte` and are ignored.
    /// An existing compressor with the same ID is replaced.
    pub fn register(&mut self, algo: Box<dyn Compressor>) {
        if let Some(slot) = self.algorithms.get_mut(usize::from(algo.id())) {
            *slot = Some(algo);
        } else {
            tracing::warn!(id = algo.id(), "compressor id does not fit in frame flags");
        }
    }

    /// Retrieves a compressor by its ID.
    ///
    /// # Errors
    /// Returns `AmityError::Compression` if the ID is not registered.
    pub fn get(&self, id: u8) -> Result<&dyn Compressor> {
        self.algorithms
            .get(usize::from(id))
            .and_then(|slot| slot.as_deref())
            .ok_or_else(|| {
                AmityError::Compression(format!(
                    "Algorithm ID {id} is not registered or available"
                ))
            })
    }
}

impl Default for CompressorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
