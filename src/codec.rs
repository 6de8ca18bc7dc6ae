//! Byte-level encode/decode of an [`Envelope`].
//!
//! Two interchangeable wire formats satisfy the same contract (ordered list
//! of typed records plus a root marker, exact round trip):
//!
//! * **JSON:** UTF-8 text via `serde_json`, pretty or compact.
//! * **Binary:** a [`FrameHeader`] followed by the bincode-encoded envelope,
//!   optionally compressed, guarded by an xxHash64 checksum.

use crate::compression::{Compressor, CompressorRegistry};
use crate::error::{AmityError, Result};
use crate::format::{Envelope, FRAME_HEADER_SIZE, FrameHeader, MetaByte};
use std::hash::Hasher;
use twox_hash::XxHash64;

/// Encodes an envelope as JSON text.
pub fn encode_json(envelope: &Envelope, pretty: bool) -> Result<Vec<u8>> {
    let encoded = if pretty {
        serde_json::to_vec_pretty(envelope)
    } else {
        serde_json::to_vec(envelope)
    };
    encoded.map_err(|e| AmityError::Serialization(e.to_string()))
}

/// Decodes an envelope from JSON text.
///
/// Missing fields, wrong types and ids that are not UUIDs all surface as
/// [`AmityError::Malformed`].
pub fn decode_json(bytes: &[u8]) -> Result<Envelope> {
    serde_json::from_slice(bytes)
        .map_err(|e| AmityError::Malformed(format!("invalid JSON container: {e}")))
}

/// Encodes an envelope as a binary frame, compressing the payload with `compressor`.
pub fn encode_binary(envelope: &Envelope, compressor: &dyn Compressor) -> Result<Vec<u8>> {
    let raw = bincode::serde::encode_to_vec(envelope, bincode::config::standard())
        .map_err(|e| AmityError::Serialization(e.to_string()))?;
    let payload = compressor.compress(&raw)?;

    let header = FrameHeader::new(MetaByte::new(compressor.id()), checksum(&payload));

    let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());
    frame.extend_from_slice(&header.to_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Decodes an envelope from a binary frame.
pub fn decode_binary(bytes: &[u8], registry: &CompressorRegistry) -> Result<Envelope> {
    let header = FrameHeader::from_bytes(bytes)?;
    let payload = &bytes[FRAME_HEADER_SIZE..];

    let actual = checksum(payload);
    if actual != header.checksum {
        return Err(AmityError::Malformed(format!(
            "checksum mismatch: header says {:#018x}, payload hashes to {actual:#018x}",
            header.checksum
        )));
    }

    let compressor = registry.get(header.meta.compression_method())?;
    let raw = compressor.decompress(payload)?;

    let (envelope, consumed): (Envelope, usize) =
        bincode::serde::decode_from_slice(&raw, bincode::config::standard())
            .map_err(|e| AmityError::Malformed(format!("invalid binary container: {e}")))?;

    if consumed != raw.len() {
        return Err(AmityError::Malformed(format!(
            "{} trailing bytes after binary container",
            raw.len() - consumed
        )));
    }
    Ok(envelope)
}

/// xxHash64 (seed 0) of the stored payload.
pub(crate) fn checksum(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}
