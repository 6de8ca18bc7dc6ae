//! Defines the wire-level shapes of an encoded friendship graph.
//!
//! # Container
//! Whatever the byte syntax, an encoded graph is one [`Envelope`]:
//!
//! ```text
//! { "root_id": "<uuid>", "objects": [ FlatRecord, FlatRecord, ... ] }
//! ```
//!
//! `objects` holds every person reachable from the root exactly once, in
//! first-visit order. Each [`FlatRecord`] is reference-free: friends are
//! listed by id only.
//!
//! # Binary Frame
//! The binary wire format wraps the bincode-encoded envelope in a fixed header:
//!
//! `[ Magic "AMY1" (4) ] [ Version u16 (2) ] [ MetaByte (1) ] [ xxHash64 of payload (8) ] [ Payload ]`

use crate::error::{AmityError, Result};
use crate::graph::{Person, PersonId};
use crate::timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Magic bytes identifying a binary frame: "AMY1".
pub const MAGIC_BYTES: [u8; 4] = *b"AMY1";

/// Version of the binary frame layout.
pub const FRAME_VERSION: u16 = 1;

/// The fixed size of the binary frame header.
/// Magic(4) + Version(2) + MetaByte(1) + Checksum(8) = 15
pub const FRAME_HEADER_SIZE: usize = 15;

/// The reference-free projection of one [`Person`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRecord {
    /// Identity of the person.
    pub id: PersonId,
    /// Free-form name.
    pub name: String,
    /// Canonical timestamp text (see [`crate::timestamp`]).
    pub born_in: String,
    /// Friend ids in the person's insertion order.
    pub friends: Vec<PersonId>,
}

impl FlatRecord {
    /// Projects a person into its flat form.
    pub fn from_person(person: &Person) -> Self {
        Self {
            id: person.id(),
            name: person.name().to_owned(),
            born_in: timestamp::format(&person.born_in()),
            friends: person.friends().to_vec(),
        }
    }
}

/// The complete container: the root marker plus all flat records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Id of the person the graph was collected from.
    pub root_id: PersonId,
    /// Flat records in first-visit order.
    pub objects: Vec<FlatRecord>,
}

/// Byte syntax used for an [`Envelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// UTF-8 JSON text.
    #[default]
    Json,
    /// Checksummed binary frame holding a bincode payload.
    Binary,
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Binary => f.write_str("binary"),
        }
    }
}

/// Configuration flags for a binary frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaByte(u8);

impl MetaByte {
    const COMPRESSION_MASK: u8 = 0b0000_1110; // Bits 1-3
    const RESERVED_MASK: u8 = !Self::COMPRESSION_MASK;

    /// Creates a new MetaByte for the given compression algorithm.
    pub fn new(compression_id: u8) -> Self {
        Self((compression_id & 0x07) << 1)
    }

    /// Decodes the byte, rejecting reserved bits.
    pub fn from_byte(byte: u8) -> Result<Self> {
        if byte & Self::RESERVED_MASK != 0 {
            return Err(AmityError::Malformed(format!(
                "reserved bits set in frame flags: {byte:#010b}"
            )));
        }
        Ok(Self(byte))
    }

    /// Returns the compression algorithm ID (0-7).
    pub fn compression_method(&self) -> u8 {
        (self.0 & Self::COMPRESSION_MASK) >> 1
    }

    /// Returns the raw byte representation.
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

/// The header at the start of every binary frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Layout version.
    pub version: u16,
    /// Flags (compression algorithm).
    pub meta: MetaByte,
    /// xxHash64 of the payload as stored (after compression).
    pub checksum: u64,
}

impl FrameHeader {
    /// Creates a header for the current layout version.
    pub fn new(meta: MetaByte, checksum: u64) -> Self {
        Self {
            version: FRAME_VERSION,
            meta,
            checksum,
        }
    }

    /// Serializes the header to bytes.
    pub fn to_bytes(&self) -> [u8; FRAME_HEADER_SIZE] {
        let mut buf = [0u8; FRAME_HEADER_SIZE];
        buf[0..4].copy_from_slice(&MAGIC_BYTES);
        buf[4..6].copy_from_slice(&self.version.to_le_bytes());
        buf[6] = self.meta.as_u8();
        buf[7..15].copy_from_slice(&self.checksum.to_le_bytes());
        buf
    }

    /// Parses and validates the header at the start of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let Some(header) = bytes.get(..FRAME_HEADER_SIZE) else {
            return Err(AmityError::Malformed(format!(
                "binary frame is {} bytes, smaller than its {FRAME_HEADER_SIZE}-byte header",
                bytes.len()
            )));
        };

        if header[0..4] != MAGIC_BYTES {
            return Err(AmityError::Malformed("invalid magic bytes".into()));
        }

        let version = u16::from_le_bytes([header[4], header[5]]);
        if version != FRAME_VERSION {
            return Err(AmityError::Malformed(format!(
                "unsupported frame version: {version}"
            )));
        }

        let meta = MetaByte::from_byte(header[6])?;
        let mut checksum = [0u8; 8];
        checksum.copy_from_slice(&header[7..15]);

        Ok(Self {
            version,
            meta,
            checksum: u64::from_le_bytes(checksum),
        })
    }
}

/// Returns true if `bytes` starts with the binary frame magic.
pub fn is_binary_frame(bytes: &[u8]) -> bool {
    bytes.starts_with(&MAGIC_BYTES)
}
