//! Centralized error handling for Amity.
//!
//! Every failure in the library is reported through [`AmityError`]; nothing
//! panics. Encoding and decoding are pure and deterministic, so none of these
//! errors is worth retrying: the same input always fails the same way.
//!
//! ## Error Categories
//!
//! - **I/O Errors** ([`AmityError::Io`]): reading or writing files and streams
//! - **Serialization Errors** ([`AmityError::Serialization`]): turning a container into bytes
//! - **Malformed Input** ([`AmityError::Malformed`]): bytes that are not a valid container
//! - **Timestamp Errors** ([`AmityError::Timestamp`]): unparseable or impossible dates
//! - **Graph Errors** ([`AmityError::DanglingReference`], [`AmityError::DuplicateId`],
//!   [`AmityError::AsymmetricFriendship`], [`AmityError::UnknownPerson`]): the container
//!   parsed, but the graph it describes is inconsistent
//! - **Compression Errors** ([`AmityError::Compression`]): frame payload codecs
//! - **Configuration Errors** ([`AmityError::Config`]): option combinations that cannot work
//!
//! ## Usage Patterns
//!
//! ```rust
//! use amity::{Amity, AmityError};
//!
//! let bytes = br#"{"root_id": "8d4f5a7e-7b43-4b8e-9a8e-1f3a0d9c2b11", "objects": []}"#;
//!
//! match Amity::deserialize(bytes) {
//!     Ok(restored) => println!("root: {}", restored.root().name()),
//!     Err(AmityError::DanglingReference { missing, .. }) => eprintln!("missing {missing}"),
//!     Err(e) => eprintln!("other error: {e}"),
//! }
//! ```

use crate::graph::PersonId;
use std::fmt;
use std::io;
use std::sync::Arc;

/// A specialized `Result` type for Amity operations.
pub type Result<T> = std::result::Result<T, AmityError>;

/// The master error enum covering all failure domains in Amity.
///
/// This type is `Clone`; I/O errors are wrapped in `Arc` for that reason.
#[derive(Debug, Clone)]
pub enum AmityError {
    /// Low-level I/O failure while reading or writing a container.
    Io(Arc<io::Error>),

    /// A container could not be turned into bytes.
    ///
    /// The string carries the message of the underlying encoder.
    Serialization(String),

    /// Decode input is not a valid container of the expected shape.
    ///
    /// Covers invalid JSON, missing required fields, ids that are not UUIDs,
    /// broken binary frames (magic, version, checksum) and, in strict mode,
    /// records that list the same friend twice. No partial graph is returned.
    Malformed(String),

    /// A timestamp could not be parsed or does not exist in the calendar.
    Timestamp(String),

    /// A friend id, or the root id, does not name any record in the container.
    ///
    /// `owner` is the record that holds the reference; it is `None` when the
    /// missing id is the container's `root_id`.
    DanglingReference {
        /// The record whose friend list holds the broken reference.
        owner: Option<PersonId>,
        /// The id that could not be resolved.
        missing: PersonId,
    },

    /// Two records share the same id.
    DuplicateId(PersonId),

    /// `from` lists `to` as a friend, but `to` does not list `from`.
    AsymmetricFriendship {
        /// The person holding the one-sided edge.
        from: PersonId,
        /// The person that does not reciprocate.
        to: PersonId,
    },

    /// An operation named a person that is not part of the graph.
    UnknownPerson(PersonId),

    /// Compression or decompression of a binary frame failed.
    Compression(String),

    /// The requested option combination is not supported.
    Config(String),
}

impl fmt::Display for AmityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O Error: {e}"),
            Self::Serialization(s) => write!(f, "Serialization Error: {s}"),
            Self::Malformed(s) => write!(f, "Malformed Input: {s}"),
            Self::Timestamp(s) => write!(f, "Timestamp Error: {s}"),
            Self::DanglingReference {
                owner: Some(owner),
                missing,
            } => write!(
                f,
                "Dangling Reference: person {owner} lists unknown friend {missing}"
            ),
            Self::DanglingReference {
                owner: None,
                missing,
            } => write!(f, "Dangling Reference: root id {missing} has no record"),
            Self::DuplicateId(id) => write!(f, "Duplicate Id: {id} appears more than once"),
            Self::AsymmetricFriendship { from, to } => write!(
                f,
                "Asymmetric Friendship: {from} lists {to}, but not the other way round"
            ),
            Self::UnknownPerson(id) => write!(f, "Unknown Person: {id}"),
            Self::Compression(s) => write!(f, "Compression Error: {s}"),
            Self::Config(s) => write!(f, "Configuration Error: {s}"),
        }
    }
}

impl std::error::Error for AmityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for AmityError {
    fn from(err: io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}
