//! # Amity
//!
//! Lossless serialization of cyclic friendship graphs into flat,
//! self-describing containers.
//!
//! ## Overview
//!
//! A friendship graph is full of cycles: if Ivan is Maria's friend, Maria is
//! Ivan's friend, and any three mutual friends form a triangle. A naive
//! serializer that follows references either recurses forever or copies the
//! same person once per incoming edge. Amity solves this with two algorithms:
//!
//! *   **Collection:** a depth-first walk from a root person that emits each
//!     reachable person exactly once, as a reference-free [`FlatRecord`]
//!     whose friends are listed by id.
//! *   **Reconstruction:** a two-phase rebuild that first creates every
//!     person with an empty friend list, then resolves the stored ids,
//!     restoring every cycle.
//!
//! ## Architecture
//!
//! ### The Graph Model
//!
//! [`SocialGraph`] is an arena of [`Person`]s indexed by [`PersonId`].
//! Edges are ids, not pointers, so cycles cost nothing in ownership terms.
//! Friendship is symmetric and idempotent: [`SocialGraph::add_friend`]
//! writes both directions at once and ignores repeats.
//!
//! ### The Container
//!
//! ```text
//! { "root_id": "<uuid>",
//!   "objects": [ { "id": "<uuid>", "name": "...", "born_in": "1990-05-15T00:00:00Z",
//!                  "friends": ["<uuid>", ...] }, ... ] }
//! ```
//!
//! The same [`Envelope`] can also travel as a checksummed binary frame
//! (see [`format`]), optionally LZ4-compressed with the `lz4_flex` feature.
//!
//! ## Usage
//!
//! ```rust
//! use amity::{Amity, SocialGraph, timestamp};
//!
//! let mut graph = SocialGraph::new();
//! let ivan = graph.add_person("Ivan", timestamp::date(1990, 5, 15)?);
//! let maria = graph.add_person("Maria", timestamp::date(1992, 8, 22)?);
//! let alexey = graph.add_person("Alexey", timestamp::date(1988, 3, 10)?);
//! graph.add_friend(ivan, maria)?;
//! graph.add_friend(maria, alexey)?;
//! graph.add_friend(alexey, ivan)?;
//!
//! let bytes = Amity::serialize(&graph, ivan)?;
//! let restored = Amity::deserialize(&bytes)?;
//!
//! assert_eq!(restored.root().name(), "Ivan");
//! assert_eq!(restored.root().friend_count(), 2);
//! assert_eq!(restored.len(), 3);
//! # Ok::<(), amity::AmityError>(())
//! ```
//!
//! ## Safety and Error Handling
//!
//! * **No Panics:** No `unwrap()` or `panic!()` calls in the library (enforced by clippy lints).
//! * **Fail Fast:** Malformed containers, dangling references and duplicate
//!   ids are reported through [`AmityError`]; no partial graph is returned.
//! * **Bounded Stack:** Traversals use explicit stacks, so deep graphs cannot
//!   overflow the native call stack.
//! * **Encapsulated Unsafe:** the only `unsafe` block memory-maps input files in [`io`].

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

// --- PUBLIC API MODULES ---
pub mod api;
pub mod builder;
pub mod codec;
pub mod collector;
pub mod compression;
pub mod error;
pub mod format;
pub mod graph;
pub mod inspector;
pub mod timestamp;

// --- INTERNAL IMPLEMENTATION MODULES (Hidden from Docs) ---
#[doc(hidden)]
pub mod io;

// --- RE-EXPORTS ---

#[cfg(feature = "lz4_flex")]
pub use compression::Lz4Compressor;
pub use compression::{Compressor, NoCompression};

pub use api::{Amity, AmityOptions};
pub use builder::{GraphBuilder, Restored};
pub use collector::GraphCollector;
pub use error::{AmityError, Result};
pub use format::{Envelope, FlatRecord, WireFormat};
pub use graph::{Person, PersonId, SocialGraph};
pub use inspector::{GraphInspector, GraphReport};

/// Constants used throughout the library.
pub mod constants {
    /// The default buffer size for I/O operations.
    pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;
}
