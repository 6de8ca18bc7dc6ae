//! High-level entry points.
//!
//! [`Amity`] covers the common case with default options; [`AmityOptions`]
//! selects the wire format, JSON layout, frame compression and decode
//! strictness. Both only move bytes in and out: traversal lives in
//! [`crate::collector`], reconstruction in [`crate::builder`].
//!
//! ```rust
//! use amity::{Amity, SocialGraph, WireFormat, timestamp};
//!
//! let mut graph = SocialGraph::new();
//! let solo = graph.add_person("Solo", timestamp::date(2000, 1, 1)?);
//!
//! let options = Amity::builder().format(WireFormat::Binary).strict(true);
//! let frame = options.serialize(&graph, solo)?;
//! assert_eq!(options.deserialize(&frame)?.root().name(), "Solo");
//! # Ok::<(), amity::AmityError>(())
//! ```

use crate::builder::{GraphBuilder, Restored};
use crate::codec;
use crate::collector::GraphCollector;
use crate::compression::{CompressorRegistry, NoCompression, PREFERRED_COMPRESSION_ID};
use crate::error::{AmityError, Result};
use crate::format::{Envelope, WireFormat};
use crate::graph::{Person, PersonId, SocialGraph};
use crate::inspector::{GraphInspector, GraphReport};
use crate::io::{MappedFile, write_file};
use chrono::{DateTime, Utc};
use std::io::{Read, Write};
use std::path::Path;

/// The main entry point, using default options.
///
/// Defaults: pretty-printed JSON, no compression, strict decoding.
/// Use [`Amity::builder`] for anything else.
#[derive(Debug)]
pub struct Amity;

impl Amity {
    /// Starts an options builder.
    pub fn builder() -> AmityOptions {
        AmityOptions::default()
    }

    /// Encodes everything reachable from `root` into a byte buffer.
    pub fn serialize(graph: &SocialGraph, root: PersonId) -> Result<Vec<u8>> {
        Self::builder().serialize(graph, root)
    }

    /// Encodes the graph and writes it to `writer`.
    pub fn write<W: Write>(writer: W, graph: &SocialGraph, root: PersonId) -> Result<()> {
        Self::builder().write(writer, graph, root)
    }

    /// Encodes the graph and saves it to a file.
    pub fn save<P: AsRef<Path>>(path: P, graph: &SocialGraph, root: PersonId) -> Result<()> {
        Self::builder().save(path, graph, root)
    }

    /// Decodes a byte buffer into a linked graph.
    pub fn deserialize(bytes: &[u8]) -> Result<Restored> {
        Self::builder().deserialize(bytes)
    }

    /// Decodes a byte buffer, creating each person through `factory`.
    pub fn deserialize_with<F>(bytes: &[u8], factory: F) -> Result<Restored>
    where
        F: FnMut(String, DateTime<Utc>) -> Person,
    {
        Self::builder().deserialize_with(bytes, factory)
    }

    /// Reads a whole container from `reader` and decodes it.
    pub fn read<R: Read>(reader: R) -> Result<Restored> {
        Self::builder().read(reader)
    }

    /// Loads and decodes a container file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Restored> {
        Self::builder().load(path)
    }

    /// Reports on a container without building the graph.
    pub fn inspect_bytes(bytes: &[u8]) -> Result<GraphReport> {
        GraphInspector::inspect_bytes(bytes)
    }
}

/// Configuration for encoding and decoding.
#[derive(Debug, Clone, Copy)]
pub struct AmityOptions {
    format: WireFormat,
    pretty: bool,
    compression: bool,
    strict: bool,
}

impl Default for AmityOptions {
    fn default() -> Self {
        Self {
            format: WireFormat::Json,
            pretty: true,
            compression: false,
            strict: true,
        }
    }
}

impl AmityOptions {
    /// Selects the wire format used for both encoding and decoding.
    pub fn format(mut self, format: WireFormat) -> Self {
        self.format = format;
        self
    }

    /// Pretty-prints JSON output (two-space indentation). Ignored for binary.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Compresses binary frames with LZ4.
    ///
    /// Needs the `lz4_flex` feature; combining it with JSON is a
    /// configuration error.
    pub fn compression(mut self, compression: bool) -> Self {
        self.compression = compression;
        self
    }

    /// Enables the builder's invariant checks when decoding.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Encodes everything reachable from `root` into a byte buffer.
    pub fn serialize(&self, graph: &SocialGraph, root: PersonId) -> Result<Vec<u8>> {
        let objects = GraphCollector::collect(graph, root)?;
        let envelope = Envelope {
            root_id: root,
            objects,
        };
        let bytes = self.encode_envelope(&envelope)?;

        tracing::debug!(
            format = %self.format,
            records = envelope.objects.len(),
            bytes = bytes.len(),
            "encoded friendship graph"
        );
        Ok(bytes)
    }

    /// Encodes the graph and writes it to `writer`.
    pub fn write<W: Write>(&self, mut writer: W, graph: &SocialGraph, root: PersonId) -> Result<()> {
        let bytes = self.serialize(graph, root)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Encodes the graph and saves it to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P, graph: &SocialGraph, root: PersonId) -> Result<()> {
        let bytes = self.serialize(graph, root)?;
        write_file(path.as_ref(), &bytes)
    }

    /// Decodes a byte buffer into a linked graph.
    pub fn deserialize(&self, bytes: &[u8]) -> Result<Restored> {
        let envelope = self.decode_envelope(bytes)?;
        self.graph_builder().build(&envelope.objects, envelope.root_id)
    }

    /// Decodes a byte buffer, creating each person through `factory`.
    pub fn deserialize_with<F>(&self, bytes: &[u8], factory: F) -> Result<Restored>
    where
        F: FnMut(String, DateTime<Utc>) -> Person,
    {
        let envelope = self.decode_envelope(bytes)?;
        self.graph_builder()
            .build_with(&envelope.objects, envelope.root_id, factory)
    }

    /// Reads a whole container from `reader` and decodes it.
    pub fn read<R: Read>(&self, mut reader: R) -> Result<Restored> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.deserialize(&bytes)
    }

    /// Loads and decodes a container file.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Restored> {
        let file = MappedFile::open(path.as_ref())?;
        self.deserialize(&file)
    }

    fn graph_builder(&self) -> GraphBuilder {
        GraphBuilder::new().strict(self.strict)
    }

    fn encode_envelope(&self, envelope: &Envelope) -> Result<Vec<u8>> {
        match self.format {
            WireFormat::Json if self.compression => Err(AmityError::Config(
                "compression requires the binary wire format".into(),
            )),
            WireFormat::Json => codec::encode_json(envelope, self.pretty),
            WireFormat::Binary if self.compression => {
                let registry = CompressorRegistry::new();
                codec::encode_binary(envelope, registry.get(PREFERRED_COMPRESSION_ID)?)
            }
            WireFormat::Binary => codec::encode_binary(envelope, &NoCompression),
        }
    }

    fn decode_envelope(&self, bytes: &[u8]) -> Result<Envelope> {
        let envelope = match self.format {
            WireFormat::Json => codec::decode_json(bytes)?,
            WireFormat::Binary => codec::decode_binary(bytes, &CompressorRegistry::new())?,
        };

        tracing::debug!(
            format = %self.format,
            bytes = bytes.len(),
            records = envelope.objects.len(),
            root = %envelope.root_id,
            "decoded container"
        );
        Ok(envelope)
    }
}
