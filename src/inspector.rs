//! Tools for inspecting encoded containers.
//! Useful for diagnosing broken inputs: the inspector never builds a graph and
//! never fails on graph-level problems, it only reports them.

use crate::codec;
use crate::compression::CompressorRegistry;
use crate::error::Result;
use crate::format::{Envelope, FlatRecord, FrameHeader, WireFormat, is_binary_frame};
use crate::graph::PersonId;
use crate::io::MappedFile;
use crate::timestamp;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Layout lines deeper than this are counted, not drawn.
pub const MAX_RENDERED_DEPTH: usize = 64;

/// A structural report of an encoded container.
#[derive(Debug, Serialize)]
pub struct GraphReport {
    /// Detected wire format.
    pub format: WireFormat,
    /// Size of the input in bytes.
    pub byte_len: usize,
    /// Compression algorithm of a binary frame ("none" for JSON).
    pub compression_algo: String,
    /// The container's root marker.
    pub root_id: PersonId,
    /// Whether some record carries the root id.
    pub root_present: bool,
    /// Number of records, duplicates included.
    pub record_count: usize,
    /// Distinct friendships (unordered pairs) between known records.
    pub friendship_count: usize,
    /// Total friend-list entries across all records.
    pub link_count: usize,
    /// Records that cannot be reached from the root.
    pub unreachable: Vec<PersonId>,
    /// Friend entries naming ids without a record.
    pub dangling: Vec<Link>,
    /// Ids carried by more than one record.
    pub duplicate_ids: Vec<PersonId>,
    /// Friend entries that are not reciprocated.
    pub one_sided: Vec<Link>,
    /// Friend entries listed more than once by the same record.
    pub repeated_friends: Vec<Link>,
    /// Records whose `born_in` text does not parse.
    pub bad_timestamps: Vec<PersonId>,
    /// Spanning tree from the root, in first-visit order.
    pub layout: Vec<LayoutEntry>,
}

/// A directed friend-list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Owner of the friend list.
    pub from: PersonId,
    /// The listed friend.
    pub to: PersonId,
}

/// One line of the spanning-tree layout.
#[derive(Debug, Serialize)]
pub struct LayoutEntry {
    /// Distance from the root along tree edges.
    pub depth: usize,
    /// Person id.
    pub id: PersonId,
    /// Person name.
    pub name: String,
    /// Timestamp text as stored.
    pub born_in: String,
    /// Length of the friend list.
    pub friend_count: usize,
    /// Friends that were already reached through another path.
    pub back_links: usize,
    /// Whether this is the last child of its tree parent.
    pub is_last: bool,
}

impl GraphReport {
    /// Returns true if the container would decode in strict mode.
    pub fn is_consistent(&self) -> bool {
        self.root_present
            && self.dangling.is_empty()
            && self.duplicate_ids.is_empty()
            && self.one_sided.is_empty()
            && self.repeated_friends.is_empty()
            && self.bad_timestamps.is_empty()
    }
}

/// The Amity Inspector tool.
#[derive(Debug)]
pub struct GraphInspector;

impl GraphInspector {
    /// Analyzes an encoded container.
    ///
    /// Binary frames are recognised by their magic bytes; anything else is
    /// treated as JSON.
    ///
    /// # Errors
    ///
    /// Only container-level problems (unparseable bytes, bad frame) fail.
    pub fn inspect_bytes(bytes: &[u8]) -> Result<GraphReport> {
        let registry = CompressorRegistry::new();
        let (format, compression_algo, envelope) = if is_binary_frame(bytes) {
            let header = FrameHeader::from_bytes(bytes)?;
            let algo = registry.get(header.meta.compression_method())?.name();
            let envelope = codec::decode_binary(bytes, &registry)?;
            (WireFormat::Binary, algo.to_string(), envelope)
        } else {
            (WireFormat::Json, "none".to_string(), codec::decode_json(bytes)?)
        };

        Ok(Self::analyze(format, bytes.len(), compression_algo, &envelope))
    }

    /// Analyzes a container file.
    pub fn inspect_file<P: AsRef<Path>>(path: P) -> Result<GraphReport> {
        let file = MappedFile::open(path.as_ref())?;
        Self::inspect_bytes(&file)
    }

    fn analyze(
        format: WireFormat,
        byte_len: usize,
        compression_algo: String,
        envelope: &Envelope,
    ) -> GraphReport {
        let records = &envelope.objects;

        // First occurrence wins; later ones are reported as duplicates.
        let mut index: HashMap<PersonId, usize> = HashMap::with_capacity(records.len());
        let mut duplicate_ids = Vec::new();
        for (i, record) in records.iter().enumerate() {
            if index.contains_key(&record.id) {
                duplicate_ids.push(record.id);
            } else {
                index.insert(record.id, i);
            }
        }

        let bad_timestamps = records
            .iter()
            .filter(|record| timestamp::parse(&record.born_in).is_err())
            .map(|record| record.id)
            .collect();

        let mut directed: HashSet<(PersonId, PersonId)> = HashSet::new();
        let mut dangling = Vec::new();
        let mut repeated_friends = Vec::new();
        let mut seen = HashSet::new();
        let mut link_count = 0;
        for record in records {
            link_count += record.friends.len();
            seen.clear();
            for &friend in &record.friends {
                if !seen.insert(friend) {
                    repeated_friends.push(Link {
                        from: record.id,
                        to: friend,
                    });
                    continue;
                }
                if index.contains_key(&friend) {
                    directed.insert((record.id, friend));
                } else {
                    dangling.push(Link {
                        from: record.id,
                        to: friend,
                    });
                }
            }
        }

        let mut one_sided = Vec::new();
        let mut reported = HashSet::new();
        let mut pairs = HashSet::new();
        for record in records {
            for &friend in &record.friends {
                if !directed.contains(&(record.id, friend)) {
                    continue;
                }
                pairs.insert((record.id.min(friend), record.id.max(friend)));
                if !directed.contains(&(friend, record.id)) && reported.insert((record.id, friend)) {
                    one_sided.push(Link {
                        from: record.id,
                        to: friend,
                    });
                }
            }
        }

        let root_slot = index.get(&envelope.root_id).copied();
        let tree = root_slot.map(|root| SpanningTree::build(records, &index, root));

        let unreachable = records
            .iter()
            .enumerate()
            .filter(|(i, record)| index.get(&record.id) == Some(i))
            .filter(|(i, _)| tree.as_ref().is_none_or(|t| !t.visited[*i]))
            .map(|(_, record)| record.id)
            .collect();

        let layout = match (root_slot, &tree) {
            (Some(root), Some(tree)) => tree.layout(records, &index, root),
            _ => Vec::new(),
        };

        GraphReport {
            format,
            byte_len,
            compression_algo,
            root_id: envelope.root_id,
            root_present: root_slot.is_some(),
            record_count: records.len(),
            friendship_count: pairs.len(),
            link_count,
            unreachable,
            dangling,
            duplicate_ids,
            one_sided,
            repeated_friends,
            bad_timestamps,
            layout,
        }
    }
}

/// Tree edges discovered by a first-visit walk over record slots.
struct SpanningTree {
    visited: Vec<bool>,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
}

impl SpanningTree {
    fn build(records: &[FlatRecord], index: &HashMap<PersonId, usize>, root: usize) -> Self {
        let mut tree = Self {
            visited: vec![false; records.len()],
            parent: vec![None; records.len()],
            children: vec![Vec::new(); records.len()],
        };

        let mut stack = vec![(root, None)];
        while let Some((slot, via)) = stack.pop() {
            if tree.visited[slot] {
                continue;
            }
            tree.visited[slot] = true;
            if let Some(parent) = via {
                tree.parent[slot] = Some(parent);
                tree.children[parent].push(slot);
            }

            for friend in records[slot].friends.iter().rev() {
                if let Some(&next) = index.get(friend)
                    && !tree.visited[next]
                {
                    stack.push((next, Some(slot)));
                }
            }
        }
        tree
    }

    fn layout(
        &self,
        records: &[FlatRecord],
        index: &HashMap<PersonId, usize>,
        root: usize,
    ) -> Vec<LayoutEntry> {
        let mut entries = Vec::new();
        let mut stack = vec![(root, 0usize, true)];

        while let Some((slot, depth, is_last)) = stack.pop() {
            let record = &records[slot];
            let resolved = record
                .friends
                .iter()
                .filter(|f| index.contains_key(f))
                .count();
            let tree_edges = self.children[slot].len() + usize::from(self.parent[slot].is_some());

            let last = self.children[slot].len().saturating_sub(1);
            for (k, &child) in self.children[slot].iter().enumerate().rev() {
                stack.push((child, depth + 1, k == last));
            }

            entries.push(LayoutEntry {
                depth,
                id: record.id,
                name: record.name.clone(),
                born_in: record.born_in.clone(),
                friend_count: record.friends.len(),
                back_links: resolved.saturating_sub(tree_edges),
                is_last,
            });
        }
        entries
    }
}

impl std::fmt::Display for GraphReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== AMITY GRAPH REPORT ===")?;
        writeln!(
            f,
            "Format:       {} ({} bytes, compression: {})",
            self.format, self.byte_len, self.compression_algo
        )?;
        writeln!(
            f,
            "Root:         {}{}",
            self.root_id,
            if self.root_present { "" } else { " (missing)" }
        )?;
        writeln!(f, "Records:      {}", self.record_count)?;
        writeln!(
            f,
            "Friendships:  {} ({} links)",
            self.friendship_count, self.link_count
        )?;
        writeln!(f, "Unreachable:  {}", self.unreachable.len())?;

        if self.is_consistent() {
            writeln!(f, "Issues:       none")?;
        } else {
            writeln!(f, "Issues:")?;
            for link in &self.dangling {
                writeln!(f, "  dangling   {} -> {}", link.from, link.to)?;
            }
            for id in &self.duplicate_ids {
                writeln!(f, "  duplicate  {id}")?;
            }
            for link in &self.one_sided {
                writeln!(f, "  one-sided  {} -> {}", link.from, link.to)?;
            }
            for link in &self.repeated_friends {
                writeln!(f, "  repeated   {} -> {}", link.from, link.to)?;
            }
            for id in &self.bad_timestamps {
                writeln!(f, "  bad date   {id}")?;
            }
        }

        writeln!(f, "\n[GRAPH LAYOUT]")?;
        // is_last of each drawn ancestor, indexed by depth
        let mut open: Vec<bool> = Vec::new();
        let mut omitted = 0usize;
        for entry in &self.layout {
            if entry.depth > MAX_RENDERED_DEPTH {
                omitted += 1;
                continue;
            }
            open.truncate(entry.depth);
            let prefix: String = open
                .iter()
                .map(|&last| if last { "    " } else { "│   " })
                .collect();
            open.push(entry.is_last);

            let connector = if entry.is_last { "└── " } else { "├── " };
            let back = if entry.back_links > 0 {
                format!(" | Back-links: {}", entry.back_links)
            } else {
                String::new()
            };
            writeln!(
                f,
                "{}{}{} ({}) | Friends: {}{}",
                prefix, connector, entry.name, entry.born_in, entry.friend_count, back
            )?;
        }
        if omitted > 0 {
            writeln!(
                f,
                "... {omitted} entries deeper than {MAX_RENDERED_DEPTH} levels not shown"
            )?;
        }
        Ok(())
    }
}
