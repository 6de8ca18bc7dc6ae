//! Decode-side reconstruction: rebuilds a linked graph from flat records.
//!
//! Reconstruction runs in two phases that cannot be merged, because cyclic
//! graphs are full of forward references:
//!
//! 1. **Instantiation:** every record becomes a [`Person`] with its stored
//!    id, name and timestamp and an *empty* friend list. Duplicate ids are
//!    rejected here.
//! 2. **Linking:** every record's friend ids are resolved against the people
//!    created in phase 1, preserving the stored order. An unresolvable id is
//!    a hard error; no person is ever left with a hole in its friend list.
//!
//! Record order does not matter for correctness, only identity does.

use crate::error::{AmityError, Result};
use crate::format::FlatRecord;
use crate::graph::{Person, PersonId, SocialGraph};
use crate::timestamp;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// A fully linked graph together with its designated root.
///
/// The reconstructed people are new values: only ids, field values and
/// topology carry over from the graph that was encoded.
#[derive(Debug, Clone)]
pub struct Restored {
    root: PersonId,
    root_slot: usize,
    graph: SocialGraph,
}

impl Restored {
    /// The root person.
    pub fn root(&self) -> &Person {
        self.graph.at(self.root_slot)
    }

    /// Id of the root person.
    pub fn root_id(&self) -> PersonId {
        self.root
    }

    /// Every reconstructed person, keyed by id.
    pub fn graph(&self) -> &SocialGraph {
        &self.graph
    }

    /// Looks up any reconstructed person.
    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.graph.get(id)
    }

    /// Number of reconstructed people.
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    /// Returns true if nothing was reconstructed. Never the case for a
    /// successfully built graph, which always contains its root.
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Splits into the root id and the graph.
    pub fn into_parts(self) -> (PersonId, SocialGraph) {
        (self.root, self.graph)
    }
}

/// Two-phase graph reconstruction.
///
/// In strict mode (the default) the builder also enforces the friendship
/// invariants after linking: every edge must be reciprocated and no record
/// may name the same friend twice.
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder {
    strict: bool,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl GraphBuilder {
    /// Creates a strict builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables invariant checks after linking.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Returns true if invariant checks are enabled.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Rebuilds the graph described by `records`, rooted at `root`.
    pub fn build(&self, records: &[FlatRecord], root: PersonId) -> Result<Restored> {
        self.assemble(records, root, |record, born_in| {
            Person::restore(record.id, record.name.clone(), born_in)
        })
    }

    /// Like [`build`](Self::build), but people are created by `factory`.
    ///
    /// The factory receives each record's name and birth timestamp and returns
    /// a bare person shell. The builder then gives the shell the stored id and
    /// fills in its friends; whatever id the factory generated is discarded.
    pub fn build_with<F>(&self, records: &[FlatRecord], root: PersonId, mut factory: F) -> Result<Restored>
    where
        F: FnMut(String, DateTime<Utc>) -> Person,
    {
        self.assemble(records, root, |record, born_in| {
            factory(record.name.clone(), born_in).into_restored(record.id)
        })
    }

    fn assemble<F>(&self, records: &[FlatRecord], root: PersonId, mut make: F) -> Result<Restored>
    where
        F: FnMut(&FlatRecord, DateTime<Utc>) -> Person,
    {
        // Phase 1: instantiate
        let mut graph = SocialGraph::with_capacity(records.len());
        for record in records {
            let born_in = timestamp::parse(&record.born_in).map_err(|e| match e {
                AmityError::Timestamp(msg) => {
                    AmityError::Timestamp(format!("record {}: {msg}", record.id))
                }
                other => other,
            })?;
            graph.insert(make(record, born_in))?;
        }

        let root_slot = graph.slot(root).map_err(|_| AmityError::DanglingReference {
            owner: None,
            missing: root,
        })?;

        // Phase 2: link
        let mut seen = HashSet::new();
        for record in records {
            let slot = graph.slot(record.id)?;
            let mut friends = Vec::with_capacity(record.friends.len());
            seen.clear();

            for &friend in &record.friends {
                if !graph.contains(friend) {
                    return Err(AmityError::DanglingReference {
                        owner: Some(record.id),
                        missing: friend,
                    });
                }
                if !seen.insert(friend) {
                    if self.strict {
                        return Err(AmityError::Malformed(format!(
                            "record {} lists friend {friend} more than once",
                            record.id
                        )));
                    }
                    tracing::warn!(person = %record.id, friend = %friend, "repeated friend entry kept");
                }
                friends.push(friend);
            }

            graph.at_mut(slot).set_friends(friends);
        }

        if self.strict
            && let Some((from, to)) = graph.first_asymmetry()
        {
            return Err(AmityError::AsymmetricFriendship { from, to });
        }

        tracing::debug!(root = %root, people = graph.len(), strict = self.strict, "rebuilt friendship graph");

        Ok(Restored {
            root,
            root_slot,
            graph,
        })
    }
}
