//! Encode-side traversal: linearizes a friendship graph into flat records.
//!
//! The collector walks the graph depth-first from a root and emits one
//! [`FlatRecord`] per reachable person, in first-visit (pre-order) order.
//! A visited set keyed by [`PersonId`] makes cycles terminate and keeps shared
//! people from being emitted twice.
//!
//! The walk uses an explicit stack. Friends are pushed in reverse so they are
//! popped in insertion order, and a person is marked visited when popped, not
//! when pushed. Together these produce exactly the order of the naive
//! recursive walk without its unbounded native recursion.

use crate::error::{AmityError, Result};
use crate::format::FlatRecord;
use crate::graph::{PersonId, SocialGraph};
use std::collections::HashSet;

/// Depth-first collector over a [`SocialGraph`].
///
/// One collector may visit several roots; people already emitted for an
/// earlier root are not emitted again.
#[derive(Debug)]
pub struct GraphCollector<'g> {
    graph: &'g SocialGraph,
    visited: HashSet<PersonId>,
    records: Vec<FlatRecord>,
    // (person, the person whose friend list led here)
    stack: Vec<(PersonId, Option<PersonId>)>,
}

impl<'g> GraphCollector<'g> {
    /// Creates a collector with an empty visited set.
    pub fn new(graph: &'g SocialGraph) -> Self {
        Self {
            graph,
            visited: HashSet::new(),
            records: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Collects everything reachable from `root` in one call.
    pub fn collect(graph: &'g SocialGraph, root: PersonId) -> Result<Vec<FlatRecord>> {
        let mut collector = Self::new(graph);
        collector.visit(root)?;
        Ok(collector.finish())
    }

    /// Walks the graph from `root`, appending unseen people to the output.
    ///
    /// # Errors
    ///
    /// [`AmityError::UnknownPerson`] if `root` is not in the graph, and
    /// [`AmityError::DanglingReference`] if a friend list names an id that is
    /// not in the graph.
    pub fn visit(&mut self, root: PersonId) -> Result<()> {
        if !self.graph.contains(root) {
            return Err(AmityError::UnknownPerson(root));
        }

        let before = self.records.len();
        self.stack.clear();
        self.stack.push((root, None));

        while let Some((id, via)) = self.stack.pop() {
            if !self.visited.insert(id) {
                continue;
            }

            let person = self.graph.get(id).ok_or(AmityError::DanglingReference {
                owner: via,
                missing: id,
            })?;

            tracing::trace!(person = %id, friends = person.friend_count(), "collecting person");
            self.records.push(FlatRecord::from_person(person));

            for &friend in person.friends().iter().rev() {
                if !self.visited.contains(&friend) {
                    self.stack.push((friend, Some(id)));
                }
            }
        }

        tracing::debug!(
            root = %root,
            collected = self.records.len() - before,
            total = self.records.len(),
            "collected friendship graph"
        );
        Ok(())
    }

    /// Number of people emitted so far.
    pub fn visited_count(&self) -> usize {
        self.records.len()
    }

    /// Returns true if `id` has already been emitted.
    pub fn has_visited(&self, id: PersonId) -> bool {
        self.visited.contains(&id)
    }

    /// Consumes the collector and returns the records in first-visit order.
    pub fn finish(self) -> Vec<FlatRecord> {
        self.records
    }
}
