use super::id::PersonId;
use chrono::{DateTime, Utc};

/// A participant in the friendship graph.
///
/// Fields are private. The public constructor always produces a fresh id and
/// an empty friend list; friendships are added through
/// [`SocialGraph::add_friend`](super::SocialGraph::add_friend) so that both
/// directions are written together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    id: PersonId,
    name: String,
    born_in: DateTime<Utc>,
    friends: Vec<PersonId>,
}

impl Person {
    /// Creates a standalone person with a freshly generated id.
    pub fn new(name: impl Into<String>, born_in: DateTime<Utc>) -> Self {
        Self {
            id: PersonId::generate(),
            name: name.into(),
            born_in,
            friends: Vec::new(),
        }
    }

    /// Raw construction path used while rebuilding a graph.
    ///
    /// Accepts a stored id; the friend list starts empty and is filled in by
    /// the linking phase.
    pub(crate) fn restore(id: PersonId, name: String, born_in: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            born_in,
            friends: Vec::new(),
        }
    }

    /// Turns a caller-provided shell into a restored person carrying `id`.
    pub(crate) fn into_restored(self, id: PersonId) -> Self {
        Self {
            id,
            name: self.name,
            born_in: self.born_in,
            friends: Vec::new(),
        }
    }

    /// The person's identity.
    pub fn id(&self) -> PersonId {
        self.id
    }

    /// The free-form name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Date of birth.
    pub fn born_in(&self) -> DateTime<Utc> {
        self.born_in
    }

    /// Friend ids in insertion order.
    pub fn friends(&self) -> &[PersonId] {
        &self.friends
    }

    /// Number of friends.
    pub fn friend_count(&self) -> usize {
        self.friends.len()
    }

    /// Returns true if `other` is in this person's friend list.
    pub fn is_friend_of(&self, other: PersonId) -> bool {
        self.friends.contains(&other)
    }

    /// Appends `friend` unless it is already present. Returns true if added.
    pub(crate) fn link(&mut self, friend: PersonId) -> bool {
        if self.friends.contains(&friend) {
            return false;
        }
        self.friends.push(friend);
        true
    }

    pub(crate) fn set_friends(&mut self, friends: Vec<PersonId>) {
        self.friends = friends;
    }
}
