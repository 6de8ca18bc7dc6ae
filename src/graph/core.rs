use super::id::PersonId;
use super::person::Person;
use crate::{AmityError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// The container for a whole friendship graph.
///
/// Acts as an arena for [`Person`]s: people live in a `Vec` and are found
/// through an id index. Edges are stored as ids, so cycles never turn into
/// ownership cycles.
#[derive(Debug, Clone, Default)]
pub struct SocialGraph {
    people: Vec<Person>,
    index: HashMap<PersonId, usize>,
}

impl SocialGraph {
    /// Creates a new, empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with room for `capacity` people.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            people: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Creates a person with no friends and adds it to the graph.
    ///
    /// Returns the freshly generated id.
    pub fn add_person(&mut self, name: impl Into<String>, born_in: DateTime<Utc>) -> PersonId {
        let person = Person::new(name, born_in);
        let id = person.id();
        self.index.insert(id, self.people.len());
        self.people.push(person);
        id
    }

    /// Inserts an already constructed person, rejecting id collisions.
    pub(crate) fn insert(&mut self, person: Person) -> Result<usize> {
        let id = person.id();
        if self.index.contains_key(&id) {
            return Err(AmityError::DuplicateId(id));
        }
        let slot = self.people.len();
        self.index.insert(id, slot);
        self.people.push(person);
        Ok(slot)
    }

    /// Makes `a` and `b` friends of each other.
    ///
    /// Both directions are written in the same call. Adding an existing
    /// friendship is a no-op. Returns true if a new edge was created.
    ///
    /// # Errors
    ///
    /// Returns [`AmityError::UnknownPerson`] if either id is not in the graph;
    /// the graph is left untouched in that case.
    pub fn add_friend(&mut self, a: PersonId, b: PersonId) -> Result<bool> {
        let a_slot = self.slot(a)?;
        let b_slot = self.slot(b)?;

        let added_forward = self.people[a_slot].link(b);
        let added_backward = self.people[b_slot].link(a);
        Ok(added_forward || added_backward)
    }

    /// Retrieves a person by id.
    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.index.get(&id).and_then(|&slot| self.people.get(slot))
    }

    /// Retrieves a person by id, failing with [`AmityError::UnknownPerson`].
    pub fn person(&self, id: PersonId) -> Result<&Person> {
        self.get(id).ok_or(AmityError::UnknownPerson(id))
    }

    /// Returns the friends of `id` in insertion order.
    pub fn friends_of(&self, id: PersonId) -> Result<Vec<&Person>> {
        let person = self.person(id)?;
        person
            .friends()
            .iter()
            .map(|&friend| {
                self.get(friend).ok_or(AmityError::DanglingReference {
                    owner: Some(id),
                    missing: friend,
                })
            })
            .collect()
    }

    /// Returns the `n`-th friend of `id`, if both exist.
    pub fn friend(&self, id: PersonId, n: usize) -> Option<&Person> {
        let friend_id = *self.get(id)?.friends().get(n)?;
        self.get(friend_id)
    }

    /// Returns true if the graph holds a person with this id.
    pub fn contains(&self, id: PersonId) -> bool {
        self.index.contains_key(&id)
    }

    /// Returns true if the graph has no people.
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Returns the number of people in the graph.
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// Iterates over people in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.people.iter()
    }

    /// Iterates over ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.people.iter().map(Person::id)
    }

    /// Returns true if every friendship is listed on both sides.
    pub fn is_symmetric(&self) -> bool {
        self.first_asymmetry().is_none()
    }

    /// Finds the first edge `from -> to` that is not reciprocated.
    pub(crate) fn first_asymmetry(&self) -> Option<(PersonId, PersonId)> {
        self.people.iter().find_map(|person| {
            person
                .friends()
                .iter()
                .find(|&&friend| {
                    self.get(friend)
                        .is_none_or(|other| !other.is_friend_of(person.id()))
                })
                .map(|&friend| (person.id(), friend))
        })
    }

    pub(crate) fn slot(&self, id: PersonId) -> Result<usize> {
        self.index
            .get(&id)
            .copied()
            .ok_or(AmityError::UnknownPerson(id))
    }

    /// Retrieves a person by arena slot.
    ///
    /// Slots handed out by this graph are always valid.
    pub(crate) fn at(&self, slot: usize) -> &Person {
        &self.people[slot]
    }

    pub(crate) fn at_mut(&mut self, slot: usize) -> &mut Person {
        &mut self.people[slot]
    }
}

impl<'g> IntoIterator for &'g SocialGraph {
    type Item = &'g Person;
    type IntoIter = std::slice::Iter<'g, Person>;

    fn into_iter(self) -> Self::IntoIter {
        self.people.iter()
    }
}
