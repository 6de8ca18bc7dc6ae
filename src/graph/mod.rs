//! In-memory friendship graph.
//!
//! This module defines the `SocialGraph` arena, the `Person` node and the
//! `PersonId` identity key used by every other part of the crate.

/// Defines the `SocialGraph` arena.
pub mod core;
/// Defines the `PersonId` type.
pub mod id;
/// Defines the `Person` node.
pub mod person;

pub use self::core::SocialGraph;
pub use id::PersonId;
pub use person::Person;
