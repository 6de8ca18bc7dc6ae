#![allow(missing_docs)]

use amity::{Amity, Envelope, PersonId, SocialGraph, WireFormat};
use chrono::{DateTime, Utc};
use proptest::prelude::*;
use std::collections::{HashSet, VecDeque};

/// A random friendship graph plus the edges used to build it.
#[derive(Debug, Clone)]
struct Scenario {
    people: Vec<(String, i64, u32)>,
    edges: Vec<(usize, usize)>,
    root: usize,
}

/// Seconds since the epoch: mostly ordinary birth dates, sometimes anywhere in
/// chrono's range, including signed and five-digit years.
fn born_secs() -> impl Strategy<Value = i64> {
    let min = DateTime::<Utc>::MIN_UTC.timestamp();
    let max = DateTime::<Utc>::MAX_UTC.timestamp();
    prop_oneof![
        3 => -2_000_000_000i64..4_000_000_000i64,
        1 => min..max,
        1 => -70_000_000_000i64..-62_167_219_200i64,
        1 => 253_402_300_800i64..260_000_000_000i64,
    ]
}

fn scenario() -> impl Strategy<Value = Scenario> {
    (1usize..30).prop_flat_map(|n| {
        (
            prop::collection::vec(("\\PC{0,12}", born_secs(), 0u32..1_000_000_000u32), n),
            prop::collection::vec((0..n, 0..n), 0..n * 3),
            0..n,
        )
            .prop_map(|(people, edges, root)| Scenario {
                people,
                edges,
                root,
            })
    })
}

fn build(scenario: &Scenario) -> (SocialGraph, Vec<PersonId>) {
    let mut graph = SocialGraph::new();
    let ids: Vec<PersonId> = scenario
        .people
        .iter()
        .map(|(name, secs, nanos)| {
            let born = DateTime::from_timestamp(*secs, *nanos).expect("in range");
            graph.add_person(name.clone(), born)
        })
        .collect();
    for &(a, b) in &scenario.edges {
        graph.add_friend(ids[a], ids[b]).expect("both people exist");
    }
    (graph, ids)
}

/// Independent breadth-first reachability, for comparison with the collector.
fn reachable(graph: &SocialGraph, root: PersonId) -> HashSet<PersonId> {
    let mut seen = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);
    while let Some(id) = queue.pop_front() {
        for &friend in graph.get(id).expect("known id").friends() {
            if seen.insert(friend) {
                queue.push_back(friend);
            }
        }
    }
    seen
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_each_reachable_person_encoded_once(s in scenario()) {
        let (graph, ids) = build(&s);
        let root = ids[s.root];
        let bytes = Amity::serialize(&graph, root).expect("encode");
        let envelope: Envelope = serde_json::from_slice(&bytes).expect("valid JSON");

        let encoded: Vec<PersonId> = envelope.objects.iter().map(|r| r.id).collect();
        let unique: HashSet<PersonId> = encoded.iter().copied().collect();

        prop_assert_eq!(encoded.len(), unique.len());
        prop_assert_eq!(unique, reachable(&graph, root));
        prop_assert_eq!(encoded[0], root);
    }

    #[test]
    fn prop_round_trip_preserves_people_and_topology(s in scenario()) {
        let (graph, ids) = build(&s);
        let root = ids[s.root];

        for format in [WireFormat::Json, WireFormat::Binary] {
            let options = Amity::builder().format(format);
            let bytes = options.serialize(&graph, root).expect("encode");
            let restored = options.deserialize(&bytes).expect("decode");

            prop_assert_eq!(restored.root_id(), root);
            prop_assert_eq!(restored.len(), reachable(&graph, root).len());
            prop_assert!(restored.graph().is_symmetric());

            for copy in restored.graph() {
                let original = graph.get(copy.id()).expect("restored ids exist in source");
                prop_assert_eq!(copy.name(), original.name());
                prop_assert_eq!(copy.born_in(), original.born_in());
                prop_assert_eq!(copy.friends(), original.friends());
            }
        }
    }

    #[test]
    fn prop_encoding_is_deterministic(s in scenario()) {
        let (graph, ids) = build(&s);
        let root = ids[s.root];

        let first = Amity::serialize(&graph, root).expect("encode");
        let second = Amity::serialize(&graph, root).expect("encode");
        prop_assert_eq!(&first, &second);

        // Re-encoding the restored graph gives the same bytes again.
        let restored = Amity::deserialize(&first).expect("decode");
        let third = Amity::serialize(restored.graph(), root).expect("encode");
        prop_assert_eq!(first, third);
    }

    #[test]
    fn prop_add_friend_is_idempotent(s in scenario()) {
        let (mut graph, ids) = build(&s);
        let before: Vec<Vec<PersonId>> = graph.iter().map(|p| p.friends().to_vec()).collect();

        for &(a, b) in &s.edges {
            prop_assert!(!graph.add_friend(ids[b], ids[a]).expect("both people exist"));
        }

        let after: Vec<Vec<PersonId>> = graph.iter().map(|p| p.friends().to_vec()).collect();
        prop_assert_eq!(before, after);
        prop_assert!(graph.is_symmetric());
    }
}
