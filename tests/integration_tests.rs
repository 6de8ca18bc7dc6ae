#![allow(missing_docs)]

use amity::{Amity, AmityError, Envelope, PersonId, Result, SocialGraph, WireFormat, timestamp};

const ID_A: &str = "11111111-1111-4111-8111-111111111111";
const ID_B: &str = "22222222-2222-4222-8222-222222222222";
const ID_C: &str = "33333333-3333-4333-8333-333333333333";

struct Triangle {
    graph: SocialGraph,
    ivan: PersonId,
    maria: PersonId,
    alexey: PersonId,
}

fn triangle() -> Result<Triangle> {
    let mut graph = SocialGraph::new();
    let ivan = graph.add_person("Ivan", timestamp::date(1990, 5, 15)?);
    let maria = graph.add_person("Maria", timestamp::date(1992, 8, 22)?);
    let alexey = graph.add_person("Alexey", timestamp::date(1988, 3, 10)?);

    graph.add_friend(ivan, maria)?;
    graph.add_friend(maria, alexey)?;
    graph.add_friend(alexey, ivan)?;

    Ok(Triangle {
        graph,
        ivan,
        maria,
        alexey,
    })
}

fn record(id: &str, name: &str, friends: &[&str]) -> String {
    let friends: Vec<String> = friends.iter().map(|f| format!("\"{f}\"")).collect();
    format!(
        r#"{{"id": "{id}", "name": "{name}", "born_in": "1990-05-15T00:00:00Z", "friends": [{}]}}"#,
        friends.join(", ")
    )
}

fn container(root: &str, records: &[String]) -> Vec<u8> {
    format!(r#"{{"root_id": "{root}", "objects": [{}]}}"#, records.join(", ")).into_bytes()
}

// --- ENCODING ---

#[test]
fn test_triangle_encodes_each_person_once() -> Result<()> {
    let t = triangle()?;
    let bytes = Amity::serialize(&t.graph, t.ivan)?;

    let envelope: Envelope = serde_json::from_slice(&bytes).expect("valid JSON container");
    assert_eq!(envelope.root_id, t.ivan);
    assert_eq!(envelope.objects.len(), 3);
    assert!(envelope.objects.iter().all(|r| r.friends.len() == 2));

    let order: Vec<PersonId> = envelope.objects.iter().map(|r| r.id).collect();
    assert_eq!(order, vec![t.ivan, t.maria, t.alexey]);
    Ok(())
}

#[test]
fn test_mutual_pair_terminates() -> Result<()> {
    let mut graph = SocialGraph::new();
    let a = graph.add_person("A", timestamp::date(2000, 1, 1)?);
    let b = graph.add_person("B", timestamp::date(2001, 1, 1)?);
    graph.add_friend(a, b)?;

    let bytes = Amity::serialize(&graph, b)?;
    let envelope: Envelope = serde_json::from_slice(&bytes).expect("valid JSON container");

    assert_eq!(envelope.objects.len(), 2);
    assert_eq!(envelope.objects[0].id, b);
    assert_eq!(envelope.objects[0].friends, vec![a]);
    assert_eq!(envelope.objects[1].friends, vec![b]);
    Ok(())
}

#[test]
fn test_only_reachable_people_are_encoded() -> Result<()> {
    let mut graph = SocialGraph::new();
    let born = timestamp::date(1995, 6, 1)?;
    let a = graph.add_person("A", born);
    let b = graph.add_person("B", born);
    let c = graph.add_person("C", born);
    let d = graph.add_person("D", born);
    let loner = graph.add_person("Loner", born);

    // Diamond: D is reachable through both B and C.
    graph.add_friend(a, b)?;
    graph.add_friend(a, c)?;
    graph.add_friend(b, d)?;
    graph.add_friend(c, d)?;

    let bytes = Amity::serialize(&graph, a)?;
    let envelope: Envelope = serde_json::from_slice(&bytes).expect("valid JSON container");

    let ids: Vec<PersonId> = envelope.objects.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![a, b, d, c]);
    assert!(!ids.contains(&loner));
    Ok(())
}

#[test]
fn test_container_field_names() -> Result<()> {
    let t = triangle()?;
    let bytes = Amity::serialize(&t.graph, t.ivan)?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).expect("valid JSON");

    assert_eq!(value["root_id"], t.ivan.to_string());
    let first = &value["objects"][0];
    assert_eq!(first["id"], t.ivan.to_string());
    assert_eq!(first["name"], "Ivan");
    assert_eq!(first["born_in"], "1990-05-15T00:00:00Z");
    assert_eq!(first["friends"][0], t.maria.to_string());
    assert_eq!(first["friends"][1], t.alexey.to_string());
    Ok(())
}

#[test]
fn test_unknown_root_is_rejected_on_encode() -> Result<()> {
    let t = triangle()?;
    let stranger = PersonId::generate();

    match Amity::serialize(&t.graph, stranger) {
        Err(AmityError::UnknownPerson(id)) => assert_eq!(id, stranger),
        other => panic!("expected UnknownPerson, got {other:?}"),
    }
    Ok(())
}

// --- ROUND TRIP ---

#[test]
fn test_triangle_round_trip() -> Result<()> {
    let t = triangle()?;
    let bytes = Amity::serialize(&t.graph, t.ivan)?;
    let restored = Amity::deserialize(&bytes)?;

    let root = restored.root();
    assert_eq!(root.id(), t.ivan);
    assert_eq!(root.name(), "Ivan");
    assert_eq!(root.born_in(), timestamp::date(1990, 5, 15)?);
    assert_eq!(root.friend_count(), 2);
    assert_eq!(restored.len(), 3);

    // Two hops along the cycle land on a real person, not a copy.
    let graph = restored.graph();
    let maria = graph.friend(root.id(), 0).expect("Ivan has a first friend");
    assert_eq!(maria.name(), "Maria");
    let alexey = graph.friend(maria.id(), 1).expect("Maria has a second friend");
    assert_eq!(alexey.name(), "Alexey");
    assert_eq!(alexey.id(), t.alexey);
    assert!(alexey.is_friend_of(t.ivan));

    for original in &t.graph {
        let copy = restored.get(original.id()).expect("every person restored");
        assert_eq!(copy, original);
    }
    Ok(())
}

#[test]
fn test_isolated_person_round_trip() -> Result<()> {
    let mut graph = SocialGraph::new();
    let solo = graph.add_person("Solo", timestamp::date(1970, 1, 1)?);

    let bytes = Amity::serialize(&graph, solo)?;
    let envelope: Envelope = serde_json::from_slice(&bytes).expect("valid JSON container");
    assert_eq!(envelope.objects.len(), 1);
    assert!(envelope.objects[0].friends.is_empty());

    let restored = Amity::deserialize(&bytes)?;
    assert_eq!(restored.root().name(), "Solo");
    assert_eq!(restored.root().friend_count(), 0);
    Ok(())
}

#[test]
fn test_deep_path_does_not_overflow() -> Result<()> {
    let mut graph = SocialGraph::new();
    let born = timestamp::date(1980, 1, 1)?;
    let ids: Vec<PersonId> = (0..50_000)
        .map(|i| graph.add_person(format!("p{i}"), born))
        .collect();
    for pair in ids.windows(2) {
        graph.add_friend(pair[0], pair[1])?;
    }

    let bytes = Amity::builder().pretty(false).serialize(&graph, ids[0])?;
    let restored = Amity::deserialize(&bytes)?;

    assert_eq!(restored.len(), ids.len());
    assert_eq!(restored.root().friend_count(), 1);
    let tail = restored.get(ids[ids.len() - 1]).expect("tail restored");
    assert_eq!(tail.name(), "p49999");
    Ok(())
}

#[test]
fn test_original_naive_timestamps_are_accepted() -> Result<()> {
    let bytes = format!(
        r#"{{"root_id": "{ID_A}", "objects": [
            {{"id": "{ID_A}", "name": "Ivan", "born_in": "1990-05-15T00:00:00", "friends": []}}
        ]}}"#
    );
    let restored = Amity::deserialize(bytes.as_bytes())?;
    assert_eq!(restored.root().born_in(), timestamp::date(1990, 5, 15)?);
    Ok(())
}

#[test]
fn test_far_past_and_future_birth_dates_round_trip() -> Result<()> {
    let mut graph = SocialGraph::new();
    let ancient = graph.add_person("Ancient", timestamp::date(-500, 1, 1)?);
    let distant = graph.add_person("Distant", timestamp::date(10000, 1, 1)?);
    graph.add_friend(ancient, distant)?;

    for format in [WireFormat::Json, WireFormat::Binary] {
        let options = Amity::builder().format(format);
        let bytes = options.serialize(&graph, ancient)?;
        let restored = options.deserialize(&bytes)?;

        assert_eq!(restored.root().born_in(), timestamp::date(-500, 1, 1)?);
        let other = restored.get(distant).expect("friend restored");
        assert_eq!(other.born_in(), timestamp::date(10000, 1, 1)?);
    }
    Ok(())
}

// --- DECODE FAILURES ---

#[test]
fn test_dangling_friend_is_rejected() {
    let bytes = container(
        ID_A,
        &[record(ID_A, "A", &[ID_B, ID_C]), record(ID_B, "B", &[ID_A])],
    );

    match Amity::deserialize(&bytes) {
        Err(AmityError::DanglingReference { owner, missing }) => {
            assert_eq!(owner.map(|id| id.to_string()), Some(ID_A.to_string()));
            assert_eq!(missing.to_string(), ID_C);
        }
        other => panic!("expected DanglingReference, got {other:?}"),
    }
}

#[test]
fn test_missing_root_is_rejected() {
    let bytes = container(
        ID_C,
        &[record(ID_A, "A", &[ID_B]), record(ID_B, "B", &[ID_A])],
    );

    match Amity::deserialize(&bytes) {
        Err(AmityError::DanglingReference {
            owner: None,
            missing,
        }) => assert_eq!(missing.to_string(), ID_C),
        other => panic!("expected DanglingReference for the root, got {other:?}"),
    }
}

#[test]
fn test_duplicate_id_is_rejected() {
    let bytes = container(ID_A, &[record(ID_A, "A", &[]), record(ID_A, "Impostor", &[])]);

    match Amity::deserialize(&bytes) {
        Err(AmityError::DuplicateId(id)) => assert_eq!(id.to_string(), ID_A),
        other => panic!("expected DuplicateId, got {other:?}"),
    }
}

#[test]
fn test_missing_field_is_malformed() {
    let bytes = format!(
        r#"{{"root_id": "{ID_A}", "objects": [{{"id": "{ID_A}", "name": "A", "friends": []}}]}}"#
    );

    let err = Amity::deserialize(bytes.as_bytes()).expect_err("born_in is required");
    assert!(matches!(err, AmityError::Malformed(ref msg) if msg.contains("born_in")));
}

#[test]
fn test_missing_root_marker_is_malformed() {
    let bytes = format!(r#"{{"objects": [{}]}}"#, record(ID_A, "A", &[]));
    let err = Amity::deserialize(bytes.as_bytes()).expect_err("root_id is required");
    assert!(matches!(err, AmityError::Malformed(_)));
}

#[test]
fn test_garbage_is_malformed() {
    let err = Amity::deserialize(b"not a container").expect_err("garbage must fail");
    assert!(matches!(err, AmityError::Malformed(_)));
}

#[test]
fn test_bad_id_is_malformed() {
    let bytes = container(ID_A, &[record(ID_A, "A", &["definitely-not-a-uuid"])]);
    let err = Amity::deserialize(&bytes).expect_err("friend ids must be UUIDs");
    assert!(matches!(err, AmityError::Malformed(_)));
}

#[test]
fn test_bad_timestamp_is_reported() {
    let bytes = format!(
        r#"{{"root_id": "{ID_A}", "objects": [
            {{"id": "{ID_A}", "name": "A", "born_in": "yesterday", "friends": []}}
        ]}}"#
    );

    match Amity::deserialize(bytes.as_bytes()) {
        Err(AmityError::Timestamp(msg)) => assert!(msg.contains(ID_A)),
        other => panic!("expected Timestamp, got {other:?}"),
    }
}

#[test]
fn test_one_sided_friendship_depends_on_strictness() -> Result<()> {
    let bytes = container(ID_A, &[record(ID_A, "A", &[ID_B]), record(ID_B, "B", &[])]);

    match Amity::deserialize(&bytes) {
        Err(AmityError::AsymmetricFriendship { from, to }) => {
            assert_eq!(from.to_string(), ID_A);
            assert_eq!(to.to_string(), ID_B);
        }
        other => panic!("expected AsymmetricFriendship, got {other:?}"),
    }

    let lenient = Amity::builder().strict(false).deserialize(&bytes)?;
    assert_eq!(lenient.root().friend_count(), 1);
    assert!(!lenient.graph().is_symmetric());
    Ok(())
}

#[test]
fn test_repeated_friend_entry_depends_on_strictness() -> Result<()> {
    let bytes = container(
        ID_A,
        &[record(ID_A, "A", &[ID_B, ID_B]), record(ID_B, "B", &[ID_A])],
    );

    let err = Amity::deserialize(&bytes).expect_err("strict mode rejects repeats");
    assert!(matches!(err, AmityError::Malformed(ref msg) if msg.contains("more than once")));

    let lenient = Amity::builder().strict(false).deserialize(&bytes)?;
    assert_eq!(lenient.root().friend_count(), 2);
    Ok(())
}
