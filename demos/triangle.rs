//! Encodes a three-person friendship triangle, decodes it and walks the cycle.
//! Run: cargo run --example triangle

#![allow(missing_docs)]

use amity::{Amity, GraphInspector, SocialGraph, WireFormat, timestamp};

fn main() -> amity::Result<()> {
    println!("=== AMITY TRIANGLE DEMO ===");

    let mut graph = SocialGraph::new();
    let ivan = graph.add_person("Ivan", timestamp::date(1990, 5, 15)?);
    let maria = graph.add_person("Maria", timestamp::date(1992, 8, 22)?);
    let alexey = graph.add_person("Alexey", timestamp::date(1988, 3, 10)?);

    graph.add_friend(ivan, maria)?;
    graph.add_friend(maria, alexey)?;
    graph.add_friend(alexey, ivan)?;

    let bytes = Amity::serialize(&graph, ivan)?;
    let text = String::from_utf8_lossy(&bytes);
    let preview: String = text.chars().take(200).collect();
    println!("Serialized container ({} bytes):", bytes.len());
    println!("{preview}...");

    let restored = Amity::deserialize(&bytes)?;
    let root = restored.root();
    println!("\nRestored root:");
    println!("Name: {}", root.name());
    println!("Born in: {}", timestamp::format(&root.born_in()));
    println!("Friend count: {}", root.friend_count());

    let friends = restored.graph().friends_of(root.id())?;
    for (ordinal, friend) in ["First", "Second"].iter().zip(&friends) {
        println!("{ordinal} friend: {}", friend.name());
    }

    println!("\nFollowing the cycle:");
    if let Some(first) = friends.first() {
        let names: Vec<&str> = restored
            .graph()
            .friends_of(first.id())?
            .iter()
            .map(|p| p.name())
            .collect();
        println!("{} has friends: {}", first.name(), names.join(", "));
    }

    let binary = Amity::builder()
        .format(WireFormat::Binary)
        .serialize(&graph, ivan)?;
    println!("\nBinary frame: {} bytes", binary.len());

    println!("\n{}", GraphInspector::inspect_bytes(&binary)?);
    Ok(())
}
