//! The Deniran city greeter.

use crate::{build, say};
use palaver_content::{Player, greeter};
use palaver_engine::{NpcRegistry, Position};

#[test]
fn greeter_conversation() {
    let mut npc = build(&greeter::definition());
    let mut player = Player::new(1, "newcomer");
    let p = &mut player;

    assert_eq!(
        say(&mut npc, p, "Hello"),
        "Hello! Welcome to Deniran City! Would you like to #learn about Deniran?"
    );
    assert!(say(&mut npc, p, "learn").starts_with("Deniran City is the jewl"));
    assert!(say(&mut npc, p, "help").starts_with("You can head into the tavern"));
    assert_eq!(say(&mut npc, p, "goodbye"), "Bye.");
    assert_eq!(say(&mut npc, p, "learn"), "");
}

#[test]
fn greeter_patrols_from_the_registry() {
    let mut registry: NpcRegistry<Player> = NpcRegistry::new();
    registry.spawn(&greeter::definition()).unwrap();

    let moves: Vec<Position> = (0..4)
        .flat_map(|_| registry.tick_all())
        .map(|(_, position)| position)
        .collect();
    assert_eq!(
        moves,
        [
            Position::new(23, 28),
            Position::new(23, 20),
            Position::new(40, 20),
            Position::new(39, 28),
        ]
    );

    let mut player = Player::new(1, "newcomer");
    registry
        .get_mut(greeter::NAME)
        .unwrap()
        .talk(&mut player, "hi");
    assert!(registry.tick_all().is_empty());
}
