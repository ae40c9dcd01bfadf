//! Prolonging offers at the trading center.

use crate::{build, say};
use palaver_content::market::{MAX_ACTIVE_OFFERS, OFFER_LIFETIME_MINUTES};
use palaver_content::market_manager::{self, KNOWN_OFFERS, PENDING_PROLONG};
use palaver_content::{GameClock, Market, Player, SharedMarket};
use palaver_engine::Actor;
use palaver_foundation::ConversationState;

fn market_with(offers: &[(&str, &str, u64)]) -> SharedMarket {
    let market = Market::new().shared();
    {
        let mut book = market.lock().unwrap();
        for (offerer, item, price) in offers {
            book.place_offer(offerer, item, 1, *price, 0);
        }
    }
    market
}

#[test]
fn full_quota_blocks_only_expired_offers() {
    let market = market_with(&[
        ("alice", "apple", 100),
        ("alice", "pear", 200),
        ("alice", "plum", 300),
        ("alice", "fig", 400),
    ]);
    // The fig expired; the other three are still active.
    market.lock().unwrap().expire(4);
    assert_eq!(market.lock().unwrap().count_offers_of("alice"), MAX_ACTIVE_OFFERS);

    let clock = GameClock::at(50);
    let mut npc = build(&market_manager::definition(market.clone(), clock));
    let mut player = Player::new(1, "alice").with_money(1000);

    say(&mut npc, &mut player, "hi");
    let listing = say(&mut npc, &mut player, "show mine");
    assert_eq!(
        listing,
        "1: an apple for 100 money\n2: a pear for 200 money\n3: a plum for 300 money\n\
         4: a fig for 400 money (expired)"
    );

    assert_eq!(
        say(&mut npc, &mut player, "prolong 4"),
        "Do you want to prolong your offer of a fig for 4 money?"
    );
    assert_eq!(
        say(&mut npc, &mut player, "yes"),
        "Sorry, you can have only 3 active offers at a time."
    );
    assert_eq!(player.money(), 1000);
    assert!(player.drain_private_messages().is_empty());
    {
        let book = market.lock().unwrap();
        assert!(book.is_expired(4));
        assert_eq!(book.get(4).unwrap().placed_at, 0);
    }

    say(&mut npc, &mut player, "show mine");
    assert_eq!(
        say(&mut npc, &mut player, "prolong 2"),
        "Do you want to prolong your offer of a pear for 2 money?"
    );
    assert_eq!(
        say(&mut npc, &mut player, "yes"),
        "I prolonged your offer and took the fee of 2 again."
    );
    assert_eq!(player.money(), 998);
    assert_eq!(player.drain_private_messages(), ["You now have put 3 offers."]);
    assert_eq!(market.lock().unwrap().get(2).unwrap().placed_at, 50);
}

#[test]
fn expired_offer_can_be_prolonged_below_quota() {
    let market = market_with(&[("alice", "fish pie", 250)]);
    let clock = GameClock::new();
    market.lock().unwrap().sweep(clock.advance(OFFER_LIFETIME_MINUTES));

    let mut npc = build(&market_manager::definition(market.clone(), clock));
    let mut player = Player::new(1, "alice").with_money(10);
    say(&mut npc, &mut player, "hi");
    say(&mut npc, &mut player, "show mine");
    say(&mut npc, &mut player, "prolong 1");
    assert_eq!(
        say(&mut npc, &mut player, "yes"),
        "I prolonged your offer and took the fee of 3 again."
    );
    assert!(!market.lock().unwrap().is_expired(1));
    assert_eq!(player.money(), 7);
}

#[test]
fn offer_removed_while_confirming() {
    let market = market_with(&[("alice", "apple", 100)]);
    let mut npc = build(&market_manager::definition(market.clone(), GameClock::new()));
    let mut player = Player::new(1, "alice").with_money(10);

    say(&mut npc, &mut player, "hi");
    say(&mut npc, &mut player, "show");
    say(&mut npc, &mut player, "prolong 1");
    market.lock().unwrap().remove(1);
    assert_eq!(
        say(&mut npc, &mut player, "yes"),
        "Sorry, that offer has already been removed from the market."
    );
    assert_eq!(player.money(), 10);

    let context = npc.context(player.id()).unwrap();
    assert_eq!(context.state(), ConversationState::ATTENDING);
    assert!(!context.scratch().contains(KNOWN_OFFERS));
    assert!(!context.scratch().contains(PENDING_PROLONG));
}

#[test]
fn walking_away_drops_the_pending_prolong() {
    let market = market_with(&[("alice", "apple", 100)]);
    let mut npc = build(&market_manager::definition(market, GameClock::new()));
    let mut player = Player::new(1, "alice").with_money(10);

    say(&mut npc, &mut player, "hi");
    say(&mut npc, &mut player, "show mine");
    say(&mut npc, &mut player, "prolong 1");
    assert_eq!(
        npc.context(player.id()).unwrap().state(),
        ConversationState::SERVICE_OFFERED
    );

    let farewell = npc.abandon(&mut player).unwrap();
    assert!(farewell.text().starts_with("Visit me again"));
    let context = npc.context(player.id()).unwrap();
    assert!(context.scratch().is_empty());
    assert!(context.is_dormant());

    say(&mut npc, &mut player, "hi");
    assert_eq!(
        say(&mut npc, &mut player, "prolong 1"),
        "Please check your offers first."
    );
}
