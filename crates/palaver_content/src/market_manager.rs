//! Harold, who runs the trading center, and the prolong-offer dialogue.
//!
//! Players first ask to `show` offers (or `show mine`); the listed numbers
//! are remembered in the conversation's scratch data. `prolong <number>`
//! quotes the fee and waits for `yes` or `no`.

use std::collections::BTreeMap;
use std::sync::MutexGuard;

use palaver_engine::action::{self, Exchange};
use palaver_engine::{ActionError, Actor, NpcDefinition, Rule, phrases};
use palaver_foundation::ConversationState;
use palaver_parser::Sentence;

use crate::clock::GameClock;
use crate::market::{MAX_ACTIVE_OFFERS, Market, Offer, OfferId, SharedMarket, calculate_fee};
use crate::player::Player;

/// Name of the market manager.
pub const NAME: &str = "Harold";

/// Scratch key of the numbers most recently shown to the player.
pub const KNOWN_OFFERS: &str = "known_offers";

/// Scratch key of the offer awaiting confirmation.
pub const PENDING_PROLONG: &str = "prolong_offer";

/// Listed number to offer identifier.
pub type KnownOffers = BTreeMap<u64, OfferId>;

/// An offer the player was asked to confirm prolonging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingProlong {
    /// The offer
    pub offer: OfferId,
    /// The quoted fee
    pub fee: u64,
}

fn lock(market: &SharedMarket) -> Result<MutexGuard<'_, Market>, ActionError> {
    market
        .lock()
        .map_err(|_| ActionError::Collaborator("market lock poisoned".into()))
}

/// Lists offers and remembers their numbers.
fn show_offers(
    market: &SharedMarket,
    player: &Player,
    sentence: &Sentence,
    exchange: &mut Exchange<'_>,
) -> Result<(), ActionError> {
    let mine = sentence
        .objects()
        .first()
        .is_some_and(|e| e.normalized == "mine");
    let market = lock(market)?;
    let offers: Vec<&Offer> = if mine {
        market.offers_of(player.name())
    } else {
        market.active_offers().collect()
    };

    if offers.is_empty() {
        exchange.scratch().remove(KNOWN_OFFERS);
        exchange.say(if mine {
            "You have no offers."
        } else {
            "There are currently no offers in the market."
        });
        return Ok(());
    }

    let mut known = KnownOffers::new();
    let mut lines = Vec::with_capacity(offers.len());
    for (number, offer) in (1..).zip(&offers) {
        known.insert(number, offer.id);
        let status = if market.is_expired(offer.id) {
            " (expired)"
        } else {
            ""
        };
        lines.push(format!("{number}: {offer}{status}"));
    }
    drop(market);

    exchange.scratch().insert(KNOWN_OFFERS, known);
    exchange.say(lines.join("\n"));
    Ok(())
}

/// Handles `prolong <number>`.
fn ask_prolong(
    market: &SharedMarket,
    player: &Player,
    sentence: &Sentence,
    exchange: &mut Exchange<'_>,
) -> Result<(), ActionError> {
    if let Some(error) = sentence.error_message() {
        exchange.say(format!("Sorry, I did not understand you. {error}"));
        return Ok(());
    }
    let Some(number) = sentence.number() else {
        exchange.say("Sorry, please say #prolong #number");
        return Ok(());
    };
    let Some(known) = exchange.scratch().get::<KnownOffers>(KNOWN_OFFERS) else {
        exchange.say("Please check your offers first.");
        return Ok(());
    };
    let Some(offer_id) = known.get(&number).copied() else {
        exchange.say("Sorry, please choose a number from those I told you to prolong your offer.");
        return Ok(());
    };

    let market = lock(market)?;
    let Some(offer) = market.get(offer_id) else {
        exchange.say("Sorry, that offer has already been removed from the market.");
        return Ok(());
    };
    if offer.offerer != player.name() {
        exchange.say(
            "You can only prolong your own offers. Please say #show #mine to see only your offers.",
        );
        return Ok(());
    }
    let fee = calculate_fee(offer.price);
    let question = format!(
        "Do you want to prolong your offer of {} for {fee} money?",
        offer.describe_items()
    );
    drop(market);

    exchange.scratch().insert(PENDING_PROLONG, PendingProlong { offer: offer_id, fee });
    exchange.say(question);
    exchange.set_state(ConversationState::SERVICE_OFFERED);
    Ok(())
}

/// Handles `yes` after the fee was quoted.
fn confirm_prolong(
    market: &SharedMarket,
    clock: &GameClock,
    player: &mut Player,
    exchange: &mut Exchange<'_>,
) -> Result<(), ActionError> {
    let pending = exchange
        .scratch()
        .take::<PendingProlong>(PENDING_PROLONG)
        .ok_or(ActionError::MissingScratch(PENDING_PROLONG))?;
    let mut market = lock(market)?;

    let at_limit = market.count_offers_of(player.name()) >= MAX_ACTIVE_OFFERS;
    if at_limit && market.is_expired(pending.offer) {
        exchange.say(format!(
            "Sorry, you can have only {MAX_ACTIVE_OFFERS} active offers at a time."
        ));
        return Ok(());
    }
    if player.money() < pending.fee {
        exchange.say(format!("You cannot afford the trading fee of {}", pending.fee));
        return Ok(());
    }

    if market.prolong(pending.offer, clock.now()).is_some() {
        player.pay(pending.fee);
        let count = market.count_offers_of(player.name());
        player.send_private_text(format!("You now have put {count} offers."));
        exchange.say(format!(
            "I prolonged your offer and took the fee of {} again.",
            pending.fee
        ));
    } else {
        exchange.say("Sorry, that offer has already been removed from the market.");
    }
    drop(market);

    // The listed numbers no longer describe the market.
    exchange.scratch().remove(KNOWN_OFFERS);
    Ok(())
}

/// Definition of the market manager.
#[must_use]
pub fn definition(market: SharedMarket, clock: GameClock) -> NpcDefinition<Player> {
    NpcDefinition::new(NAME)
        .with_description("You see Harold, who keeps the books of the trading center.")
        .at((12, 7))
        .with_attribute("outfit", "market_manager")
        .with_dialogue(move |b| {
            let shown = market.clone();
            b.add_rule(
                Rule::new(ConversationState::ATTENDING, "show")
                    .with_action(action::from_fn(
                        move |p: &mut Player, s: &Sentence, ex: &mut Exchange<'_>| {
                            show_offers(&shown, p, s, ex)
                        },
                    ))
                    .with_target(ConversationState::ATTENDING),
            )?;

            let asked = market.clone();
            b.add_rule(
                Rule::new(ConversationState::ATTENDING, "prolong")
                    .with_action(action::from_fn(
                        move |p: &mut Player, s: &Sentence, ex: &mut Exchange<'_>| {
                            ask_prolong(&asked, p, s, ex)
                        },
                    ))
                    .with_target(ConversationState::ATTENDING),
            )?;

            let confirmed = market.clone();
            let now = clock.clone();
            b.add_rule(
                Rule::new(ConversationState::SERVICE_OFFERED, phrases::YES)
                    .with_action(action::from_fn(
                        move |p: &mut Player, _: &Sentence, ex: &mut Exchange<'_>| {
                            confirm_prolong(&confirmed, &now, p, ex)
                        },
                    ))
                    .with_target(ConversationState::ATTENDING),
            )?;
            b.add_rule(
                Rule::new(ConversationState::SERVICE_OFFERED, phrases::NO)
                    .with_reply("Ok, how else may I help you?")
                    .with_action(action::from_fn(
                        |_: &mut Player, _: &Sentence, ex: &mut Exchange<'_>| {
                            ex.scratch().remove(PENDING_PROLONG);
                            Ok(())
                        },
                    ))
                    .with_target(ConversationState::ATTENDING),
            )?;

            b.add_greeting("Welcome to the trading center. How can I #help you?")?;
            b.add_job("I keep the books of this market.")?;
            b.add_help(
                "Say #show to see the offers, #show #mine to see your own, and #prolong with \
                 a number to keep one of your offers on the market.",
            )?;
            b.add_goodbye(
                "Visit me again to see available offers, make a new offer or fetch your earnings!",
            )
        })
}
