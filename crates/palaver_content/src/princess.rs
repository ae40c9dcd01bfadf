//! Princess Esclara and the exotic drink she keeps asking for.
//!
//! The quest slot moves through `start` and `done;<minute>` (or `rejected`).
//! After a delivery the princess needs an hour before she wants another
//! drink.

use std::sync::{Arc, Mutex};

use palaver_engine::action::{self, Exchange, SetQuest};
use palaver_engine::condition::{self, QuestInState, QuestNotStarted};
use palaver_engine::{Actor, ActionError, ConversationContext, NpcDefinition, Rule, phrases};
use palaver_foundation::ConversationState;
use palaver_parser::Sentence;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::clock::GameClock;
use crate::player::Player;

/// Name of the princess.
pub const NAME: &str = "Princess Esclara";

/// Quest slot written by this quest.
pub const SLOT: &str = "amazon_princess";

/// The drink the princess wants.
pub const DRINK: &str = "pina colada";

/// The reward item.
pub const REWARD: &str = "fish pie";

/// Minutes before the princess wants another drink.
pub const RECOVERY_MINUTES: u64 = 60;

/// Minute the last drink was delivered, if the quest is done.
fn delivered_at(player: &Player) -> Option<u64> {
    if player.quest_part(SLOT, 0) != Some("done") {
        return None;
    }
    Some(
        player
            .quest_part(SLOT, 1)
            .and_then(|minute| minute.parse().ok())
            .unwrap_or(0),
    )
}

/// Definition of the princess.
///
/// `seed` makes the size of the reward reproducible.
#[must_use]
pub fn definition(clock: GameClock, seed: u64) -> NpcDefinition<Player> {
    NpcDefinition::new(NAME)
        .with_description("You see Princess Esclara, lounging by the pool.")
        .at((66, 44))
        .with_attribute("outfit", "amazon_princess")
        .with_dialogue(move |b| {
            let rng = Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed)));

            b.add_rule(
                Rule::new(ConversationState::IDLE, phrases::GREETING)
                    .with_condition(condition::from_fn(
                        |p: &Player, _: &Sentence, _: &ConversationContext| {
                            p.quest(SLOT) == Some("start") && p.is_equipped(DRINK)
                        },
                    ))
                    .with_reply("Ah, I see, you have a §'pina colada' Is it for me?")
                    .with_target(ConversationState::QUEST_ITEM_BROUGHT),
            )?;

            b.add_rule(
                Rule::new(ConversationState::ATTENDING, phrases::QUEST)
                    .with_condition(QuestNotStarted::new(SLOT))
                    .with_reply(
                        "I'm looking for a drink, should be an exotic one. Can you bring me one?",
                    )
                    .with_target(ConversationState::QUEST_OFFERED),
            )?;
            b.add_rule(
                Rule::new(ConversationState::ATTENDING, phrases::QUEST)
                    .with_condition(QuestInState::new(SLOT, "start"))
                    .with_reply(
                        "I like these exotic drinks, I forget the name of my favourite one.",
                    )
                    .with_target(ConversationState::ATTENDING),
            )?;

            let recovered = clock.clone();
            b.add_rule(
                Rule::new(ConversationState::ATTENDING, phrases::QUEST)
                    .with_condition(condition::from_fn(
                        move |p: &Player, _: &Sentence, _: &ConversationContext| {
                            delivered_at(p).is_some_and(|at| {
                                recovered.now() >= at.saturating_add(RECOVERY_MINUTES)
                            })
                        },
                    ))
                    .with_reply(
                        "The last cocktail you brought me was so lovely. Will you bring me another?",
                    )
                    .with_target(ConversationState::QUEST_OFFERED),
            )?;

            let drunk = clock.clone();
            b.add_rule(
                Rule::new(ConversationState::ATTENDING, phrases::QUEST)
                    .with_condition(QuestInState::new(SLOT, "done"))
                    .with_action(action::from_fn(
                        move |p: &mut Player, _: &Sentence, ex: &mut Exchange<'_>| {
                            let ready = delivered_at(p)
                                .unwrap_or(0)
                                .saturating_add(RECOVERY_MINUTES);
                            let remaining = ready.saturating_sub(drunk.now()).max(1);
                            ex.say(format!(
                                "I'm sure I'll be too drunk to have another one now. \
                                 I'll probably be sober in {remaining} minutes."
                            ));
                            Ok(())
                        },
                    ))
                    .with_target(ConversationState::ATTENDING),
            )?;

            b.add_rule(
                Rule::new(ConversationState::QUEST_OFFERED, phrases::YES)
                    .with_reply(
                        "Thank you! If you have found some, I'll be sure to give you a nice reward.",
                    )
                    .with_action(SetQuest::new(SLOT, "start"))
                    .with_target(ConversationState::ATTENDING),
            )?;
            b.add_rule(
                Rule::new(ConversationState::QUEST_OFFERED, phrases::NO)
                    .with_reply("Oh, never mind. Bye then.")
                    .with_action(SetQuest::new(SLOT, "rejected"))
                    .with_target(ConversationState::IDLE),
            )?;

            let delivered = clock.clone();
            b.add_rule(
                Rule::new(ConversationState::QUEST_ITEM_BROUGHT, phrases::YES)
                    .with_condition(condition::from_fn(
                        |p: &Player, _: &Sentence, _: &ConversationContext| p.is_equipped(DRINK),
                    ))
                    .with_action(action::from_fn(
                        move |p: &mut Player, _: &Sentence, ex: &mut Exchange<'_>| {
                            let pies = rng
                                .lock()
                                .map_err(|_| {
                                    ActionError::Collaborator("reward generator poisoned".into())
                                })?
                                .gen_range(2..=7_u32);
                            p.drop_item(DRINK, 1);
                            p.equip(REWARD, pies);
                            p.set_quest(SLOT, &format!("done;{}", delivered.now()));
                            debug!(player = p.name(), pies, "drink delivered");
                            ex.say(format!(
                                "Thank you! Take these {pies} fish pies from my cook, and this \
                                 kiss, from me."
                            ));
                            Ok(())
                        },
                    ))
                    .with_target(ConversationState::ATTENDING),
            )?;
            b.add_rule(
                Rule::new(ConversationState::QUEST_ITEM_BROUGHT, phrases::YES)
                    .with_reply("Hey! Where did you put the drink?")
                    .with_target(ConversationState::ATTENDING),
            )?;
            b.add_rule(
                Rule::new(ConversationState::QUEST_ITEM_BROUGHT, phrases::NO)
                    .with_reply("Then why are you carrying it around? Keep looking for one for me.")
                    .with_target(ConversationState::ATTENDING),
            )?;

            b.add_greeting("Huh, what are you doing here?")?;
            b.add_help("Beware of my sisters on the island, they do not like strangers.")?;
            b.add_job("I am the princess of this island. I order, others obey.")?;
            b.add_goodbye("Goodbye, and beware of the barbarians.")
        })
}
