//! Dispatch properties: no-match, synonyms, determinism, tie-break,
//! parse errors and faults.

use crate::Visitor;
use palaver_engine::action::{self, Exchange, SetQuest};
use palaver_engine::condition;
use palaver_engine::{
    ActionError, ConversationContext, DialogueEngine, EngineConfig, Rule, StepOutcome, Trigger,
};
use palaver_foundation::{ActorId, ConversationState};
use palaver_parser::Sentence;
use proptest::prelude::*;

type Engine = DialogueEngine<Visitor>;

fn context(engine: &Engine) -> ConversationContext {
    engine.new_context(ActorId::new(42))
}

fn shop() -> Engine {
    let mut engine = Engine::default();
    engine
        .register(
            Rule::new(ConversationState::IDLE, ["hi", "hello", "greetings"])
                .with_reply("Welcome to the shop.")
                .with_target(ConversationState::ATTENDING),
        )
        .unwrap();
    engine
        .register(
            Rule::new(ConversationState::ATTENDING, ["buy", "purchase"])
                .with_reply("What would you like?")
                .with_action(action::from_fn(
                    |v: &mut Visitor, s: &Sentence, _: &mut Exchange<'_>| {
                        v.log.push(format!("buy {}", s.objects().len()));
                        Ok(())
                    },
                ))
                .with_target(ConversationState::BUY_PRICE_OFFERED),
        )
        .unwrap();
    engine
        .register(
            Rule::new(ConversationState::BUY_PRICE_OFFERED, "yes")
                .with_reply("Done.")
                .with_action(SetQuest::new("shop", "bought"))
                .with_target(ConversationState::ATTENDING),
        )
        .unwrap();
    engine
        .register(
            Rule::new(ConversationState::ATTENDING, "bye")
                .with_reply("Come again.")
                .with_target(ConversationState::IDLE),
        )
        .unwrap();
    engine
}

#[test]
fn unknown_phrase_is_a_noop() {
    let engine = shop();
    let mut ctx = context(&engine);
    let mut visitor = Visitor::default();

    for phrase in ["buy", "yes", "dance", "", "?!"] {
        let reply = engine.step(&mut ctx, phrase, &mut visitor);
        assert!(reply.is_empty(), "{phrase:?}");
        assert!(matches!(reply.outcome(), StepOutcome::NoMatch));
        assert_eq!(ctx.state(), ConversationState::IDLE);
    }
    assert!(visitor.log.is_empty());
}

#[test]
fn conversation_walks_the_state_machine() {
    let engine = shop();
    let mut ctx = context(&engine);
    let mut visitor = Visitor::default();

    assert_eq!(engine.step(&mut ctx, "Hello!", &mut visitor).text(), "Welcome to the shop.");
    assert_eq!(engine.step(&mut ctx, "buy the sword", &mut visitor).text(), "What would you like?");
    assert_eq!(ctx.state(), ConversationState::BUY_PRICE_OFFERED);
    assert_eq!(engine.step(&mut ctx, "yes", &mut visitor).text(), "Done.");
    assert_eq!(visitor.quests.get("shop"), Some("bought"));
    assert_eq!(engine.step(&mut ctx, "bye", &mut visitor).text(), "Come again.");
    assert_eq!(ctx.state(), ConversationState::IDLE);
    assert_eq!(visitor.log, ["buy 1"]);
    assert_eq!(ctx.steps(), 4);
}

#[test]
fn tie_break_is_first_registered_first_satisfied() {
    let mut engine = Engine::default();
    engine
        .register(
            Rule::new(ConversationState::IDLE, "hi")
                .with_condition(condition::from_fn(
                    |_: &Visitor, _: &Sentence, _: &ConversationContext| false,
                ))
                .with_reply("first"),
        )
        .unwrap();
    engine
        .register(
            Rule::new(ConversationState::IDLE, "hi")
                .with_condition(condition::from_fn(
                    |_: &Visitor, _: &Sentence, _: &ConversationContext| true,
                ))
                .with_reply("second"),
        )
        .unwrap();
    engine
        .register(
            Rule::new(ConversationState::IDLE, "hi")
                .with_condition(condition::from_fn(
                    |_: &Visitor, _: &Sentence, _: &ConversationContext| true,
                ))
                .with_reply("third"),
        )
        .unwrap();

    let mut ctx = context(&engine);
    let reply = engine.step(&mut ctx, "hi", &mut Visitor::default());
    assert_eq!(reply.text(), "second");
    assert_eq!(reply.rule().map(|id| id.index()), Some(1));
}

#[test]
fn exact_phrases_come_before_the_wildcard() {
    let mut engine = Engine::default();
    engine
        .register(Rule::new(ConversationState::IDLE, Trigger::any()).with_reply("Pardon?"))
        .unwrap();
    engine
        .register(Rule::new(ConversationState::IDLE, "hi").with_reply("Hello"))
        .unwrap();

    let mut ctx = context(&engine);
    let mut visitor = Visitor::default();
    assert_eq!(engine.step(&mut ctx, "hi", &mut visitor).text(), "Hello");
    assert_eq!(engine.step(&mut ctx, "what", &mut visitor).text(), "Pardon?");
    assert_eq!(engine.step(&mut ctx, "", &mut visitor).text(), "Pardon?");
}

#[test]
fn wildcard_fires_when_every_exact_rule_is_unsatisfied() {
    let mut engine = Engine::default();
    engine
        .register(
            Rule::new(ConversationState::IDLE, "hi")
                .with_condition(condition::from_fn(
                    |_: &Visitor, _: &Sentence, _: &ConversationContext| false,
                ))
                .with_reply("Hello, friend.")
                .with_target(ConversationState::ATTENDING),
        )
        .unwrap();
    engine
        .register(
            Rule::new(ConversationState::IDLE, Trigger::any())
                .with_reply("I do not talk to strangers.")
                .with_target(ConversationState::QUESTION_1),
        )
        .unwrap();
    let mut ctx = context(&engine);

    let reply = engine.step(&mut ctx, "hi", &mut Visitor::default());
    assert_eq!(reply.text(), "I do not talk to strangers.");
    assert_eq!(reply.rule().map(|id| id.index()), Some(1));
    assert_eq!(ctx.state(), ConversationState::QUESTION_1);
}

#[test]
fn quoting_does_not_change_the_matched_rule() {
    let mut engine = Engine::default();
    engine
        .register(Rule::new(ConversationState::IDLE, ["task", "favor"]).with_reply("A quest!"))
        .unwrap();
    let mut ctx = context(&engine);
    let mut visitor = Visitor::default();

    for line in ["favour", "\"favour\"", "tasks", "\"Tasks\"", "\"task"] {
        assert_eq!(engine.step(&mut ctx, line, &mut visitor).text(), "A quest!", "{line}");
    }
}

#[test]
fn actions_see_parse_errors() {
    let mut engine = Engine::default();
    engine
        .register(Rule::new(ConversationState::IDLE, "name").with_action(action::from_fn(
            |_: &mut Visitor, s: &Sentence, ex: &mut Exchange<'_>| {
                match s.error_message() {
                    Some(error) => ex.say(format!("Sorry, I did not understand you. {error}")),
                    None => ex.say(format!("Nice to meet you, {}.", s.objects()[0])),
                }
                Ok(())
            },
        )))
        .unwrap();
    let mut ctx = context(&engine);
    let mut visitor = Visitor::default();

    assert_eq!(
        engine.step(&mut ctx, "name \"Bob\"", &mut visitor).text(),
        "Nice to meet you, bob."
    );
    assert_eq!(
        engine.step(&mut ctx, "name \"Bob", &mut visitor).text(),
        "Sorry, I did not understand you. missing closing quote"
    );
}

#[test]
fn reply_only_rules_ignore_parse_errors() {
    let engine = shop();
    let mut ctx = context(&engine);
    let reply = engine.step(&mut ctx, "hi \"there", &mut Visitor::default());
    assert_eq!(reply.text(), "Welcome to the shop.");
    assert_eq!(ctx.state(), ConversationState::ATTENDING);
}

#[test]
fn faults_keep_partial_output_and_prior_state() {
    let mut engine = Engine::default();
    engine
        .register(
            Rule::new(ConversationState::IDLE, "hi")
                .with_reply("Hello")
                .with_action(action::from_fn(
                    |_: &mut Visitor, _: &Sentence, ex: &mut Exchange<'_>| {
                        ex.say("partial");
                        Err(ActionError::Other("ledger unavailable".into()))
                    },
                ))
                .with_target(ConversationState::ATTENDING),
        )
        .unwrap();
    engine
        .register(
            Rule::new(ConversationState::IDLE, "boom")
                .with_action(action::from_fn(
                    |_: &mut Visitor, _: &Sentence, _: &mut Exchange<'_>| -> Result<(), ActionError> {
                        panic!("broken content")
                    },
                ))
                .with_target(ConversationState::ATTENDING),
        )
        .unwrap();
    let mut ctx = context(&engine);
    let mut visitor = Visitor::default();

    let reply = engine.step(&mut ctx, "hi", &mut visitor);
    assert_eq!(reply.lines(), ["Hello", "partial"]);
    assert!(reply.is_fault());
    assert_eq!(ctx.state(), ConversationState::IDLE);

    let reply = engine.step(&mut ctx, "boom", &mut visitor);
    assert!(matches!(
        reply.outcome(),
        StepOutcome::Faulted { error: ActionError::Panicked(message), .. } if message == "broken content"
    ));
    assert_eq!(ctx.state(), ConversationState::IDLE);
}

#[test]
fn committed_state_survives_a_fault() {
    let mut engine = Engine::default();
    engine
        .register(
            Rule::new(ConversationState::IDLE, "hi")
                .with_action(action::from_fn(
                    |_: &mut Visitor, _: &Sentence, ex: &mut Exchange<'_>| {
                        ex.set_state(ConversationState::QUESTION_1);
                        Err(ActionError::Collaborator("market closed".into()))
                    },
                ))
                .with_target(ConversationState::ATTENDING),
        )
        .unwrap();
    let mut ctx = context(&engine);
    let reply = engine.step(&mut ctx, "hi", &mut Visitor::default());
    assert!(reply.is_fault());
    assert_eq!(ctx.state(), ConversationState::QUESTION_1);
}

#[test]
fn action_state_overrides_target() {
    let mut engine = Engine::default();
    engine
        .register(
            Rule::new(ConversationState::IDLE, "hi")
                .with_action(action::from_fn(
                    |_: &mut Visitor, _: &Sentence, ex: &mut Exchange<'_>| {
                        ex.say("Let me ask you something.");
                        ex.set_state(ConversationState::QUESTION_2);
                        Ok(())
                    },
                ))
                .with_target(ConversationState::ATTENDING),
        )
        .unwrap();
    let mut ctx = context(&engine);
    let reply = engine.step(&mut ctx, "hi", &mut Visitor::default());
    assert!(matches!(
        reply.outcome(),
        StepOutcome::Fired { to, .. } if *to == ConversationState::QUESTION_2
    ));
    assert_eq!(ctx.state(), ConversationState::QUESTION_2);
}

#[test]
fn strict_engines_contain_panics_after_a_committed_state() {
    let mut engine = Engine::new(EngineConfig::strict());
    engine
        .register(
            Rule::new(ConversationState::IDLE, "boom")
                .with_reply("Let me see.")
                .with_action(action::from_fn(
                    |_: &mut Visitor, _: &Sentence, ex: &mut Exchange<'_>| -> Result<(), ActionError> {
                        ex.set_state(ConversationState::QUESTION_1);
                        panic!("unguarded")
                    },
                ))
                .with_target(ConversationState::ATTENDING),
        )
        .unwrap();
    let mut ctx = context(&engine);

    let reply = engine.step(&mut ctx, "boom", &mut Visitor::default());
    assert_eq!(reply.lines(), ["Let me see."]);
    assert!(matches!(
        reply.outcome(),
        StepOutcome::Faulted { error: ActionError::Panicked(message), .. } if message == "unguarded"
    ));
    assert_eq!(ctx.state(), ConversationState::QUESTION_1);
    assert_eq!(ctx.steps(), 1);
}

#[test]
fn strict_engines_contain_panicking_conditions() {
    let mut engine = Engine::new(EngineConfig::strict());
    engine
        .register(
            Rule::new(ConversationState::IDLE, "hi")
                .with_condition(condition::from_fn(
                    |_: &Visitor, _: &Sentence, _: &ConversationContext| -> bool {
                        panic!("bad condition")
                    },
                ))
                .with_reply("Hello")
                .with_target(ConversationState::ATTENDING),
        )
        .unwrap();
    let mut ctx = context(&engine);

    let reply = engine.step(&mut ctx, "hi", &mut Visitor::default());
    assert!(reply.is_empty());
    assert!(reply.is_fault());
    assert_eq!(ctx.state(), ConversationState::IDLE);
}

proptest! {
    #[test]
    fn synonyms_share_one_rule(pick in 0usize..3, shout in any::<bool>()) {
        let engine = shop();
        let synonyms = ["hi", "hello", "greetings"];
        let typed = if shout {
            format!("{}!", synonyms[pick].to_uppercase())
        } else {
            synonyms[pick].to_string()
        };

        let mut reference_ctx = context(&engine);
        let mut reference_visitor = Visitor::default();
        let reference = engine.step(&mut reference_ctx, "hi", &mut reference_visitor);

        let mut ctx = context(&engine);
        let mut visitor = Visitor::default();
        let reply = engine.step(&mut ctx, &typed, &mut visitor);

        prop_assert_eq!(reply.lines(), reference.lines());
        prop_assert_eq!(reply.rule(), reference.rule());
        prop_assert_eq!(ctx.state(), reference_ctx.state());
        prop_assert_eq!(visitor, reference_visitor);
    }

    #[test]
    fn replay_is_deterministic(inputs in prop::collection::vec(
        prop::sample::select(vec!["hi", "buy", "buy 2 swords", "yes", "no", "bye", "??", "hello"]),
        0..24,
    )) {
        let engine = shop();
        let run = |inputs: &[&str]| {
            let mut ctx = context(&engine);
            let mut visitor = Visitor::default();
            let replies: Vec<Vec<String>> = inputs
                .iter()
                .map(|input| engine.step(&mut ctx, input, &mut visitor).into_lines())
                .collect();
            (replies, ctx.state(), visitor)
        };
        prop_assert_eq!(run(&inputs), run(&inputs));
    }
}
