//! Registration errors and the builder helpers.

use crate::Visitor;
use palaver_engine::action::{self, Exchange};
use palaver_engine::condition::{self, AndCondition, NotCondition, QuestInState, QuestNotStarted};
use palaver_engine::{
    ConversationContext, DialogueBuilder, DialogueEngine, EngineConfig, Rule, Trigger, phrases,
};
use palaver_foundation::{ActorId, ConversationState, ErrorKind};
use palaver_parser::Sentence;

type Engine = DialogueEngine<Visitor>;

#[test]
fn rules_need_a_reply_or_an_action() {
    let mut engine = Engine::default();
    let err = engine
        .register(Rule::new(ConversationState::IDLE, "hi"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingResponse { .. }));
    assert!(engine.table().is_empty());
}

#[test]
fn phrase_triggers_must_be_usable() {
    let mut engine = Engine::default();
    let empty = engine
        .register(Rule::new(ConversationState::IDLE, Trigger::Phrases(Vec::new())).with_reply("x"))
        .unwrap_err();
    assert!(matches!(empty.kind, ErrorKind::EmptyTriggerSet { .. }));

    let invalid = engine
        .register(Rule::new(ConversationState::IDLE, ["hi", "good day"]).with_reply("x"))
        .unwrap_err();
    assert!(matches!(invalid.kind, ErrorKind::InvalidTrigger { .. }));
    assert!(engine.table().is_empty());
}

#[test]
fn conflicting_unconditional_rules() {
    let mut strict = Engine::default();
    strict
        .register(Rule::new(ConversationState::IDLE, "hi").with_reply("first"))
        .unwrap();
    let err = strict
        .register(Rule::new(ConversationState::IDLE, ["hello", "Hi"]).with_reply("second"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ConflictingRule { ref phrase, .. } if phrase == "hi"));
    assert_eq!(strict.table().len(), 1);

    let mut lenient = Engine::new(EngineConfig::lenient());
    lenient
        .register(Rule::new(ConversationState::IDLE, "hi").with_reply("first"))
        .unwrap();
    lenient
        .register(Rule::new(ConversationState::IDLE, "hi").with_reply("second"))
        .unwrap();
    let mut ctx = lenient.new_context(ActorId::new(1));
    assert_eq!(lenient.step(&mut ctx, "hi", &mut Visitor::default()).text(), "first");
}

#[test]
fn same_phrase_in_other_states_is_no_conflict() {
    let mut engine = Engine::default();
    engine
        .register(Rule::new(ConversationState::IDLE, "hi").with_reply("a"))
        .unwrap();
    engine
        .register(Rule::new(ConversationState::ATTENDING, "hi").with_reply("b"))
        .unwrap();
    assert_eq!(engine.table().len(), 2);
}

#[test]
fn synonym_spellings_collapse() {
    let mut engine = Engine::default();
    let id = engine
        .register(Rule::new(ConversationState::IDLE, ["offer", "Offers", "deal"]).with_reply("x"))
        .unwrap();
    let rule = engine.table().get(id).unwrap();
    assert_eq!(
        rule.trigger(),
        &Trigger::Phrases(vec!["offer".into(), "deal".into()])
    );
}

#[test]
fn quest_conditions_gate_rules() {
    let mut engine = Engine::default();
    engine
        .register(
            Rule::new(ConversationState::IDLE, "quest")
                .with_condition(QuestNotStarted::new("ring"))
                .with_reply("Find my ring."),
        )
        .unwrap();
    engine
        .register(
            Rule::new(ConversationState::IDLE, "quest")
                .with_condition(AndCondition::new(vec![
                    Box::new(QuestInState::new("ring", "done")),
                    Box::new(NotCondition::new(Box::new(condition::from_fn(
                        |v: &Visitor, _: &Sentence, _: &ConversationContext| v.log.is_empty(),
                    )))),
                ]))
                .with_reply("Thanks again, hero."),
        )
        .unwrap();
    engine
        .register(Rule::new(ConversationState::IDLE, "quest").with_reply("Still looking?"))
        .unwrap();

    let mut ctx = engine.new_context(ActorId::new(1));
    let mut visitor = Visitor::default();
    assert_eq!(engine.step(&mut ctx, "quest", &mut visitor).text(), "Find my ring.");

    visitor.quests.set("ring", "start");
    assert_eq!(engine.step(&mut ctx, "quest", &mut visitor).text(), "Still looking?");

    visitor.quests.set("ring", "done;12");
    assert_eq!(engine.step(&mut ctx, "quest", &mut visitor).text(), "Still looking?");
    visitor.log.push("celebrated".into());
    assert_eq!(engine.step(&mut ctx, "quest", &mut visitor).text(), "Thanks again, hero.");
}

#[test]
fn builder_helpers_cover_a_whole_npc() {
    let mut engine = Engine::default();
    {
        let mut b = DialogueBuilder::new(&mut engine);
        b.add_greeting("Greetings, traveller.").unwrap();
        b.add_job("I guard the gate.").unwrap();
        b.add_help("Ask me about the #city.").unwrap();
        b.add_offer("I have nothing to sell.").unwrap();
        b.add_quest("I need no help.").unwrap();
        b.add_reply("city", "Semos is north.").unwrap();
        b.add(
            ConversationState::ATTENDING,
            "salute",
            None,
            Some(ConversationState::ATTENDING),
            None,
            Some(Box::new(action::from_fn(
                |v: &mut Visitor, _: &Sentence, ex: &mut Exchange<'_>| {
                    v.log.push("saluted".into());
                    ex.say("*salutes back*");
                    Ok(())
                },
            ))),
        )
        .unwrap();
        b.add_goodbye("Farewell.").unwrap();
        assert!(!b.registered().is_empty());
    }

    let mut ctx = engine.new_context(ActorId::new(1));
    let mut visitor = Visitor::default();
    let mut say = |text: &str| engine.step(&mut ctx, text, &mut visitor).text();

    assert_eq!(say("Hello"), "Greetings, traveller.");
    assert_eq!(say("work"), "I guard the gate.");
    assert_eq!(say("help"), "Ask me about the #city.");
    assert_eq!(say("trade"), "I have nothing to sell.");
    assert_eq!(say("favour"), "I need no help.");
    assert_eq!(say("city"), "Semos is north.");
    assert_eq!(say("salute"), "*salutes back*");
    assert_eq!(say("hi"), "Greetings, traveller.");
    assert_eq!(say("cya"), "Farewell.");
    assert_eq!(say("job"), "");
    assert_eq!(visitor.log, ["saluted"]);
    assert_eq!(ctx.state(), ConversationState::IDLE);
}

#[test]
fn standard_phrase_lists_are_disjoint() {
    let lists = [
        phrases::GREETING,
        phrases::GOODBYE,
        phrases::YES,
        phrases::NO,
        phrases::JOB,
        phrases::HELP,
        phrases::OFFER,
        phrases::QUEST,
    ];
    for (i, a) in lists.iter().enumerate() {
        for b in &lists[i + 1..] {
            assert!(a.iter().all(|phrase| !b.contains(phrase)));
        }
    }
}
