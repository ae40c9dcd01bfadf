//! NPC definitions, the registry, abandonment and context housekeeping.

use crate::Visitor;
use palaver_engine::action::{self, Exchange};
use palaver_engine::{
    NpcBuilder, NpcConfig, NpcDefinition, NpcRegistry, PatrolPath, Position, Rule, StepOutcome,
    Trigger,
};
use palaver_foundation::{ActorId, ConversationState, Error, ErrorKind, NpcId};
use palaver_parser::Sentence;

const SCRATCH: &str = "order";

fn barkeep() -> NpcDefinition<Visitor> {
    NpcDefinition::new("Barkeep")
        .with_description("A tired barkeep.")
        .at((5, 5))
        .with_path(|| PatrolPath::new([(5, 5), (6, 5)], true))
        .with_dialogue(|b| {
            b.add_greeting("What'll it be?")?;
            b.add_rule(
                Rule::new(ConversationState::ATTENDING, "ale")
                    .with_action(action::from_fn(
                        |_: &mut Visitor, _: &Sentence, ex: &mut Exchange<'_>| {
                            ex.scratch().insert(SCRATCH, "ale");
                            ex.say("One ale? Say #yes.");
                            Ok(())
                        },
                    ))
                    .with_target(ConversationState::SERVICE_OFFERED),
            )?;
            b.add_rule(
                Rule::new(ConversationState::SERVICE_OFFERED, Trigger::abandon())
                    .with_action(action::from_fn(
                        |v: &mut Visitor, _: &Sentence, ex: &mut Exchange<'_>| {
                            let order = ex.scratch().take::<&'static str>(SCRATCH).unwrap_or("nothing");
                            v.log.push(format!("cancelled {order}"));
                            ex.say("Fine, keep your coins.");
                            Ok(())
                        },
                    )),
            )?;
            b.add_goodbye("See you.")
        })
}

#[test]
fn registry_spawns_and_finds_npcs() {
    let mut registry = NpcRegistry::new();
    let id = registry.spawn(&barkeep()).unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("BARKEEP").unwrap().id(), id);
    assert!(registry.get("nobody").is_none());
    assert_eq!(registry.names(), ["Barkeep"]);

    let err = registry.spawn(&barkeep()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateNpc(_)));

    assert!(registry.remove("barkeep").is_some());
    assert!(registry.is_empty());
}

#[test]
fn broken_definitions_report_where_they_failed() {
    let bad_path: NpcDefinition<Visitor> = NpcDefinition::new("Ghost")
        .with_path(|| PatrolPath::new(Vec::<(i32, i32)>::new(), false));
    let err = NpcBuilder::build(&bad_path, NpcId::new(1)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidPath(_)));
    let context = err.context.unwrap();
    assert_eq!(context.npc.as_deref(), Some("Ghost"));
    assert_eq!(context.stack, ["path"]);

    let bad_dialogue: NpcDefinition<Visitor> = NpcDefinition::new("Mute")
        .with_dialogue(|b| b.add_rule(Rule::new(ConversationState::IDLE, "hi")).map(|_| ()));
    let err: Error = NpcBuilder::build(&bad_dialogue, NpcId::new(2)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingResponse { .. }));
    assert_eq!(err.context.unwrap().stack, ["dialogue"]);

    let mut registry = NpcRegistry::new();
    assert!(registry.spawn(&bad_dialogue).is_err());
    assert!(registry.get("Mute").is_none());
}

#[test]
fn abandon_runs_cleanup_and_resets() {
    let mut npc = NpcBuilder::build(&barkeep(), NpcId::new(1)).unwrap();
    let mut visitor = Visitor::default();

    assert!(npc.abandon(&mut visitor).is_none());

    npc.talk(&mut visitor, "hi");
    npc.talk(&mut visitor, "ale");
    assert!(npc.context(ActorId::new(42)).unwrap().scratch().contains(SCRATCH));

    let reply = npc.abandon(&mut visitor).unwrap();
    assert_eq!(reply.text(), "Fine, keep your coins.");
    assert!(matches!(
        reply.outcome(),
        StepOutcome::Fired { from, to, .. }
            if *from == ConversationState::SERVICE_OFFERED && *to == ConversationState::IDLE
    ));
    assert_eq!(visitor.log, ["cancelled ale"]);

    let context = npc.context(ActorId::new(42)).unwrap();
    assert_eq!(context.state(), ConversationState::IDLE);
    assert!(context.scratch().is_empty());
}

#[test]
fn abandon_without_a_rule_still_resets() {
    let def: NpcDefinition<Visitor> = NpcDefinition::new("Clerk").with_dialogue(|b| {
        b.add_greeting("Next!")?;
        b.add_reply("form", "Fill this in.").map(|_| ())
    });
    let mut npc = NpcBuilder::build(&def, NpcId::new(1)).unwrap();
    let mut visitor = Visitor::default();

    npc.talk(&mut visitor, "hi");
    let reply = npc.abandon(&mut visitor).unwrap();
    assert!(reply.is_empty());
    assert!(matches!(reply.outcome(), StepOutcome::NoMatch));
    assert_eq!(
        npc.context(ActorId::new(42)).unwrap().state(),
        ConversationState::IDLE
    );
}

#[test]
fn npcs_stand_still_while_attending() {
    let mut npc = NpcBuilder::build(&barkeep(), NpcId::new(1)).unwrap();
    let mut visitor = Visitor::default();

    assert_eq!(npc.tick(), Some(Position::new(6, 5)));
    npc.talk(&mut visitor, "hi");
    assert_eq!(npc.active_conversations(), 1);
    assert_eq!(npc.tick(), None);

    npc.talk(&mut visitor, "bye");
    assert_eq!(npc.tick(), Some(Position::new(5, 5)));
}

#[test]
fn dormant_contexts_are_bounded() {
    let def = barkeep().with_config(NpcConfig::default().with_max_dormant_contexts(2));
    let mut npc = NpcBuilder::build(&def, NpcId::new(1)).unwrap();

    let mut visitors: Vec<Visitor> = (1..=3).map(Visitor::with_id).collect();
    for visitor in &mut visitors {
        npc.talk(visitor, "hi");
        npc.talk(visitor, "bye");
    }
    assert_eq!(npc.context_count(), 2);
    assert!(npc.context(ActorId::new(1)).is_none());

    npc.talk(&mut visitors[0], "hi");
    assert_eq!(npc.active_conversations(), 1);
    assert_eq!(npc.evict_dormant(), 2);
    assert_eq!(npc.context_count(), 1);
}
