//! Xhiphin Zohos, who welcomes newcomers to Deniran City.

use palaver_engine::{NpcDefinition, PatrolPath};

/// Name of the greeter.
pub const NAME: &str = "Xhiphin Zohos";

/// Definition of the Deniran city greeter.
#[must_use]
pub fn definition<A: 'static>() -> NpcDefinition<A> {
    NpcDefinition::new(NAME)
        .with_description("You see Xhiphin Zohos, a friendly looking elf.")
        .at((39, 28))
        .with_attribute("outfit", "05010601")
        .with_attribute("hp", "1000")
        .with_path(|| PatrolPath::new([(39, 28), (23, 28), (23, 20), (40, 20)], true))
        .with_dialogue(|b| {
            b.add_greeting(
                "Hello! Welcome to Deniran City! Would you like to #learn about Deniran?",
            )?;
            b.add_reply(
                "learn",
                "Deniran City is the jewl of the Faiumoni empire. It has a very important \
                 trade route with Orril and Semos to the North and #Sikhw to the South.",
            )?;
            b.add_reply(
                "sikhw",
                "Sikhw is an old city that was conqured a long time ago. It is now nearly \
                 unreachable.",
            )?;
            b.add_job("I greet all of the new-comers to Denirian.")?;
            b.add_help(
                "You can head into the tavern to buy food, drinks, and other items.You can \
                 also visit the people in the houses, or visit hte blacksmith or the city hotel.",
            )?;
            b.add_goodbye("Bye.")
        })
}
