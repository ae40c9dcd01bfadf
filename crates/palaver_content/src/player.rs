//! The player actor used by the bundled content.

use palaver_engine::{Actor, QuestLog};
use palaver_foundation::ActorId;

/// A player with quest slots, a bag, and money.
#[derive(Clone, Debug)]
pub struct Player {
    id: ActorId,
    name: String,
    quests: QuestLog,
    bag: im::HashMap<String, u32>,
    money: u64,
    private_messages: Vec<String>,
}

impl Player {
    /// Creates a player with an empty bag and no money.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: ActorId::new(id),
            name: name.into(),
            quests: QuestLog::new(),
            bag: im::HashMap::new(),
            money: 0,
            private_messages: Vec::new(),
        }
    }

    /// Builder method to set the starting money.
    #[must_use]
    pub fn with_money(mut self, money: u64) -> Self {
        self.money = money;
        self
    }

    /// The quest log.
    #[must_use]
    pub fn quests(&self) -> &QuestLog {
        &self.quests
    }

    /// Puts items into the bag.
    pub fn equip(&mut self, item: &str, count: u32) {
        if count == 0 {
            return;
        }
        *self.bag.entry(item.to_string()).or_insert(0) += count;
    }

    /// How many of an item the bag holds.
    #[must_use]
    pub fn count(&self, item: &str) -> u32 {
        self.bag.get(item).copied().unwrap_or(0)
    }

    /// Returns true if the bag holds at least one of an item.
    #[must_use]
    pub fn is_equipped(&self, item: &str) -> bool {
        self.count(item) > 0
    }

    /// Bag contents sorted by item name.
    #[must_use]
    pub fn items(&self) -> Vec<(&str, u32)> {
        let mut items: Vec<(&str, u32)> = self
            .bag
            .iter()
            .map(|(item, count)| (item.as_str(), *count))
            .collect();
        items.sort_unstable();
        items
    }

    /// Takes items out of the bag; nothing is taken if there are too few.
    pub fn drop_item(&mut self, item: &str, count: u32) -> bool {
        let held = self.count(item);
        if held < count {
            return false;
        }
        if held == count {
            self.bag.remove(item);
        } else {
            self.bag.insert(item.to_string(), held - count);
        }
        true
    }

    /// Current money.
    #[must_use]
    pub fn money(&self) -> u64 {
        self.money
    }

    /// Pays an amount; nothing is paid if the player cannot afford it.
    pub fn pay(&mut self, amount: u64) -> bool {
        match self.money.checked_sub(amount) {
            Some(rest) => {
                self.money = rest;
                true
            }
            None => false,
        }
    }

    /// Receives money.
    pub fn earn(&mut self, amount: u64) {
        self.money = self.money.saturating_add(amount);
    }

    /// Sends a message only this player sees.
    pub fn send_private_text(&mut self, text: impl Into<String>) {
        self.private_messages.push(text.into());
    }

    /// Takes all private messages received so far.
    pub fn drain_private_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.private_messages)
    }
}

impl Actor for Player {
    fn id(&self) -> ActorId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn quest(&self, slot: &str) -> Option<&str> {
        self.quests.get(slot)
    }

    fn set_quest(&mut self, slot: &str, value: &str) {
        self.quests.set(slot, value);
    }
}
