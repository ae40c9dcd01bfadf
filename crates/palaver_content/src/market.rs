//! The trading center's order book.
//!
//! The market is shared by every NPC and player of a world, so it lives
//! behind a [`SharedMarket`] mutex; dialogue actions lock it only for the
//! duration of one step. Offers expire after [`OFFER_LIFETIME_MINUTES`] and
//! wait in the expired set until their owner prolongs or removes them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::debug;

/// Most offers a player may have on the market at once.
pub const MAX_ACTIVE_OFFERS: usize = 3;

/// Minutes an offer stays active before it expires.
pub const OFFER_LIFETIME_MINUTES: u64 = 7 * 24 * 60;

/// Trading fee as a percentage of the price.
pub const FEE_PERCENT: u64 = 1;

/// Number identifying an offer on the market.
pub type OfferId = u64;

/// An item put up for sale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Offer {
    /// Market-wide identifier
    pub id: OfferId,
    /// Name of the player selling
    pub offerer: String,
    /// Item name
    pub item: String,
    /// Number of items
    pub quantity: u32,
    /// Asking price in money
    pub price: u64,
    /// Minute the offer was placed or last prolonged
    pub placed_at: u64,
}

impl Offer {
    /// Quantity and item name for display ("a fish pie", "3 fish pies").
    #[must_use]
    pub fn describe_items(&self) -> String {
        quantity_noun(self.quantity, &self.item)
    }
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for {} money", self.describe_items(), self.price)
    }
}

/// The fee for putting up (or prolonging) an offer at `price`.
#[must_use]
pub fn calculate_fee(price: u64) -> u64 {
    (price.saturating_mul(FEE_PERCENT).div_ceil(100)).max(1)
}

fn quantity_noun(quantity: u32, noun: &str) -> String {
    if quantity == 1 {
        let article = if noun.starts_with(['a', 'e', 'i', 'o', 'u']) {
            "an"
        } else {
            "a"
        };
        format!("{article} {noun}")
    } else if noun.ends_with('s') {
        format!("{quantity} {noun}")
    } else {
        format!("{quantity} {noun}s")
    }
}

/// Active and expired offers.
#[derive(Debug, Default)]
pub struct Market {
    active: BTreeMap<OfferId, Offer>,
    expired: BTreeMap<OfferId, Offer>,
    next_id: OfferId,
}

/// A market shared between NPCs.
pub type SharedMarket = Arc<Mutex<Market>>;

impl Market {
    /// Creates an empty market.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Wraps the market for sharing.
    #[must_use]
    pub fn shared(self) -> SharedMarket {
        Arc::new(Mutex::new(self))
    }

    /// Puts up a new offer and returns its identifier.
    pub fn place_offer(
        &mut self,
        offerer: &str,
        item: &str,
        quantity: u32,
        price: u64,
        now: u64,
    ) -> OfferId {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.active.insert(
            id,
            Offer {
                id,
                offerer: offerer.to_string(),
                item: item.to_string(),
                quantity,
                price,
                placed_at: now,
            },
        );
        id
    }

    /// Looks up an offer, active or expired.
    #[must_use]
    pub fn get(&self, id: OfferId) -> Option<&Offer> {
        self.active.get(&id).or_else(|| self.expired.get(&id))
    }

    /// Returns true if the offer is in the expired set.
    #[must_use]
    pub fn is_expired(&self, id: OfferId) -> bool {
        self.expired.contains_key(&id)
    }

    /// Number of active offers of a player.
    #[must_use]
    pub fn count_offers_of(&self, offerer: &str) -> usize {
        self.active
            .values()
            .filter(|offer| offer.offerer == offerer)
            .count()
    }

    /// Active offers in id order.
    pub fn active_offers(&self) -> impl Iterator<Item = &Offer> {
        self.active.values()
    }

    /// Active and expired offers of a player in id order.
    #[must_use]
    pub fn offers_of(&self, offerer: &str) -> Vec<&Offer> {
        let mut offers: Vec<&Offer> = self
            .active
            .values()
            .chain(self.expired.values())
            .filter(|offer| offer.offerer == offerer)
            .collect();
        offers.sort_by_key(|offer| offer.id);
        offers
    }

    /// Moves an active offer to the expired set.
    pub fn expire(&mut self, id: OfferId) -> bool {
        match self.active.remove(&id) {
            Some(offer) => {
                self.expired.insert(id, offer);
                true
            }
            None => false,
        }
    }

    /// Expires every offer older than its lifetime; returns how many.
    pub fn sweep(&mut self, now: u64) -> usize {
        let stale: Vec<OfferId> = self
            .active
            .values()
            .filter(|offer| now.saturating_sub(offer.placed_at) >= OFFER_LIFETIME_MINUTES)
            .map(|offer| offer.id)
            .collect();
        for id in &stale {
            self.expire(*id);
        }
        if !stale.is_empty() {
            debug!(expired = stale.len(), "market sweep");
        }
        stale.len()
    }

    /// Restarts an offer's lifetime, reactivating it if it had expired.
    ///
    /// Returns `None` if the offer is no longer on the market.
    pub fn prolong(&mut self, id: OfferId, now: u64) -> Option<&Offer> {
        let mut offer = self
            .active
            .remove(&id)
            .or_else(|| self.expired.remove(&id))?;
        offer.placed_at = now;
        Some(self.active.entry(id).or_insert(offer))
    }

    /// Takes an offer off the market.
    pub fn remove(&mut self, id: OfferId) -> Option<Offer> {
        self.active.remove(&id).or_else(|| self.expired.remove(&id))
    }
}
