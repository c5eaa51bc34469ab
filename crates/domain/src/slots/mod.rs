//! Domain-card slot allocator
//!
//! Slots are granted per level: two at level 1, one at every later level the
//! character has reached, and one more at any level whose advancement record
//! took `DOMAIN_CARD`. A card of level L may occupy a slot at level L or
//! higher. Nothing here is stored; the allocation is recomputed from base
//! slots and the current selection on every call.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::progression::LevelHistory;
use crate::value_objects::{AdvancementOption, Level};

/// Slots granted at level 1.
pub const STARTING_SLOTS: u32 = 2;

// =============================================================================
// Base slots
// =============================================================================

/// Slot capacity per level, before any card is placed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseSlots {
    by_level: BTreeMap<Level, u32>,
}

impl BaseSlots {
    pub fn derive(character_level: Level, history: &LevelHistory) -> Self {
        let by_level = character_level
            .up_to()
            .map(|level| {
                let count = if level == Level::MIN {
                    STARTING_SLOTS
                } else if history.has_choice_at(level, AdvancementOption::DomainCard) {
                    2
                } else {
                    1
                };
                (level, count)
            })
            .collect();
        Self { by_level }
    }

    #[cfg(test)]
    pub(crate) fn from_counts(counts: impl IntoIterator<Item = (Level, u32)>) -> Self {
        Self {
            by_level: counts.into_iter().filter(|(_, n)| *n > 0).collect(),
        }
    }

    pub fn get(&self, level: Level) -> u32 {
        self.by_level.get(&level).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.by_level.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Level, u32)> + '_ {
        self.by_level.iter().map(|(level, count)| (*level, *count))
    }
}

// =============================================================================
// Allocation
// =============================================================================

/// A selected card reduced to what the allocator needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeldCard {
    pub name: String,
    pub level: Level,
}

impl HeldCard {
    pub fn new(name: impl Into<String>, level: Level) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

/// Where a held card landed. `slot_level` is `None` when it fit nowhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub card_name: String,
    pub card_level: Level,
    pub slot_level: Option<Level>,
}

/// Per-level row of the slot breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSlots {
    pub level: Level,
    pub total: u32,
    pub used: u32,
    pub available: u32,
    pub can_select: bool,
}

/// Read model returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    /// Free slots usable by a card of each level
    pub available_slots_by_level: BTreeMap<Level, u32>,
    pub actual_slots_by_level: Vec<LevelSlots>,
    pub total_slots: u32,
    pub used_slots: u32,
    pub unplaced_cards: Vec<String>,
    pub placements: Vec<Placement>,
}

/// Result of placing a selection into base slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    base: BaseSlots,
    used: BTreeMap<Level, u32>,
    placements: Vec<Placement>,
}

/// Place cards greedily: ascending card level, ties by name, each into the
/// lowest free slot at or above its own level.
///
/// Cards that fit nowhere are recorded as unplaced and consume nothing.
pub fn allocate(base: &BaseSlots, cards: &[HeldCard]) -> Allocation {
    let mut order: Vec<&HeldCard> = cards.iter().collect();
    order.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.name.cmp(&b.name)));

    let mut used: BTreeMap<Level, u32> = BTreeMap::new();
    let mut placements = Vec::with_capacity(order.len());

    for card in order {
        let slot_level = base
            .iter()
            .filter(|(level, _)| *level >= card.level)
            .find(|(level, capacity)| used.get(level).copied().unwrap_or(0) < *capacity)
            .map(|(level, _)| level);

        if let Some(level) = slot_level {
            *used.entry(level).or_insert(0) += 1;
        }
        placements.push(Placement {
            card_name: card.name.clone(),
            card_level: card.level,
            slot_level,
        });
    }

    Allocation {
        base: base.clone(),
        used,
        placements,
    }
}

impl Allocation {
    #[inline]
    pub fn base(&self) -> &BaseSlots {
        &self.base
    }

    #[inline]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn used_at(&self, level: Level) -> u32 {
        self.used.get(&level).copied().unwrap_or(0)
    }

    pub fn free_at(&self, level: Level) -> u32 {
        self.base.get(level).saturating_sub(self.used_at(level))
    }

    /// Free slots a card of `card_level` could occupy.
    pub fn free_at_or_above(&self, card_level: Level) -> u32 {
        self.base
            .iter()
            .filter(|(level, _)| *level >= card_level)
            .map(|(level, _)| self.free_at(level))
            .sum()
    }

    /// Whether one more card of `card_level` fits.
    pub fn can_add(&self, card_level: Level) -> bool {
        self.free_at_or_above(card_level) > 0
    }

    pub fn total_slots(&self) -> u32 {
        self.base.total()
    }

    pub fn used_slots(&self) -> u32 {
        self.used.values().sum()
    }

    pub fn unplaced(&self) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(|p| p.slot_level.is_none())
    }

    /// For each card level up to the character's level, the free slots it could use.
    pub fn available_by_card_level(&self, character_level: Level) -> BTreeMap<Level, u32> {
        character_level
            .up_to()
            .map(|level| (level, self.free_at_or_above(level)))
            .collect()
    }

    pub fn level_slots(&self) -> Vec<LevelSlots> {
        self.base
            .iter()
            .map(|(level, total)| {
                let used = self.used_at(level);
                let available = total.saturating_sub(used);
                LevelSlots {
                    level,
                    total,
                    used,
                    available,
                    can_select: available > 0,
                }
            })
            .collect()
    }

    pub fn view(&self, character_level: Level) -> SlotView {
        SlotView {
            available_slots_by_level: self.available_by_card_level(character_level),
            actual_slots_by_level: self.level_slots(),
            total_slots: self.total_slots(),
            used_slots: self.used_slots(),
            unplaced_cards: self.unplaced().map(|p| p.card_name.clone()).collect(),
            placements: self.placements.clone(),
        }
    }
}
