//! Contact detection and classification
//!
//! Nothing in the scene blocks anything else. Overlaps are only reported, and
//! only when they begin, so the player falls straight through obstacles while
//! the contact still scores or ends the session.

use std::collections::BTreeSet;

use super::entity::{Entity, EntityId, EntityTag, Player};
use crate::circle_overlaps_rect;

/// What a contact means for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Score,
    GameOver,
    Ignore,
}

/// Decide the outcome of a contact between two tags (order does not matter)
pub fn classify(a: EntityTag, b: EntityTag) -> Outcome {
    let other = match (a, b) {
        (EntityTag::Player, EntityTag::Player) => return Outcome::Ignore,
        (EntityTag::Player, other) | (other, EntityTag::Player) => other,
        // Only player contacts matter
        _ => return Outcome::Ignore,
    };

    match other {
        EntityTag::GapSensor => Outcome::Score,
        EntityTag::ObstacleTop | EntityTag::ObstacleBottom | EntityTag::GroundSensor => {
            Outcome::GameOver
        }
        EntityTag::Player => Outcome::Ignore,
    }
}

/// A newly begun overlap between the player and another entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub entity: EntityId,
    pub tag: EntityTag,
}

impl Contact {
    pub fn outcome(&self) -> Outcome {
        classify(EntityTag::Player, self.tag)
    }
}

/// Tracks which entities currently overlap the player
#[derive(Debug, Clone, Default)]
pub struct ContactTracker {
    touching: BTreeSet<EntityId>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test the player against `entities`, returning contacts that began this
    /// step, ordered by entity id
    pub fn detect(&mut self, player: &Player, entities: &[Entity]) -> Vec<Contact> {
        let mut now_touching = BTreeSet::new();
        let mut begun = Vec::new();

        for entity in entities {
            if !player.entity.body.reports_contact_with(&entity.body) {
                continue;
            }
            if !circle_overlaps_rect(player.pos(), player.radius, entity.pos, entity.size) {
                continue;
            }
            now_touching.insert(entity.id);
            if !self.touching.contains(&entity.id) {
                begun.push(Contact {
                    entity: entity.id,
                    tag: entity.tag,
                });
            }
        }

        self.touching = now_touching;
        begun.sort_by_key(|c| c.entity);
        begun
    }

    /// Forget an entity that left the scene
    pub fn forget(&mut self, id: EntityId) {
        self.touching.remove(&id);
    }

    pub fn clear(&mut self) {
        self.touching.clear();
    }
}
