//! Entity types, contact categories and the player body

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::scroll::Scroll;

pub type EntityId = u32;

/// Contact category bits
pub mod category {
    pub const PLAYER: u32 = 1 << 0;
    pub const OBSTACLE: u32 = 1 << 1;
    pub const GAP: u32 = 1 << 2;
    pub const GROUND: u32 = 1 << 3;
    pub const NONE: u32 = 0;
}

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    Player,
    ObstacleTop,
    ObstacleBottom,
    GapSensor,
    GroundSensor,
}

impl EntityTag {
    /// Category bit this tag reports contacts as
    pub fn category(self) -> u32 {
        match self {
            EntityTag::Player => category::PLAYER,
            EntityTag::ObstacleTop | EntityTag::ObstacleBottom => category::OBSTACLE,
            EntityTag::GapSensor => category::GAP,
            EntityTag::GroundSensor => category::GROUND,
        }
    }

    /// Categories this tag wants contact reports for
    pub fn contact_test_mask(self) -> u32 {
        match self {
            EntityTag::Player => category::OBSTACLE | category::GAP | category::GROUND,
            _ => category::PLAYER,
        }
    }
}

/// Contact filtering masks, mirrors what a physics engine would be handed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub category: u32,
    pub contact_test: u32,
    /// Categories that physically block this body (always none)
    pub collision: u32,
}

impl PhysicsBody {
    pub fn for_tag(tag: EntityTag) -> Self {
        Self {
            category: tag.category(),
            contact_test: tag.contact_test_mask(),
            collision: category::NONE,
        }
    }

    /// Whether either side asked to hear about the other
    pub fn reports_contact_with(&self, other: &PhysicsBody) -> bool {
        self.contact_test & other.category != 0 || other.contact_test & self.category != 0
    }
}

/// A scene entity (obstacle, sensor or the player's base record)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub tag: EntityTag,
    /// Center position
    pub pos: Vec2,
    pub size: Vec2,
    pub body: PhysicsBody,
    /// Scroll-then-dispose directive
    pub scroll: Option<Scroll>,
    /// Gap sensor already scored
    #[serde(default)]
    pub spent: bool,
}

impl Entity {
    pub fn new(id: EntityId, tag: EntityTag, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            tag,
            pos,
            size,
            body: PhysicsBody::for_tag(tag),
            scroll: None,
            spent: false,
        }
    }

    pub fn with_scroll(mut self, scroll: Scroll) -> Self {
        self.scroll = Some(scroll);
        self
    }

    pub fn top(&self) -> f32 {
        self.pos.y + self.size.y / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y - self.size.y / 2.0
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

/// Two-frame wing flap, loops forever
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FlapAnimation {
    pub frame: u8,
    elapsed: f32,
}

impl FlapAnimation {
    pub const FRAMES: u8 = 2;

    pub fn advance(&mut self, dt: f32, frame_time: f32) {
        self.elapsed += dt;
        while self.elapsed >= frame_time {
            self.elapsed -= frame_time;
            self.frame = (self.frame + 1) % Self::FRAMES;
        }
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub entity: Entity,
    pub vel: Vec2,
    /// Radius of the circular contact body
    pub radius: f32,
    /// Affected by gravity; false until the first tap when holding is enabled
    pub dynamic: bool,
    pub anim: FlapAnimation,
}

impl Player {
    pub fn new(id: EntityId, pos: Vec2, size: Vec2, radius: f32, dynamic: bool) -> Self {
        Self {
            entity: Entity::new(id, EntityTag::Player, pos, size),
            vel: Vec2::ZERO,
            radius,
            dynamic,
            anim: FlapAnimation::default(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.entity.id
    }

    pub fn pos(&self) -> Vec2 {
        self.entity.pos
    }

    /// Apply an instantaneous impulse; wakes a held body
    pub fn apply_impulse(&mut self, impulse: Vec2, mass: f32) {
        self.dynamic = true;
        self.vel += impulse / mass;
    }

    /// Semi-implicit Euler step under gravity
    pub fn integrate(&mut self, gravity: f32, dt: f32) {
        if !self.dynamic {
            return;
        }
        self.vel.y += gravity * dt;
        self.entity.pos += self.vel * dt;
    }
}
