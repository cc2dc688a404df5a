//! Obstacle pair spawning
//!
//! Each spawn rolls a vertical offset for the gap and builds three entities
//! at the right edge of the viewport: the top obstacle, the bottom obstacle
//! and an invisible gap sensor filling the opening between them.

use glam::Vec2;
use rand::Rng;

use super::entity::{Entity, EntityId, EntityTag};
use super::scroll::Scroll;
use crate::tuning::Tuning;

/// Parameters of a single spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnEvent {
    /// Vertical shift of the gap from the viewport center, in [-H/4, H/4)
    pub offset: f32,
    /// Horizontal start, just past the right edge
    pub x: f32,
    pub gap_height: f32,
}

/// Uniform offset in [-h/4, h/4)
pub fn roll_offset<R: Rng + ?Sized>(rng: &mut R, viewport_height: f32) -> f32 {
    rng.random_range(0.0..viewport_height / 2.0) - viewport_height / 4.0
}

impl SpawnEvent {
    pub fn roll<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning) -> Self {
        Self::with_offset(roll_offset(rng, tuning.viewport.y), tuning)
    }

    pub fn with_offset(offset: f32, tuning: &Tuning) -> Self {
        Self {
            offset,
            x: tuning.viewport.x + tuning.obstacle_size.x / 2.0,
            gap_height: tuning.gap_height(),
        }
    }

    /// Center of the opening
    pub fn gap_center(&self, tuning: &Tuning) -> Vec2 {
        Vec2::new(self.x, tuning.center().y + self.offset)
    }

    /// Build top obstacle, bottom obstacle and gap sensor, all scrolling
    pub fn build(&self, tuning: &Tuning, ids: [EntityId; 3]) -> [Entity; 3] {
        let gap_center = self.gap_center(tuning);
        let half_gap = self.gap_height / 2.0;
        let half_obstacle = tuning.obstacle_size.y / 2.0;
        let scroll = Scroll::leftward(self.x, 2.0 * tuning.viewport.x, tuning.scroll_duration());

        let top = Entity::new(
            ids[0],
            EntityTag::ObstacleTop,
            Vec2::new(self.x, gap_center.y + half_gap + half_obstacle),
            tuning.obstacle_size,
        )
        .with_scroll(scroll);

        let bottom = Entity::new(
            ids[1],
            EntityTag::ObstacleBottom,
            Vec2::new(self.x, gap_center.y - half_gap - half_obstacle),
            tuning.obstacle_size,
        )
        .with_scroll(scroll);

        let sensor = Entity::new(
            ids[2],
            EntityTag::GapSensor,
            gap_center,
            Vec2::new(tuning.obstacle_size.x, self.gap_height),
        )
        .with_scroll(scroll);

        [top, bottom, sensor]
    }
}
