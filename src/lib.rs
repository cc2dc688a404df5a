//! Flappy Birb - A side-scrolling tap-to-flap arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, scrolling, contacts, session state)
//! - `hud`: Pure projection of session state into display text
//! - `persistence`: Best score storage
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod hud;
pub mod persistence;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use hud::Hud;
pub use persistence::{BestScoreStore, JsonFileStore, MemoryStore};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default viewport dimensions
    pub const VIEWPORT_WIDTH: f32 = 750.0;
    pub const VIEWPORT_HEIGHT: f32 = 1334.0;

    /// Player sprite size; the contact body is a circle of half the height
    pub const PLAYER_WIDTH: f32 = 68.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;

    /// Obstacle sprite size
    pub const OBSTACLE_WIDTH: f32 = 104.0;
    pub const OBSTACLE_HEIGHT: f32 = 1334.0;

    /// Gap height as a multiple of the player height
    pub const GAP_FACTOR: f32 = 4.0;
    /// Seconds between obstacle spawns
    pub const SPAWN_PERIOD: f32 = 3.0;
    /// Scroll duration is viewport width divided by this
    pub const SCROLL_DIVISOR: f32 = 100.0;

    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = -1200.0;
    /// Upward impulse applied per tap
    pub const FLAP_IMPULSE: f32 = 480.0;
    pub const PLAYER_MASS: f32 = 1.0;
    /// Seconds per flap animation frame
    pub const FLAP_FRAME_TIME: f32 = 0.1;

    /// Background tile width and the time it takes to scroll one tile
    pub const BACKDROP_TILE_WIDTH: f32 = 1536.0;
    pub const BACKDROP_PERIOD: f32 = 5.0;
    pub const BACKDROP_TILES: usize = 3;
}

/// Closest point on an axis-aligned rectangle (center + size) to `p`
#[inline]
pub fn closest_point_on_rect(p: Vec2, center: Vec2, size: Vec2) -> Vec2 {
    let half = size * 0.5;
    p.clamp(center - half, center + half)
}

/// Circle vs axis-aligned rectangle overlap
#[inline]
pub fn circle_overlaps_rect(circle: Vec2, radius: f32, center: Vec2, size: Vec2) -> bool {
    circle.distance_squared(closest_point_on_rect(circle, center, size)) <= radius * radius
}
